//! Config Command
//!
//! Manage docweave configuration.
//!
//! Usage:
//!   docweave config show [-g] [-f json]
//!   docweave config path
//!   docweave config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show configuration: the raw global file or the merged effective config
pub fn show(config: &Config, global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'docweave config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    println!("{}", ConfigLoader::render(config, format == "json")?);
    Ok(())
}

/// Show configuration paths in resolution order
pub fn path() -> Result<()> {
    let output = Output::new();
    output.section("Configuration Files");

    match ConfigLoader::global_config_path() {
        Some(path) => output.field("global", describe(&path)),
        None => output.field("global", "(no config directory)"),
    }
    output.field("project", describe(&ConfigLoader::project_config_path()));
    output.field("environment", "DOCWEAVE_<SECTION>__<KEY>");
    Ok(())
}

fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let path = ConfigLoader::init_global(force)?;
    Output::new().success("Initialized global configuration");
    println!("  Config: {}", path.display());
    Ok(())
}

/// Initialize project configuration in the current directory
pub fn init_project(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let path = ConfigLoader::init_project(&root, force)?;
    Output::new().success("Initialized project configuration");
    println!("  Config: {}", path.display());
    Ok(())
}
