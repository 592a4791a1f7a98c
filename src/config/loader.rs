//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/docweave/config.toml)
//! 3. Project config (.docweave/config.toml)
//! 4. Environment variables (DOCWEAVE_* prefix, nested keys split on `__`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, WeaveError};

const ENV_PREFIX: &str = "DOCWEAVE_";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_in(Path::new("."))
    }

    /// Same as [`load`](Self::load) with the project config resolved under `base`
    pub fn load_in(base: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge project config
        let project_path = base.join(Self::project_config_path());
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DOCWEAVE_NAVIGATION__MAX_SLUG_LEN -> navigation.max_slug_len
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| WeaveError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| WeaveError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/docweave/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docweave"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get path to project config file, relative to the project root
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(CONFIG_FILE)
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".docweave")
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| WeaveError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project configuration under `base`.
    ///
    /// An existing file is kept unless `force` is set.
    pub fn init_project(base: &Path, force: bool) -> Result<PathBuf> {
        let config_path = base.join(Self::project_config_path());
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    /// Write a default global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let config_path = Self::global_config_path().ok_or_else(|| {
            WeaveError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(())
    }

    /// Default config content (TOML)
    fn default_config() -> String {
        r#"# docweave configuration
# Project settings in .docweave/config.toml override ~/.config/docweave/config.toml.
# Environment variables override both, e.g. DOCWEAVE_SITE__NAME="Handbook".

[site]
name = "Documentation"
docs_dir = "docs"
# repo_url = "https://github.com/org/repo"
# edit_uri = "edit/main/docs/"

[templates]
default = "standard_docs"
# custom_dir = "templates"

[classification.emoji]
# "🗳️" = "governance"

# [[classification.keywords]]
# category = "governance"
# keywords = ["voting", "proposal"]

[navigation]
emoji_in_titles = false
max_slug_len = 50
home_index = false

[output]
dir = "output"
write_analysis = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_file_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        assert!(path.ends_with(".docweave/config.toml"));

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_keeps_existing_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        fs::write(&path, "[site]\nname = \"Custom\"\n").unwrap();

        ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Custom"));

        ConfigLoader::init_project(temp_dir.path(), true).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("Custom"));
    }

    #[test]
    fn test_project_config_and_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".docweave");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            "[site]\nname = \"Ops\"\n\n[navigation]\nmax_slug_len = 20\n",
        )
        .unwrap();

        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("DOCWEAVE_NAVIGATION__HOME_INDEX", "true");
        }
        let config = ConfigLoader::load_in(temp_dir.path()).unwrap();
        unsafe {
            std::env::remove_var("DOCWEAVE_NAVIGATION__HOME_INDEX");
        }

        assert_eq!(config.site.name, "Ops");
        assert_eq!(config.navigation.max_slug_len, 20);
        assert!(config.navigation.home_index);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[navigation]\nmax_slug_len = 0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[navigation]"));
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"max_slug_len\": 50"));
    }
}
