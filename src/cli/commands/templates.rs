//! Templates Command
//!
//! Usage:
//!   docweave templates list [-f json]
//!   docweave templates show <NAME>
//!   docweave templates export <NAME> <PATH>

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::template::TemplateKind;
use crate::types::Result;

pub fn list(ctx: &CommandContext, format: &str) -> Result<()> {
    let templates = ctx.processor.templates().list();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&templates)?);
        return Ok(());
    }

    let output = Output::new();
    output.section("Templates");
    for info in &templates {
        let marker = match info.kind {
            TemplateKind::Builtin => "",
            TemplateKind::Custom => " (custom)",
        };
        println!("  {:<16} {}{}", info.name, info.display_name, marker);
        if !info.description.is_empty() {
            println!("  {:<16} {}", "", info.description);
        }
    }
    Ok(())
}

pub fn show(ctx: &CommandContext, name: &str) -> Result<()> {
    print!("{}", ctx.processor.templates().to_yaml(name)?);
    Ok(())
}

pub fn export(ctx: &CommandContext, name: &str, path: &Path) -> Result<()> {
    ctx.processor.templates().export(name, path)?;
    Output::new().success(&format!("Exported '{}' to {}", name, path.display()));
    Ok(())
}
