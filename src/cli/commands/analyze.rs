//! Analyze Command
//!
//! Reports a document's heading structure and writes the navigation and
//! analysis files without reformatting anything.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::StructureAnalysis;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, read_document, write_file};
use crate::constants::navigation::NAV_FILE;
use crate::constants::output::ANALYSIS_FILE;
use crate::navigation::nav_yaml;
use crate::types::Result;

pub fn run(
    ctx: &CommandContext,
    file: &Path,
    output_dir: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let text = read_document(file)?;
    let result = ctx.processor.analyze(&text);
    let analysis = &result.analysis;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        print_report(file, analysis);
    }

    if ctx.config.output.write_analysis {
        let dir = ctx.output_dir(output_dir);
        let nav_path = dir.join(NAV_FILE);
        let analysis_path = dir.join(ANALYSIS_FILE);
        write_file(&nav_path, &nav_yaml(&result.navigation.entries)?)?;
        write_file(&analysis_path, &serde_json::to_string_pretty(analysis)?)?;
        info!("Wrote {} and {}", nav_path.display(), analysis_path.display());
    }

    Ok(())
}

fn print_report(file: &Path, analysis: &StructureAnalysis) {
    let output = Output::new();
    output.header(&format!("Structure of {}", file.display()));

    output.section("Headings");
    if analysis.headings.is_empty() {
        output.info("No headings found");
    }
    for heading in &analysis.headings {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
        println!(
            "{}{} {}  [{}] → {}",
            indent,
            "#".repeat(usize::from(heading.level)),
            heading.text,
            heading.category,
            heading.file
        );
    }

    output.section("Statistics");
    output.field("sections", analysis.stats.total_sections);
    output.field("max depth", analysis.stats.max_depth);
    output.field("estimated pages", analysis.stats.estimated_pages);
    output.field("cross references", analysis.cross_references.len());
    output.field("suggested template", &analysis.suggested_template);

    if !analysis.diagnostics.is_empty() {
        output.section("Diagnostics");
        for diagnostic in &analysis.diagnostics {
            output.diagnostic(diagnostic);
        }
    }

    if analysis.has_warnings() {
        output.warning(&format!("{} warning(s)", analysis.warnings().count()));
    } else {
        output.success("Structure is clean");
    }
}
