//! Process Command
//!
//! Runs the full pipeline over one or more documents concurrently and
//! publishes each result as a site directory (pages, navigation.yml, mkdocs.yml).
//!
//! Usage:
//!   docweave process <FILE>... [-t TEMPLATE] [-o DIR] [-j N]
//!   docweave publish <ID> --source DIR [-t TEMPLATE] [-o DIR]

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, document_stem, read_document, write_file};
use crate::constants::output::ANALYSIS_FILE;
use crate::pipeline::ProcessedDocument;
use crate::providers::{DirectoryTarget, LocalFileSource, PublishReceipt, PublishTarget};
use crate::types::{Metadata, Result, WeaveError};

pub async fn run(
    ctx: &CommandContext,
    files: &[PathBuf],
    template_name: Option<String>,
    output_dir: Option<PathBuf>,
    jobs: Option<usize>,
    metadata: &Metadata,
) -> Result<()> {
    let template = ctx.template_name(template_name);
    // Fail before reading anything when the template is unknown
    ctx.processor.templates().get(&template)?;

    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        documents.push((file.display().to_string(), read_document(file)?));
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    debug!("Processing {} documents with {} workers", documents.len(), jobs);
    let results = ctx
        .processor
        .process_many(documents, &template, metadata, jobs)
        .await;

    let out = ctx.output_dir(output_dir);
    let output = Output::new();
    let single = files.len() == 1;
    let mut failed = 0;

    for (file, (id, result)) in files.iter().zip(results) {
        match result {
            Ok(processed) => {
                let root = if single {
                    out.clone()
                } else {
                    out.join(document_stem(file))
                };
                let receipt = publish(ctx, &root, &processed, &id).await?;
                report(&output, &id, &processed, &receipt);
            }
            Err(e) => {
                failed += 1;
                output.error(&format!("{}: {}", id, e));
            }
        }
    }

    info!("Processed {} documents, {} failed", files.len(), failed);
    if failed > 0 {
        return Err(WeaveError::Publish(format!(
            "{} of {} documents failed",
            failed,
            files.len()
        )));
    }
    Ok(())
}

/// Fetch a document by id from a source directory and publish it
pub async fn publish_from_source(
    ctx: &CommandContext,
    source_dir: &Path,
    id: &str,
    template_name: Option<String>,
    output_dir: Option<PathBuf>,
    metadata: &Metadata,
) -> Result<()> {
    let template = ctx.template_name(template_name);
    let source = LocalFileSource::new(source_dir);
    let target = DirectoryTarget::new(ctx.output_dir(output_dir), ctx.config.site.docs_dir.clone());

    let receipt = ctx
        .processor
        .run(&source, &target, id, &template, metadata)
        .await?;

    let output = Output::new();
    if receipt.changed() {
        output.success(&format!(
            "Published '{}' to {} ({} written, {} unchanged)",
            id,
            receipt.target,
            receipt.written.len(),
            receipt.unchanged.len()
        ));
    } else {
        output.info(&format!("'{}' is up to date in {}", id, receipt.target));
    }
    Ok(())
}

async fn publish(
    ctx: &CommandContext,
    root: &Path,
    processed: &ProcessedDocument,
    id: &str,
) -> Result<PublishReceipt> {
    let target = DirectoryTarget::new(root, ctx.config.site.docs_dir.clone());
    let receipt = target
        .publish(processed.publish_request(format!("Update documentation from {}", id)))
        .await?;

    if ctx.config.output.write_analysis {
        write_file(
            &root.join(ANALYSIS_FILE),
            &serde_json::to_string_pretty(&processed.analysis)?,
        )?;
    }
    Ok(receipt)
}

fn report(output: &Output, id: &str, processed: &ProcessedDocument, receipt: &PublishReceipt) {
    output.success(&format!(
        "{} → {} ({} pages, {} written, {} unchanged)",
        id,
        receipt.target,
        processed.pages.len(),
        receipt.written.len(),
        receipt.unchanged.len()
    ));
    for error in &processed.report.errors {
        output.warning(&format!("navigation: {}", error));
    }
    for diagnostic in processed.analysis.warnings() {
        output.diagnostic(diagnostic);
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
