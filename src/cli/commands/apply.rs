//! Apply Command
//!
//! Reformats a single document with a template and writes `<stem>_formatted.md`.

use std::path::{Path, PathBuf};

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, document_stem, read_document, write_file};
use crate::constants::output::FORMATTED_SUFFIX;
use crate::template;
use crate::types::{Metadata, Result, WeaveError};

pub fn run(
    ctx: &CommandContext,
    file: &Path,
    template_name: Option<String>,
    output_dir: Option<PathBuf>,
    meta: &[String],
) -> Result<()> {
    let text = read_document(file)?;
    if text.trim().is_empty() {
        return Err(WeaveError::EmptyInput);
    }

    let name = ctx.template_name(template_name);
    let definition = ctx.processor.templates().get(&name)?;
    let metadata = parse_metadata(meta)?;
    let formatted = template::render(&text, definition, &metadata)?;

    let analysis = ctx.processor.analyze(&text).analysis;
    let output = Output::new();
    for diagnostic in template::check_sections(definition, &analysis) {
        output.diagnostic(&diagnostic);
    }

    let path = ctx
        .output_dir(output_dir)
        .join(format!("{}{}", document_stem(file), FORMATTED_SUFFIX));
    write_file(&path, &formatted)?;
    output.success(&format!(
        "Applied '{}' to {} → {}",
        definition.display_name,
        file.display(),
        path.display()
    ));
    Ok(())
}

/// Parse `key=value` pairs given on the command line
pub fn parse_metadata(pairs: &[String]) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(WeaveError::Config(format!(
                "metadata must be key=value, got '{}'",
                pair
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(WeaveError::Config(format!("metadata key is empty in '{}'", pair)));
        }
        metadata.insert(key, value.trim());
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_metadata() {
        let metadata =
            parse_metadata(&["title=Handbook".to_string(), "author = Ops ".to_string()]).unwrap();
        assert_eq!(metadata.get_str("title"), Some("Handbook"));
        assert_eq!(metadata.get_str("author"), Some("Ops"));

        assert!(parse_metadata(&["no-separator".to_string()]).is_err());
        assert!(parse_metadata(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_apply_writes_formatted_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Home\n\n## About\nText\n").unwrap();

        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let ctx = CommandContext::load(Some(&config_path)).unwrap();

        let out = dir.path().join("out");
        run(&ctx, &input, Some("minimal".into()), Some(out.clone()), &[]).unwrap();

        let written = std::fs::read_to_string(out.join("guide_formatted.md")).unwrap();
        assert_eq!(written, "# Home\n\n## About\nText\n");
    }

    #[test]
    fn test_apply_unknown_template() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Home\n").unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let ctx = CommandContext::load(Some(&config_path)).unwrap();

        let err = run(&ctx, &input, Some("nope".into()), Some(dir.path().into()), &[]).unwrap_err();
        assert!(matches!(err, WeaveError::TemplateNotFound { .. }));
    }
}
