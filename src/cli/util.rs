//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ConfigLoader};
use crate::pipeline::DocumentProcessor;
use crate::types::{Result, WeaveError};

/// Command execution context
///
/// Loaded configuration plus a processor built from it. Created once per
/// invocation and shared by the command handlers.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub processor: Arc<DocumentProcessor>,
}

impl CommandContext {
    /// Load context from the resolution chain, or from `config_file` alone when given
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let processor = Arc::new(DocumentProcessor::from_config(&config)?);
        Ok(Self { config, processor })
    }

    /// Output directory: CLI override, else configured
    pub fn output_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir.unwrap_or_else(|| self.config.output.dir.clone())
    }

    /// Template name: CLI override, else configured default
    pub fn template_name(&self, override_name: Option<String>) -> String {
        override_name.unwrap_or_else(|| self.config.templates.default.clone())
    }
}

/// Read a UTF-8 document from disk
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| WeaveError::source(path.display().to_string(), e.to_string()))
}

/// File stem used to name per-document outputs
pub fn document_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

/// Write a file, creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
