//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//!
//! ## Error Kinds
//!
//! - **Caller mistakes**: unknown template, invalid template, empty input.
//!   These fail the single request that caused them.
//! - **System errors**: IO and (de)serialization, converted automatically.
//! - **Collaborator errors**: document source and publish target failures.
//!
//! Structural irregularities inside a document are never errors. They are
//! collected as [`Diagnostic`](super::Diagnostic) records instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeaveError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Template '{name}' not found. Available templates: {}", available.join(", "))]
    TemplateNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Document is empty")]
    EmptyInput,

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    #[error("Failed to fetch document '{id}': {message}")]
    Source { id: String, message: String },

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WeaveError>;

impl WeaveError {
    /// Create a template-not-found error carrying the known template names
    pub fn template_not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::TemplateNotFound {
            name: name.into(),
            available,
        }
    }

    /// Create an invalid-template error
    pub fn invalid_template(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a document-source error
    pub fn source(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's request rather than the system.
    ///
    /// Caller mistakes fail a single document; the remaining documents of a
    /// batch are still processed.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. } | Self::InvalidTemplate { .. } | Self::EmptyInput
        )
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error, producing a `WeaveError::Config`
    fn config_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn config_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| WeaveError::Config(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_lists_names() {
        let err = WeaveError::template_not_found(
            "nonexistent_template",
            vec!["minimal".to_string(), "standard_docs".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "Template 'nonexistent_template' not found. Available templates: minimal, standard_docs"
        );
        assert!(err.is_request_error());
    }

    #[test]
    fn test_system_errors_are_not_request_errors() {
        let err: WeaveError = std::io::Error::other("disk").into();
        assert!(!err.is_request_error());
        assert!(WeaveError::EmptyInput.is_request_error());
    }

    #[test]
    fn test_config_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("missing"));
        let err = result.config_context("Reading templates").unwrap_err();
        assert_eq!(err.to_string(), "Config error: Reading templates: missing");
    }
}
