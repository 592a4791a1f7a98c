//! docweave - Markdown Structure and Navigation Engine
//!
//! Takes one heading-structured Markdown document and produces everything a
//! static documentation site needs: template-conformant content, one page per
//! section, MkDocs navigation and a structure analysis report.
//!
//! ## Core Features
//!
//! - **Heading Analysis**: ATX extraction outside code fences, hierarchy-gap detection
//! - **Classification**: emoji and keyword rules mapping sections to categories
//! - **Navigation**: collision-free file paths and nested `nav:` YAML
//! - **Templates**: built-in and YAML-defined formatting templates
//! - **Collaborators**: pluggable document sources and publish targets
//!
//! ## Quick Start
//!
//! ```ignore
//! use docweave::{DocumentProcessor, Metadata};
//!
//! let processor = DocumentProcessor::default();
//! let doc = processor.process("# 🏠 Home\n## 📚 About\n", "standard_docs", &Metadata::new())?;
//! println!("{}", doc.navigation);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: heading extraction, classification, structure tree, analysis
//! - [`navigation`]: slugs, navigation entries, MkDocs output
//! - [`template`]: template definitions, registry and rendering
//! - [`pipeline`]: end-to-end document processing
//! - [`providers`]: document source and publish target traits
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod navigation;
pub mod pipeline;
pub mod providers;
pub mod template;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{Result, ResultExt, WeaveError};

// Domain Types
pub use types::{Category, Diagnostic, DiagnosticKind, HeadingRecord, Metadata, Severity};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{Analysis, DocumentProcessor, ProcessedDocument};

pub use analyzer::{StructureAnalysis, StructureTree};
pub use navigation::{Navigation, NavigationEntry, NavigationGenerator};
pub use template::{TemplateDefinition, TemplateEngine, TemplateRegistry};

pub use providers::{
    DirectoryTarget, DocumentSource, LocalFileSource, PublishReceipt, PublishRequest,
    PublishTarget,
};
