//! Template Engine
//!
//! - [`definition`]: serde shape of a formatting profile
//! - [`builtin`]: `standard_docs`, `technical_docs`, `project_docs`, `minimal`
//! - [`registry`]: named store, YAML import/export
//! - [`engine`]: frontmatter, TOC and formatting passes

pub mod builtin;
pub mod definition;
pub mod engine;
pub mod registry;

pub use definition::{
    FormattingFlags, HeadingStyle, SectionRequirement, StructureFlags, TemplateDefinition,
};
pub use engine::{TemplateEngine, check_sections, render};
pub use registry::{SharedTemplateRegistry, TemplateInfo, TemplateKind, TemplateRegistry};
