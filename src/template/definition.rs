//! Template Definition Types
//!
//! Serde shape of a formatting profile. The same shape is used for the
//! built-in templates and for custom template files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::heading::MAX_LEVEL;

/// Named formatting profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Registry key, e.g. `standard_docs`
    #[serde(default)]
    pub name: String,
    /// Human-readable name, written to frontmatter
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub structure: StructureFlags,
    #[serde(default)]
    pub sections: Vec<SectionRequirement>,
    #[serde(default)]
    pub formatting: FormattingFlags,
}

impl TemplateDefinition {
    /// Sections the document must contain
    pub fn required_sections(&self) -> impl Iterator<Item = &SectionRequirement> {
        self.sections.iter().filter(|s| s.required)
    }

    /// Check the definition is usable; returns the first problem found
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("template name must not be empty".to_string());
        }
        if self.display_name.trim().is_empty() {
            return Err("display_name must not be empty".to_string());
        }
        for section in &self.sections {
            if section.level == 0 || usize::from(section.level) > MAX_LEVEL {
                return Err(format!(
                    "section '{}' has level {} (expected 1-{})",
                    section.title, section.level, MAX_LEVEL
                ));
            }
            if section.title.trim().is_empty() {
                return Err("section title must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Document-level features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureFlags {
    pub frontmatter: bool,
    pub toc: bool,
    pub breadcrumbs: bool,
    pub edit_uri: bool,
    pub search: bool,
}

impl Default for StructureFlags {
    fn default() -> Self {
        Self {
            frontmatter: true,
            toc: true,
            breadcrumbs: true,
            edit_uri: true,
            search: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequirement {
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub title: String,
    #[serde(default)]
    pub required: bool,
}

impl SectionRequirement {
    pub fn new(level: u8, emoji: Option<&str>, title: &str, required: bool) -> Self {
        Self {
            level,
            emoji: emoji.map(str::to_string),
            title: title.to_string(),
            required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// Underlined levels 1-2
    Setext,
}

impl fmt::Display for HeadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingStyle::Atx => write!(f, "atx"),
            HeadingStyle::Setext => write!(f, "setext"),
        }
    }
}

/// Content-level formatting passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingFlags {
    /// Keep leading emoji in headings
    pub emojis: bool,
    pub heading_style: HeadingStyle,
    pub code_blocks: bool,
    pub admonitions: bool,
    pub tables: bool,
    pub syntax_highlighting: bool,
}

impl Default for FormattingFlags {
    fn default() -> Self {
        Self {
            emojis: true,
            heading_style: HeadingStyle::Atx,
            code_blocks: true,
            admonitions: true,
            tables: true,
            syntax_highlighting: false,
        }
    }
}
