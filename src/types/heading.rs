use serde::{Deserialize, Serialize};

use super::Category;

/// Location of a heading in the source text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// Byte offset of the start of the heading line
    pub offset: usize,
}

/// A single ATX heading recognized in the source document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingRecord {
    /// Nesting depth, 1-6
    pub level: u8,
    /// Literal heading text including any leading emoji (used for rendering)
    pub text: String,
    /// Heading text with the leading emoji removed (used for classification)
    pub label: String,
    /// Leading pictographic glyph, if any
    pub emoji: Option<String>,
    pub position: Position,
    /// Assigned by the section classifier
    pub category: Option<Category>,
}

impl HeadingRecord {
    pub fn new(level: u8, text: impl Into<String>, position: Position) -> Self {
        let text = text.into();
        let (emoji, label) = match crate::analyzer::emoji::split_leading_emoji(&text) {
            Some((emoji, rest)) => (Some(emoji.to_string()), rest.trim().to_string()),
            None => (None, text.clone()),
        };
        Self {
            level,
            text,
            label,
            emoji,
            position,
            category: None,
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// Category, treating an unclassified heading as uncategorized
    pub fn category_or_default(&self) -> Category {
        self.category.clone().unwrap_or(Category::Uncategorized)
    }

    /// Heading as it appears in source markup
    pub fn markup(&self) -> String {
        format!("{} {}", "#".repeat(self.level as usize), self.text)
    }
}
