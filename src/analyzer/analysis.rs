//! Structure Analysis
//!
//! Serializable record of one analysis pass: per-heading summaries,
//! collected diagnostics, document statistics and cross references.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::references::{self, CrossReference};
use super::tree::{NodeId, StructureTree};
use crate::constants::stats::SECTIONS_PER_PAGE;
use crate::constants::template::DEFAULT_TEMPLATE;
use crate::navigation::Navigation;
use crate::types::{Category, Diagnostic, DiagnosticKind, Severity, count_kind};

/// Keywords suggesting the technical template
const TECHNICAL_HINTS: &[&str] = &["api", "reference", "technical", "code"];
/// Keywords suggesting the project template
const PROJECT_HINTS: &[&str] = &["team", "process", "project", "goals"];

/// One heading as exposed in the analysis output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingSummary {
    pub level: u8,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub category: Category,
    pub slug: String,
    pub file: String,
    pub line: usize,
    pub offset: usize,
    /// Index of the parent heading in the summary list
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_sections: usize,
    pub max_depth: u8,
    pub estimated_pages: usize,
}

impl DocumentStats {
    pub fn from_tree(tree: &StructureTree) -> Self {
        let total_sections = tree.len();
        let estimated_pages = if total_sections == 0 {
            0
        } else {
            (total_sections / SECTIONS_PER_PAGE).max(1)
        };
        Self {
            total_sections,
            max_depth: tree.max_depth(),
            estimated_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub headings: Vec<HeadingSummary>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: DocumentStats,
    pub suggested_template: String,
    pub cross_references: Vec<CrossReference>,
    /// SHA-256 of the analyzed text, hex encoded
    pub content_digest: String,
}

impl StructureAnalysis {
    /// Assemble the analysis record from the outputs of one pass.
    ///
    /// `extraction` holds the extractor's malformed-heading diagnostics;
    /// tree, navigation and reference diagnostics are merged in and the
    /// whole list is ordered by source line.
    pub fn build(
        source: &str,
        extraction: Vec<Diagnostic>,
        tree: &StructureTree,
        navigation: &Navigation,
    ) -> Self {
        let headings = tree
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, node)| HeadingSummary {
                level: node.level(),
                text: node.heading.text.clone(),
                emoji: node.heading.emoji.clone(),
                category: node.heading.category_or_default(),
                slug: navigation
                    .slug_for(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| node.slug.clone()),
                file: navigation.file_for(id).unwrap_or_default().to_string(),
                line: node.heading.line(),
                offset: node.heading.offset(),
                parent: node.parent,
            })
            .collect();

        let (cross_references, unresolved) = references::resolve(source, tree, navigation);

        let mut diagnostics = extraction;
        diagnostics.extend_from_slice(tree.diagnostics());
        diagnostics.extend_from_slice(&navigation.diagnostics);
        diagnostics.extend(unresolved);
        diagnostics.sort_by_key(|d| d.line);

        Self {
            headings,
            diagnostics,
            stats: DocumentStats::from_tree(tree),
            suggested_template: suggest_template(tree),
            cross_references,
            content_digest: content_digest(source),
        }
    }

    /// Diagnostics at warning severity or worse
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity <= Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        count_kind(&self.diagnostics, kind)
    }
}

/// Pick a template from the vocabulary of the heading labels
pub fn suggest_template(tree: &StructureTree) -> String {
    let joined = tree
        .nodes()
        .iter()
        .map(|n| n.heading.label.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if TECHNICAL_HINTS.iter().any(|w| joined.contains(w)) {
        "technical_docs".to_string()
    } else if PROJECT_HINTS.iter().any(|w| joined.contains(w)) {
        "project_docs".to_string()
    } else {
        DEFAULT_TEMPLATE.to_string()
    }
}

pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
