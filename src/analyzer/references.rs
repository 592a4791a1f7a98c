//! Cross-reference extraction
//!
//! Finds Markdown links in each section's own body. In-document anchor
//! links (`#anchor`) are resolved to the navigation file of the heading they
//! point at, since splitting the document into pages breaks bare anchors.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::extractor::FenceTracker;
use super::tree::{NodeId, StructureTree};
use crate::navigation::Navigation;
use crate::navigation::slug::{AnchorSet, anchor};
use crate::types::{Diagnostic, DiagnosticKind};

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]]*)\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `#anchor` inside this document
    Anchor,
    /// Relative link to another page
    Page,
    /// Absolute URL or mailto
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    /// Section containing the link
    pub from: NodeId,
    pub from_title: String,
    pub text: String,
    pub url: String,
    pub line: usize,
    pub kind: ReferenceKind,
    /// Navigation file (plus anchor) the link resolves to
    pub resolved: Option<String>,
}

fn classify_url(url: &str) -> ReferenceKind {
    if url.starts_with('#') {
        ReferenceKind::Anchor
    } else if url.contains("://") || url.starts_with("mailto:") {
        ReferenceKind::External
    } else {
        ReferenceKind::Page
    }
}

/// Map each heading's document-wide TOC anchor to its page and in-page anchor.
///
/// Every heading opens its own page, so on that page its anchor carries no
/// duplicate suffix.
fn anchor_targets(tree: &StructureTree, navigation: &Navigation) -> HashMap<String, String> {
    let mut anchors = AnchorSet::new();
    let mut targets = HashMap::with_capacity(tree.len());
    for (id, node) in tree.nodes().iter().enumerate() {
        let document_anchor = anchors.unique(&node.heading.text);
        if let Some(file) = navigation.file_for(id) {
            let target = match anchor(&node.heading.text) {
                page_anchor if page_anchor.is_empty() => file.to_string(),
                page_anchor => format!("{}#{}", file, page_anchor),
            };
            targets.insert(document_anchor, target);
        }
    }
    targets
}

/// Collect links from every section and resolve in-document anchors
pub fn resolve(
    source: &str,
    tree: &StructureTree,
    navigation: &Navigation,
) -> (Vec<CrossReference>, Vec<Diagnostic>) {
    let targets = anchor_targets(tree, navigation);
    let mut references = Vec::new();
    let mut diagnostics = Vec::new();

    for (id, node) in tree.nodes().iter().enumerate() {
        let body = tree.own_content(id, source);
        let mut fences = FenceTracker::default();

        for (i, line) in body.lines().enumerate() {
            if fences.observe(line) {
                continue;
            }
            let line_no = node.heading.line() + 1 + i;

            for caps in LINK_RE.captures_iter(line) {
                if &caps[1] == "!" {
                    continue;
                }
                let text = caps[2].to_string();
                let url = caps[3].to_string();
                let kind = classify_url(&url);

                let resolved = match kind {
                    ReferenceKind::Anchor => {
                        let found = targets.get(&url[1..]).cloned();
                        if found.is_none() {
                            diagnostics.push(Diagnostic::new(
                                DiagnosticKind::UnresolvedReference,
                                line_no,
                                line.trim(),
                                format!("Link '{}' points at unknown anchor '{}'", text, url),
                            ));
                        }
                        found
                    }
                    _ => None,
                };

                references.push(CrossReference {
                    from: id,
                    from_title: node.heading.label.clone(),
                    text,
                    url,
                    line: line_no,
                    kind,
                    resolved,
                });
            }
        }
    }

    tracing::debug!(
        "Found {} cross references ({} unresolved)",
        references.len(),
        diagnostics.len()
    );
    (references, diagnostics)
}
