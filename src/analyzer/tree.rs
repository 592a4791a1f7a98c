//! Structure Tree Builder
//!
//! Assembles the ordered heading sequence into a forest using a stack of
//! open ancestors. Nodes live in an arena in document order; children are
//! ordered id lists and parents are plain ids, so there is no shared
//! ownership between nodes.
//!
//! The builder never fails. A heading that jumps more than one level below
//! its nearest open ancestor is attached to that ancestor and reported as a
//! `HierarchyGap` diagnostic.

use std::ops::Range;

use crate::constants::navigation::DEFAULT_MAX_SLUG_LEN;
use crate::navigation::slug::slugify;
use crate::types::{Diagnostic, HeadingRecord};

/// Index of a node in its tree's arena
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureNode {
    pub heading: HeadingRecord,
    /// Direct children in document order
    pub children: Vec<NodeId>,
    /// Non-owning back-reference; `None` for roots
    pub parent: Option<NodeId>,
    /// Path-safe identifier derived from the heading label
    pub slug: String,
    /// Distance from the root (roots are 0)
    pub depth: usize,
    body_end: usize,
    own_end: usize,
}

impl StructureNode {
    pub fn level(&self) -> u8 {
        self.heading.level
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Immutable heading forest for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureTree {
    nodes: Vec<StructureNode>,
    roots: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

/// Builder configuration
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    max_slug_len: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            max_slug_len: DEFAULT_MAX_SLUG_LEN,
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_slug_len(mut self, len: usize) -> Self {
        self.max_slug_len = len.max(1);
        self
    }

    /// Build the tree from headings in document order.
    ///
    /// `source_len` is the byte length of the document, used to close the
    /// body span of the last open sections.
    pub fn build(&self, headings: Vec<HeadingRecord>, source_len: usize) -> StructureTree {
        let mut nodes: Vec<StructureNode> = Vec::with_capacity(headings.len());
        let mut roots = Vec::new();
        let mut diagnostics = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();

        for heading in headings {
            let level = heading.level;
            let offset = heading.offset();

            if let Some(prev) = nodes.last_mut() {
                prev.own_end = offset;
            }

            while let Some(&top) = open.last() {
                if nodes[top].level() >= level {
                    nodes[top].body_end = offset;
                    open.pop();
                } else {
                    break;
                }
            }

            let id = nodes.len();
            let parent = open.last().copied();

            if let Some(parent_id) = parent {
                let parent_level = nodes[parent_id].level();
                if level > parent_level + 1 {
                    tracing::warn!(
                        "Line {}: heading '{}' jumps from level {} to {}",
                        heading.line(),
                        heading.text,
                        parent_level,
                        level
                    );
                    diagnostics.push(Diagnostic::hierarchy_gap(
                        heading.line(),
                        heading.text.clone(),
                        parent_level,
                        level,
                    ));
                }
                nodes[parent_id].children.push(id);
            } else {
                roots.push(id);
            }

            let depth = parent.map(|p| nodes[p].depth + 1).unwrap_or(0);
            let slug = slugify(&heading.label, self.max_slug_len);

            nodes.push(StructureNode {
                heading,
                children: Vec::new(),
                parent,
                slug,
                depth,
                body_end: source_len,
                own_end: source_len,
            });
            open.push(id);
        }

        tracing::debug!(
            "Built structure tree: {} nodes, {} roots, {} gaps",
            nodes.len(),
            roots.len(),
            diagnostics.len()
        );

        StructureTree {
            nodes,
            roots,
            diagnostics,
        }
    }
}

impl StructureTree {
    /// Build with default settings
    pub fn build(headings: Vec<HeadingRecord>, source_len: usize) -> Self {
        TreeBuilder::default().build(headings, source_len)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &StructureNode {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&StructureNode> {
        self.nodes.get(id)
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[StructureNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hierarchy-gap warnings collected during the build
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Walk parent links up to the root, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(id).and_then(|n| n.parent),
        }
    }

    /// Root of the subtree containing `id`
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Node ids in depth-first pre-order, following child links
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        order
    }

    /// Byte range from the heading to the next heading of equal or lower level
    pub fn body_span(&self, id: NodeId) -> Range<usize> {
        let node = &self.nodes[id];
        node.heading.offset()..node.body_end
    }

    /// Byte range from the heading to the next heading of any level
    pub fn own_span(&self, id: NodeId) -> Range<usize> {
        let node = &self.nodes[id];
        node.heading.offset()..node.own_end
    }

    /// Section text after the heading line and before the first subsection
    pub fn own_content<'s>(&self, id: NodeId, source: &'s str) -> &'s str {
        let span = self.own_span(id);
        let section = source.get(span).unwrap_or_default();
        match section.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.nodes.iter().map(|n| n.level()).max().unwrap_or(0)
    }
}

/// Iterator over a node's ancestors
pub struct Ancestors<'t> {
    tree: &'t StructureTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.nodes[current].parent;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extractor::extract;
    use crate::types::{DiagnosticKind, Position};
    use proptest::prelude::*;

    fn tree_for(text: &str) -> StructureTree {
        StructureTree::build(extract(text).headings, text.len())
    }

    #[test]
    fn test_simple_nesting() {
        let tree = tree_for("# 🏠 Home\n## 📚 About\n### Pillars\n");
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.node(0).children, vec![1]);
        assert_eq!(tree.node(1).children, vec![2]);
        assert_eq!(tree.node(2).parent, Some(1));
        assert_eq!(tree.node(2).depth, 2);
        assert!(tree.diagnostics().is_empty());
    }

    #[test]
    fn test_gap_attaches_to_nearest_ancestor() {
        let tree = tree_for("# Title\n### Skipped\n");
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.node(0).children, vec![1]);

        let diags = tree.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::HierarchyGap);
        assert_eq!(diags[0].text, "Skipped");
        assert_eq!(diags[0].line, 2);
    }

    #[test]
    fn test_sibling_after_deeper_section() {
        let tree = tree_for("# A\n### B\n## C\n# D\n## E\n");
        assert_eq!(tree.roots(), &[0, 3]);
        assert_eq!(tree.node(0).children, vec![1, 2]);
        assert_eq!(tree.node(3).children, vec![4]);
        assert_eq!(tree.root_of(2), 0);
        assert_eq!(tree.ancestors(4).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_first_heading_below_level_one_is_root() {
        let tree = tree_for("### Deep start\n## Next\n");
        assert_eq!(tree.roots(), &[0, 1]);
        assert!(tree.diagnostics().is_empty());
    }

    #[test]
    fn test_empty_document() {
        let tree = tree_for("");
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
        assert!(tree.diagnostics().is_empty());
        assert_eq!(tree.max_depth(), 0);
    }

    #[test]
    fn test_spans() {
        let text = "# A\na body\n## B\nb body\n# C\nc body\n";
        let tree = tree_for(text);

        let a_body = &text[tree.body_span(0)];
        assert_eq!(a_body, "# A\na body\n## B\nb body\n");
        let a_own = &text[tree.own_span(0)];
        assert_eq!(a_own, "# A\na body\n");
        assert_eq!(tree.own_content(2, text), "c body\n");
    }

    #[test]
    fn test_slug_is_derived_from_label() {
        let tree = tree_for("# 🚀 Getting Started!\n");
        assert_eq!(tree.node(0).slug, "getting-started");
    }

    fn headings_from_levels(levels: &[u8]) -> Vec<HeadingRecord> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                HeadingRecord::new(
                    *level,
                    format!("Heading {}", i),
                    Position {
                        line: i + 1,
                        offset: i * 16,
                    },
                )
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_child_level_exceeds_parent(levels in prop::collection::vec(1u8..=6, 0..40)) {
            let tree = StructureTree::build(headings_from_levels(&levels), levels.len() * 16);
            for node in tree.nodes() {
                if let Some(parent) = node.parent {
                    prop_assert!(node.level() > tree.node(parent).level());
                }
            }
        }

        #[test]
        fn prop_depth_first_equals_document_order(levels in prop::collection::vec(1u8..=6, 0..40)) {
            let tree = StructureTree::build(headings_from_levels(&levels), levels.len() * 16);
            let expected: Vec<NodeId> = (0..levels.len()).collect();
            prop_assert_eq!(tree.depth_first(), expected);
        }

        #[test]
        fn prop_roots_exist_when_headings_exist(levels in prop::collection::vec(1u8..=6, 1..40)) {
            let tree = StructureTree::build(headings_from_levels(&levels), levels.len() * 16);
            prop_assert!(!tree.roots().is_empty());
        }

        #[test]
        fn prop_build_is_deterministic(levels in prop::collection::vec(1u8..=6, 0..40)) {
            let first = StructureTree::build(headings_from_levels(&levels), 0);
            let second = StructureTree::build(headings_from_levels(&levels), 0);
            prop_assert_eq!(first, second);
        }
    }
}
