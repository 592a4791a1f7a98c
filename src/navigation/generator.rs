//! Navigation Generator
//!
//! Walks the structure tree and produces the nested navigation:
//! roots map to `{slug}/index.md`, descendants to `{root_slug}/{slug}.md`.
//! Slugs are disambiguated per directory in document order, which keeps
//! every file path unique across the whole navigation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::slug::SlugScope;
use crate::analyzer::tree::{NodeId, StructureNode, StructureTree};
use crate::config::NavigationConfig;
use crate::constants::navigation::{INDEX_FILE, MAX_TITLE_LEN};
use crate::types::{Category, Diagnostic};

/// Single navigation item, serializable to the site generator's nav shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub title: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationEntry>,
}

impl NavigationEntry {
    pub fn leaf(title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// This entry and all descendants, depth-first
    pub fn walk(&self) -> Vec<&NavigationEntry> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Path assigned to one structure node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAssignment {
    pub node: NodeId,
    /// Disambiguated slug
    pub slug: String,
    pub file: String,
}

/// Generator output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub entries: Vec<NavigationEntry>,
    /// One assignment per tree node, indexed by node id
    pub assignments: Vec<PathAssignment>,
    /// Slug collision notes
    pub diagnostics: Vec<Diagnostic>,
}

impl Navigation {
    pub fn file_for(&self, node: NodeId) -> Option<&str> {
        self.assignments.get(node).map(|a| a.file.as_str())
    }

    pub fn slug_for(&self, node: NodeId) -> Option<&str> {
        self.assignments.get(node).map(|a| a.slug.as_str())
    }

    /// All entries depth-first
    pub fn flatten(&self) -> Vec<&NavigationEntry> {
        self.entries.iter().flat_map(|e| e.walk()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationGenerator {
    options: NavigationConfig,
}

impl NavigationGenerator {
    pub fn new(options: NavigationConfig) -> Self {
        Self { options }
    }

    pub fn generate(&self, tree: &StructureTree) -> Navigation {
        let assignments = self.assign_paths(tree);
        let mut navigation = Navigation {
            entries: Vec::with_capacity(tree.roots().len()),
            assignments: assignments.0,
            diagnostics: assignments.1,
        };

        for &root in tree.roots() {
            let entry = self.build_entry(tree, root, &navigation.assignments);
            navigation.entries.push(entry);
        }

        tracing::debug!(
            "Generated navigation: {} top-level entries, {} files",
            navigation.entries.len(),
            navigation.assignments.len()
        );
        navigation
    }

    /// Assign a unique file to every node in document order
    fn assign_paths(&self, tree: &StructureTree) -> (Vec<PathAssignment>, Vec<Diagnostic>) {
        let mut assignments: Vec<PathAssignment> = Vec::with_capacity(tree.len());
        let mut diagnostics = Vec::new();
        let mut root_scope = SlugScope::new();
        let mut scopes: HashMap<NodeId, SlugScope> = HashMap::new();
        let mut site_index_taken = false;

        for (id, node) in tree.nodes().iter().enumerate() {
            let (allocated, file) = match node.parent {
                None => {
                    let allocated = root_scope.allocate(&node.slug);
                    let use_site_index = self.options.home_index
                        && !site_index_taken
                        && node.heading.category_or_default() == Category::Home;
                    let file = if use_site_index {
                        site_index_taken = true;
                        INDEX_FILE.to_string()
                    } else {
                        format!("{}/{}", allocated.slug, INDEX_FILE)
                    };
                    (allocated, file)
                }
                Some(_) => {
                    let root = tree.root_of(id);
                    let dir = assignments[root].slug.clone();
                    let scope = scopes
                        .entry(root)
                        .or_insert_with(|| SlugScope::with_reserved(["index"]));
                    let allocated = scope.allocate(&node.slug);
                    let file = format!("{}/{}.md", dir, allocated.slug);
                    (allocated, file)
                }
            };

            if allocated.collided {
                tracing::info!(
                    "Line {}: slug '{}' for '{}' already used, assigned '{}'",
                    node.heading.line(),
                    node.slug,
                    node.heading.text,
                    allocated.slug
                );
                diagnostics.push(Diagnostic::slug_collision(
                    node.heading.line(),
                    node.heading.text.clone(),
                    &node.slug,
                    &allocated.slug,
                ));
            }

            assignments.push(PathAssignment {
                node: id,
                slug: allocated.slug,
                file,
            });
        }

        (assignments, diagnostics)
    }

    fn build_entry(
        &self,
        tree: &StructureTree,
        id: NodeId,
        assignments: &[PathAssignment],
    ) -> NavigationEntry {
        let node = tree.node(id);
        NavigationEntry {
            title: self.title_for(node),
            file: assignments[id].file.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.build_entry(tree, child, assignments))
                .collect(),
        }
    }

    /// Human-readable label for a node
    pub fn title_for(&self, node: &StructureNode) -> String {
        let base = if self.options.emoji_in_titles {
            node.heading.text.trim()
        } else {
            node.heading.label.trim()
        };
        if base.is_empty() {
            return node.heading.category_or_default().display_name();
        }
        clean_title(base)
    }
}

/// Shorten overlong titles at the first sentence break
pub fn clean_title(title: &str) -> String {
    let first_line = title.lines().next().unwrap_or(title).trim();
    if first_line.chars().count() <= MAX_TITLE_LEN {
        return first_line.to_string();
    }
    let cut = first_line
        .find(['.', '!', '?', ':', ';'])
        .map(|idx| first_line[..idx].trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(first_line);
    cut.chars().take(MAX_TITLE_LEN).collect::<String>().trim().to_string()
}
