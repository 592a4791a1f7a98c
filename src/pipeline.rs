//! Document Pipeline
//!
//! Wires the core together: extraction → classification → tree →
//! navigation, plus template application and page splitting. One
//! `DocumentProcessor` is built at startup and shared across workers;
//! every pass is a pure function of the input and the registry snapshot.

use futures::StreamExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analyzer::classifier::{CategoryRegistry, SectionClassifier, SharedCategoryRegistry};
use crate::analyzer::extractor::HeadingExtractor;
use crate::analyzer::tree::{StructureTree, TreeBuilder};
use crate::analyzer::StructureAnalysis;
use crate::config::{Config, NavigationConfig, SiteConfig};
use crate::navigation::{
    Navigation, NavigationGenerator, NavigationReport, nav_yaml, site_config, validate,
};
use crate::providers::{DocumentSource, PublishReceipt, PublishRequest, PublishTarget};
use crate::template::{self, SharedTemplateRegistry, TemplateDefinition, TemplateRegistry};
use crate::types::{Metadata, Result, WeaveError};

/// Output of one analysis pass
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tree: StructureTree,
    pub navigation: Navigation,
    pub analysis: StructureAnalysis,
}

/// Output of the full pipeline for one document
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub template: String,
    /// Whole document formatted with the template
    pub formatted: String,
    /// One page per section, keyed by navigation file
    pub pages: BTreeMap<String, String>,
    /// Standalone `nav:` document
    pub navigation: String,
    /// Site configuration fragment
    pub site_config: String,
    pub report: NavigationReport,
    pub analysis: StructureAnalysis,
}

impl ProcessedDocument {
    pub fn publish_request(&self, message: impl Into<String>) -> PublishRequest {
        PublishRequest {
            pages: self.pages.clone(),
            navigation: self.navigation.clone(),
            site_config: Some(self.site_config.clone()),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    categories: SharedCategoryRegistry,
    templates: SharedTemplateRegistry,
    navigation: NavigationConfig,
    site: SiteConfig,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(
            CategoryRegistry::builtin().into_shared(),
            TemplateRegistry::builtin().into_shared(),
            NavigationConfig::default(),
        )
    }
}

impl DocumentProcessor {
    pub fn new(
        categories: SharedCategoryRegistry,
        templates: SharedTemplateRegistry,
        navigation: NavigationConfig,
    ) -> Self {
        Self {
            categories,
            templates,
            navigation,
            site: SiteConfig::default(),
        }
    }

    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = site;
        self
    }

    /// Build registries from configuration, loading custom templates if configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let categories = CategoryRegistry::from_config(&config.classification);

        let mut templates = TemplateRegistry::builtin();
        if let Some(dir) = &config.templates.custom_dir {
            templates.load_dir(dir)?;
        }

        Ok(Self::new(
            categories.into_shared(),
            templates.into_shared(),
            config.navigation.clone(),
        )
        .with_site(config.site.clone()))
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Run extraction, classification, tree building and navigation
    pub fn analyze(&self, text: &str) -> Analysis {
        let extraction = HeadingExtractor::new(text).extract();
        let mut headings = extraction.headings;
        SectionClassifier::new(&self.categories).classify_all(&mut headings);

        let tree = TreeBuilder::new()
            .max_slug_len(self.navigation.max_slug_len)
            .build(headings, text.len());
        let navigation = NavigationGenerator::new(self.navigation.clone()).generate(&tree);
        let analysis = StructureAnalysis::build(text, extraction.diagnostics, &tree, &navigation);

        debug!(
            "Analyzed {} sections, {} diagnostics",
            analysis.stats.total_sections,
            analysis.diagnostics.len()
        );
        Analysis {
            tree,
            navigation,
            analysis,
        }
    }

    /// Full pipeline for one document.
    ///
    /// Blank input fails with `EmptyInput`; an unknown template fails with
    /// `TemplateNotFound` before any work is done.
    pub fn process(
        &self,
        text: &str,
        template: &str,
        metadata: &Metadata,
    ) -> Result<ProcessedDocument> {
        if text.trim().is_empty() {
            return Err(WeaveError::EmptyInput);
        }
        let definition = self.templates.get(template)?;

        let Analysis {
            tree,
            navigation,
            mut analysis,
        } = self.analyze(text);
        analysis
            .diagnostics
            .extend(template::check_sections(definition, &analysis));

        let formatted = template::render(text, definition, metadata)?;
        let pages = self.split_pages(text, &tree, &navigation, definition, metadata)?;
        let report = validate(&navigation.entries);
        if !report.is_valid {
            for error in &report.errors {
                warn!("Navigation: {}", error);
            }
        }

        info!(
            "Processed document: {} pages, template '{}'",
            pages.len(),
            template
        );

        Ok(ProcessedDocument {
            template: template.to_string(),
            formatted,
            pages,
            navigation: nav_yaml(&navigation.entries)?,
            site_config: site_config(&self.site, definition, &navigation.entries)?,
            report,
            analysis,
        })
    }

    /// Render each section's own content as a page titled by its navigation entry
    fn split_pages(
        &self,
        text: &str,
        tree: &StructureTree,
        navigation: &Navigation,
        definition: &TemplateDefinition,
        metadata: &Metadata,
    ) -> Result<BTreeMap<String, String>> {
        let mut page_template = definition.clone();
        page_template.structure.toc = false;
        let generator = NavigationGenerator::new(self.navigation.clone());

        // Text between any frontmatter and the first heading opens the first page
        let body_start = HeadingExtractor::new(text).body_start();
        let preamble = tree
            .get(0)
            .and_then(|first| text.get(body_start..first.heading.offset()))
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_default();

        let mut pages = BTreeMap::new();
        for (id, node) in tree.nodes().iter().enumerate() {
            let Some(file) = navigation.file_for(id) else {
                continue;
            };
            let own = text.get(tree.own_span(id)).unwrap_or_default();
            let section = if id == 0 && !preamble.is_empty() {
                format!("{}{}", preamble, own)
            } else {
                own.to_string()
            };
            let mut page_metadata = metadata.clone();
            page_metadata.insert("title", generator.title_for(node));
            pages.insert(
                file.to_string(),
                template::render(&section, &page_template, &page_metadata)?,
            );
        }
        Ok(pages)
    }

    /// Process several documents concurrently, preserving input order.
    ///
    /// A failing document yields its own error without affecting the others.
    pub async fn process_many(
        self: &Arc<Self>,
        documents: Vec<(String, String)>,
        template: &str,
        metadata: &Metadata,
        max_concurrency: usize,
    ) -> Vec<(String, Result<ProcessedDocument>)> {
        futures::stream::iter(documents)
            .map(|(id, text)| {
                let processor = Arc::clone(self);
                let template = template.to_string();
                let metadata = metadata.clone();
                async move {
                    let result = tokio::task::spawn_blocking(move || {
                        processor.process(&text, &template, &metadata)
                    })
                    .await
                    .map_err(|e| WeaveError::Io(std::io::Error::other(e.to_string())))
                    .and_then(|r| r);
                    if let Err(e) = &result {
                        warn!("Failed to process {}: {}", id, e);
                    }
                    (id, result)
                }
            })
            .buffered(max_concurrency.max(1))
            .collect()
            .await
    }

    /// Fetch a document, process it and publish the result
    pub async fn run(
        &self,
        source: &dyn DocumentSource,
        target: &dyn PublishTarget,
        id: &str,
        template: &str,
        metadata: &Metadata,
    ) -> Result<PublishReceipt> {
        let document = source.fetch(id).await?;
        info!("Fetched '{}' from {}", id, source.name());

        let mut metadata = metadata.clone();
        if let Some(title) = &document.title
            && !metadata.contains_key("title")
        {
            metadata.insert("title", title.as_str());
        }

        let processed = self.process(&document.content, template, &metadata)?;
        let message = format!("Update documentation from {}", id);
        target.publish(processed.publish_request(message)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tree::NodeId;
    use crate::providers::{DirectoryTarget, LocalFileSource};
    use crate::types::{Category, DiagnosticKind};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn processor() -> DocumentProcessor {
        DocumentProcessor::default()
    }

    #[test]
    fn test_example_home_about_pillars() {
        let analysis = processor().analyze("# 🏠 Home\n## 📚 About\n### Pillars\n");
        let tree = &analysis.tree;

        assert_eq!(tree.roots().len(), 1);
        let root = tree.node(tree.roots()[0]);
        assert_eq!(root.heading.category, Some(Category::Home));
        let about = tree.node(root.children[0]);
        assert_eq!(about.heading.category, Some(Category::About));
        let pillars = tree.node(about.children[0]);
        assert_eq!(pillars.heading.category, Some(Category::Uncategorized));
        assert!(analysis.analysis.diagnostics.is_empty());
    }

    #[test]
    fn test_example_hierarchy_gap() {
        let analysis = processor().analyze("# Title\n### Skipped\n");
        let tree = &analysis.tree;
        let root = tree.node(tree.roots()[0]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(tree.node(root.children[0]).heading.label, "Skipped");

        let gaps: Vec<_> = analysis
            .analysis
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::HierarchyGap)
            .collect();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].text, "Skipped");
        assert_eq!(gaps[0].line, 2);
    }

    #[test]
    fn test_example_empty_input() {
        let analysis = processor().analyze("");
        assert!(analysis.tree.is_empty());
        assert!(analysis.navigation.entries.is_empty());
        assert!(analysis.analysis.diagnostics.is_empty());

        assert!(matches!(
            processor().process("  \n", "standard_docs", &Metadata::new()),
            Err(WeaveError::EmptyInput)
        ));
    }

    #[test]
    fn test_process_unknown_template() {
        let err = processor()
            .process("# Home\n", "nonexistent_template", &Metadata::new())
            .unwrap_err();
        assert!(matches!(err, WeaveError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_process_splits_pages() {
        let text = "# 🏠 Home\nWelcome\n## 📚 About\nWho we are\n# ❓ FAQ\n";
        let doc = processor()
            .process(text, "standard_docs", &Metadata::new())
            .unwrap();

        let files: Vec<&str> = doc.pages.keys().map(String::as_str).collect();
        assert_eq!(files, vec!["faq/index.md", "home/about.md", "home/index.md"]);

        let about = &doc.pages["home/about.md"];
        assert!(about.starts_with("---\ntitle: About\n"));
        assert!(about.ends_with("## 📚 About\nWho we are\n"));
        assert!(!about.contains("<!-- toc -->"));

        assert!(doc.formatted.contains("<!-- toc -->"));
        assert!(doc.navigation.starts_with("nav:\n- Home:\n"));
        assert!(doc.site_config.contains("site_name: Documentation"));
        assert!(doc.report.is_valid);
    }

    #[test]
    fn test_preamble_opens_first_page() {
        let text = "Intro paragraph before any heading\n\n# Home\nbody\n## Team\n";
        let doc = processor().process(text, "minimal", &Metadata::new()).unwrap();

        assert_eq!(
            doc.pages["home/index.md"],
            "Intro paragraph before any heading\n\n# Home\nbody\n"
        );
        assert_eq!(doc.pages["home/team.md"], "## Team\n");
    }

    #[test]
    fn test_frontmatter_stays_out_of_structure_and_pages() {
        let text = "---\n# owner comment\ntitle: Guide\n---\n# Home\nbody\n";
        let processor = processor();

        let analysis = processor.analyze(text);
        let labels: Vec<&str> = analysis
            .analysis
            .headings
            .iter()
            .map(|h| h.text.as_str())
            .collect();
        assert_eq!(labels, vec!["Home"]);

        let doc = processor.process(text, "minimal", &Metadata::new()).unwrap();
        let files: Vec<&str> = doc.pages.keys().map(String::as_str).collect();
        assert_eq!(files, vec!["home/index.md"]);
        assert_eq!(doc.pages["home/index.md"], "# Home\nbody\n");
    }

    #[test]
    fn test_setext_document_gets_navigation() {
        let text = "Guide\n=====\n\nSetup\n-----\nSteps\n";
        let analysis = processor().analyze(text);
        assert_eq!(analysis.navigation.entries.len(), 1);
        assert_eq!(analysis.navigation.entries[0].file, "guide/index.md");
        assert_eq!(analysis.navigation.entries[0].children[0].file, "guide/setup.md");
    }

    #[test]
    fn test_process_reports_missing_sections() {
        let doc = processor()
            .process("# Intro\n", "technical_docs", &Metadata::new())
            .unwrap();
        assert_eq!(doc.analysis.count(DiagnosticKind::MissingSection), 2);
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let mut config = Config::default();
        config.classification.keywords.push(crate::config::KeywordRuleConfig {
            category: "governance".to_string(),
            keywords: vec!["voting".to_string()],
        });
        config.navigation.max_slug_len = 8;

        let processor = DocumentProcessor::from_config(&config).unwrap();
        let analysis = processor.analyze("# Voting Rules And Procedures\n");
        let node = analysis.tree.node(0);
        assert_eq!(node.heading.category, Some(Category::Custom("governance".to_string())));
        assert!(analysis.navigation.file_for(0).unwrap().len() <= "12345678/index.md".len());
    }

    #[tokio::test]
    async fn test_process_many_isolates_failures() {
        let processor = Arc::new(processor());
        let docs = vec![
            ("a".to_string(), "# A\n".to_string()),
            ("empty".to_string(), String::new()),
            ("b".to_string(), "# B\n## C\n".to_string()),
        ];
        let results = processor
            .process_many(docs, "standard_docs", &Metadata::new(), 2)
            .await;

        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "empty", "b"]);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(WeaveError::EmptyInput)));
        assert_eq!(results[2].1.as_ref().unwrap().pages.len(), 2);
    }

    #[tokio::test]
    async fn test_run_fetches_and_publishes() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        std::fs::write(input.path().join("handbook.md"), "# Home\n## Team\n").unwrap();

        let receipt = processor()
            .run(
                &LocalFileSource::new(input.path()),
                &DirectoryTarget::new(output.path(), "docs"),
                "handbook",
                "minimal",
                &Metadata::new(),
            )
            .await
            .unwrap();

        assert!(receipt.changed());
        assert!(output.path().join("docs/home/team.md").exists());
        assert!(output.path().join("navigation.yml").exists());
        assert!(output.path().join("mkdocs.yml").exists());
    }

    fn doc_from(levels: &[u8]) -> String {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| format!("{} Section {}\nbody\n", "#".repeat(*level as usize), i % 3))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_dfs_matches_document_order(levels in prop::collection::vec(1u8..=6, 0..40)) {
            let analysis = processor().analyze(&doc_from(&levels));
            let order: Vec<NodeId> = analysis.tree.depth_first();
            let expected: Vec<NodeId> = (0..levels.len()).collect();
            prop_assert_eq!(order, expected);
        }

        #[test]
        fn prop_apply_idempotent(levels in prop::collection::vec(1u8..=6, 0..20)) {
            let processor = processor();
            let doc = doc_from(&levels);
            let standard = processor.templates().get("standard_docs").unwrap();
            let once = template::render(&doc, standard, &Metadata::new()).unwrap();
            let twice = template::render(&once, standard, &Metadata::new()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
