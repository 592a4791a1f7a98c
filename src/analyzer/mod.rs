//! Document Analyzer Module
//!
//! Turns raw Markdown into a classified section hierarchy:
//! - [`extractor`]: ATX heading scan with positions and malformed-heading reports
//! - [`classifier`]: emoji/keyword section classification
//! - [`tree`]: arena-backed structure tree with hierarchy-gap detection
//! - [`references`]: in-document link resolution
//! - [`analysis`]: serializable analysis record

pub mod analysis;
pub mod classifier;
pub mod emoji;
pub mod extractor;
pub mod references;
pub mod tree;

pub use analysis::{DocumentStats, HeadingSummary, StructureAnalysis, suggest_template};
pub use classifier::{CategoryRegistry, KeywordRule, SectionClassifier, SharedCategoryRegistry};
pub use extractor::{Extraction, HeadingExtractor, ScanEvent, extract};
pub use references::{CrossReference, ReferenceKind};
pub use tree::{NodeId, StructureNode, StructureTree, TreeBuilder};
