//! Navigation Generation
//!
//! - [`slug`]: path-safe slugs, TOC anchors and per-directory disambiguation
//! - [`generator`]: structure tree → nested navigation entries with file paths
//! - [`mkdocs`]: `nav:` YAML serialization, merging and site config fragments
//! - [`validate`]: sanity checks before output

pub mod generator;
pub mod mkdocs;
pub mod slug;
pub mod validate;

pub use generator::{Navigation, NavigationEntry, NavigationGenerator, PathAssignment};
pub use mkdocs::{merge_nav, nav_yaml, parse_nav_yaml, site_config};
pub use validate::{NavigationReport, validate};
