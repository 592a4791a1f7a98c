//! Global Constants
//!
//! Centralized constants for parsing and output tuning.

/// Heading extraction constants
pub mod heading {
    /// Highest heading level accepted by ATX syntax
    pub const MAX_LEVEL: usize = 6;

    /// Leading spaces allowed before a heading marker
    pub const MAX_INDENT: usize = 3;
}

/// Navigation generation constants
pub mod navigation {
    /// Default maximum slug length in characters
    pub const DEFAULT_MAX_SLUG_LEN: usize = 50;

    /// Titles longer than this are cut at the first sentence break
    pub const MAX_TITLE_LEN: usize = 100;

    /// Slug used when a heading yields no path-safe characters
    pub const FALLBACK_SLUG: &str = "section";

    /// File name for directory-style entries
    pub const INDEX_FILE: &str = "index.md";

    /// Navigation output file name
    pub const NAV_FILE: &str = "navigation.yml";

    /// Site configuration fragment file name
    pub const SITE_CONFIG_FILE: &str = "mkdocs.yml";
}

/// Template engine constants
pub mod template {
    /// Template used when no name is configured
    pub const DEFAULT_TEMPLATE: &str = "standard_docs";

    /// Template callers are expected to fall back to
    pub const FALLBACK_TEMPLATE: &str = "minimal";

    /// Heading of the generated table of contents
    pub const TOC_HEADING: &str = "## Table of Contents";

    /// Markers delimiting a generated table of contents
    pub const TOC_START: &str = "<!-- toc -->";
    pub const TOC_END: &str = "<!-- /toc -->";

    /// Frontmatter fence
    pub const FRONTMATTER_FENCE: &str = "---";
}

/// Document statistics constants
pub mod stats {
    /// Sections per estimated page
    pub const SECTIONS_PER_PAGE: usize = 3;
}

/// Output file names
pub mod output {
    pub const ANALYSIS_FILE: &str = "analysis.json";
    pub const FORMATTED_SUFFIX: &str = "_formatted.md";
}
