//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docweave/) and project (.docweave/) level configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::constants::navigation::DEFAULT_MAX_SLUG_LEN;
use crate::constants::template::DEFAULT_TEMPLATE;
use crate::types::{Result, WeaveError};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity and layout
    pub site: SiteConfig,

    /// Template selection and custom template directory
    pub templates: TemplatesConfig,

    /// Extra classification rules
    pub classification: ClassificationConfig,

    /// Navigation generation options
    pub navigation: NavigationConfig,

    /// Output settings for the CLI
    pub output: OutputConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `WeaveError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.navigation.max_slug_len == 0 {
            return Err(WeaveError::Config(
                "navigation.max_slug_len must be greater than 0".to_string(),
            ));
        }

        if self.templates.default.trim().is_empty() {
            return Err(WeaveError::Config(
                "templates.default must not be empty".to_string(),
            ));
        }

        for (glyph, category) in &self.classification.emoji {
            if glyph.trim().is_empty() || category.trim().is_empty() {
                return Err(WeaveError::Config(format!(
                    "classification.emoji entry '{}' = '{}' is incomplete",
                    glyph, category
                )));
            }
        }

        for rule in &self.classification.keywords {
            if rule.category.trim().is_empty() {
                return Err(WeaveError::Config(
                    "classification.keywords rule has an empty category".to_string(),
                ));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(WeaveError::Config(format!(
                    "classification.keywords rule for '{}' has no keywords",
                    rule.category
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Site Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name written to the site configuration
    pub name: String,

    /// Directory pages are published under
    pub docs_dir: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Edit link path, e.g. `edit/main/docs/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_uri: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_string(),
            docs_dir: "docs".to_string(),
            repo_url: None,
            edit_uri: None,
        }
    }
}

// =============================================================================
// Templates Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Template used when none is requested
    pub default: String,

    /// Directory of `*.yaml` template definitions registered at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<PathBuf>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_TEMPLATE.to_string(),
            custom_dir: None,
        }
    }
}

// =============================================================================
// Classification Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Extra emoji → category pairs
    pub emoji: BTreeMap<String, String>,

    /// Keyword rules checked before the built-in rules, in order
    pub keywords: Vec<KeywordRuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRuleConfig {
    pub category: String,
    pub keywords: Vec<String>,
}

// =============================================================================
// Navigation Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Keep leading emoji in navigation titles
    pub emoji_in_titles: bool,

    /// Maximum slug length in characters
    pub max_slug_len: usize,

    /// Map the first `home` root to the site-level `index.md`
    pub home_index: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            emoji_in_titles: false,
            max_slug_len: DEFAULT_MAX_SLUG_LEN,
            home_index: false,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for CLI artifacts
    pub dir: PathBuf,

    /// Write `analysis.json` next to the navigation file
    pub write_analysis: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            write_analysis: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.name, "Documentation");
        assert_eq!(config.templates.default, "standard_docs");
        assert_eq!(config.navigation.max_slug_len, 50);
        assert!(!config.navigation.home_index);
        assert!(config.output.write_analysis);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_slug_len() {
        let mut config = Config::default();
        config.navigation.max_slug_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_rule() {
        let mut config = Config::default();
        config.classification.keywords.push(KeywordRuleConfig {
            category: "runbooks".to_string(),
            keywords: vec![" ".to_string()],
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("runbooks"));
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
[site]
name = "Deep Funding"

[[classification.keywords]]
category = "governance"
keywords = ["voting", "proposal"]
"#,
        )
        .unwrap();
        assert_eq!(config.site.name, "Deep Funding");
        assert_eq!(config.site.docs_dir, "docs");
        assert_eq!(config.classification.keywords[0].category, "governance");
    }
}
