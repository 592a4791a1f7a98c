use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic section category assigned by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Home,
    About,
    Team,
    Operations,
    Tools,
    Faq,
    Processes,
    Goals,
    Progress,
    Overview,
    GettingStarted,
    ApiReference,
    Examples,
    Configuration,
    Troubleshooting,
    Uncategorized,
    /// Caller-registered category
    Custom(String),
}

impl Category {
    /// All built-in categories, excluding `Uncategorized`
    pub const BUILTIN: &'static [Category] = &[
        Category::Home,
        Category::About,
        Category::Team,
        Category::Operations,
        Category::Tools,
        Category::Faq,
        Category::Processes,
        Category::Goals,
        Category::Progress,
        Category::Overview,
        Category::GettingStarted,
        Category::ApiReference,
        Category::Examples,
        Category::Configuration,
        Category::Troubleshooting,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Team => "team",
            Self::Operations => "operations",
            Self::Tools => "tools",
            Self::Faq => "faq",
            Self::Processes => "processes",
            Self::Goals => "goals",
            Self::Progress => "progress",
            Self::Overview => "overview",
            Self::GettingStarted => "getting_started",
            Self::ApiReference => "api_reference",
            Self::Examples => "examples",
            Self::Configuration => "configuration",
            Self::Troubleshooting => "troubleshooting",
            Self::Uncategorized => "uncategorized",
            Self::Custom(name) => name,
        }
    }

    /// Human-readable label used for navigation titles
    pub fn display_name(&self) -> String {
        match self {
            Self::Faq => "FAQ".to_string(),
            Self::ApiReference => "API Reference".to_string(),
            Self::Uncategorized => "Section".to_string(),
            other => other
                .as_str()
                .split('_')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Self::Uncategorized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let category = Category::BUILTIN
            .iter()
            .find(|c| c.as_str() == normalized)
            .cloned()
            .unwrap_or_else(|| {
                if normalized == "uncategorized" {
                    Category::Uncategorized
                } else {
                    Category::Custom(normalized)
                }
            });
        Ok(category)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_and_custom() {
        assert_eq!(Category::from("home"), Category::Home);
        assert_eq!(Category::from("Getting Started"), Category::GettingStarted);
        assert_eq!(Category::from("api-reference"), Category::ApiReference);
        assert_eq!(
            Category::from("Roadmap"),
            Category::Custom("roadmap".to_string())
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Category::Faq.display_name(), "FAQ");
        assert_eq!(Category::GettingStarted.display_name(), "Getting Started");
        assert_eq!(
            Category::Custom("release_notes".to_string()).display_name(),
            "Release Notes"
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Category::GettingStarted).unwrap();
        assert_eq!(json, "\"getting_started\"");
        let back: Category = serde_json::from_str("\"team\"").unwrap();
        assert_eq!(back, Category::Team);
    }
}
