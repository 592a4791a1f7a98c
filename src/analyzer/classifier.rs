//! Section Classifier
//!
//! Maps headings to semantic categories. Lookup order:
//! 1. Leading emoji in the emoji table
//! 2. Case-insensitive keyword substring match, first rule in priority order wins
//! 3. `uncategorized`
//!
//! The tables live in an explicit [`CategoryRegistry`]. Mutation requires
//! `&mut`, so a registry configured at startup and then wrapped in an `Arc`
//! is read-only for every concurrent classification pass.

use std::collections::HashMap;
use std::sync::Arc;

use super::emoji;
use crate::config::ClassificationConfig;
use crate::types::{Category, HeadingRecord};

/// Ordered keyword rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: Category,
    /// Lower-cased keywords
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new<I, S>(category: Category, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Emoji and keyword lookup tables
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    emoji: HashMap<String, Category>,
    rules: Vec<KeywordRule>,
}

pub type SharedCategoryRegistry = Arc<CategoryRegistry>;

/// Built-in emoji table
const BUILTIN_EMOJI: &[(&str, Category)] = &[
    ("🏠", Category::Home),
    ("🏡", Category::Home),
    ("📚", Category::About),
    ("ℹ", Category::About),
    ("👥", Category::Team),
    ("🤝", Category::Team),
    ("⚙", Category::Operations),
    ("🔧", Category::Tools),
    ("🛠", Category::Tools),
    ("🧰", Category::Tools),
    ("❓", Category::Faq),
    ("❔", Category::Faq),
    ("🔄", Category::Processes),
    ("🎯", Category::Goals),
    ("📈", Category::Progress),
    ("📊", Category::Progress),
    ("📖", Category::Overview),
    ("🚀", Category::GettingStarted),
    ("🔌", Category::ApiReference),
    ("💡", Category::Examples),
    ("🔩", Category::Configuration),
    ("🐛", Category::Troubleshooting),
    ("🚑", Category::Troubleshooting),
];

/// Built-in keyword rules in priority order
fn builtin_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(Category::Faq, ["faq", "frequently asked", "questions"]),
        KeywordRule::new(
            Category::GettingStarted,
            ["getting started", "quick start", "quickstart", "onboarding"],
        ),
        KeywordRule::new(
            Category::ApiReference,
            ["api reference", "api docs", "endpoints", "reference"],
        ),
        KeywordRule::new(Category::Troubleshooting, ["troubleshoot", "known issues"]),
        KeywordRule::new(Category::Configuration, ["configuration", "settings", "setup"]),
        KeywordRule::new(Category::Team, ["team", "members", "contributors", "roles"]),
        KeywordRule::new(Category::Operations, ["operations", "operating", "runbook"]),
        KeywordRule::new(Category::Tools, ["tools", "tooling"]),
        KeywordRule::new(Category::Processes, ["process", "workflow", "procedure"]),
        KeywordRule::new(Category::Goals, ["goals", "objectives", "mission", "vision"]),
        KeywordRule::new(Category::Progress, ["progress", "roadmap", "milestones", "status"]),
        KeywordRule::new(Category::Examples, ["examples", "samples"]),
        KeywordRule::new(Category::About, ["about", "introduction", "background"]),
        KeywordRule::new(Category::Overview, ["overview", "summary"]),
        KeywordRule::new(Category::Home, ["home", "welcome"]),
    ]
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryRegistry {
    /// Registry with the built-in tables
    pub fn builtin() -> Self {
        let emoji = BUILTIN_EMOJI
            .iter()
            .map(|(glyph, category)| (emoji::normalize(glyph), category.clone()))
            .collect();
        Self {
            emoji,
            rules: builtin_rules(),
        }
    }

    /// Registry with no entries; every heading classifies as uncategorized
    pub fn empty() -> Self {
        Self {
            emoji: HashMap::new(),
            rules: Vec::new(),
        }
    }

    /// Built-in tables extended with configured overrides
    pub fn from_config(config: &ClassificationConfig) -> Self {
        let mut registry = Self::builtin();
        for (glyph, category) in &config.emoji {
            registry.register_emoji(glyph, Category::from(category.as_str()));
        }
        // Configured rules take priority over the built-ins, keeping their own order
        for rule in config.keywords.iter().rev() {
            registry.prepend_rule(KeywordRule::new(
                Category::from(rule.category.as_str()),
                &rule.keywords,
            ));
        }
        registry
    }

    /// Register or replace an emoji mapping
    pub fn register_emoji(&mut self, glyph: &str, category: Category) {
        let key = emoji::normalize(glyph.trim());
        if key.is_empty() {
            return;
        }
        tracing::debug!("Registered emoji {} -> {}", glyph, category);
        self.emoji.insert(key, category);
    }

    /// Add a keyword rule with the lowest priority
    pub fn push_rule(&mut self, rule: KeywordRule) {
        self.rules.push(rule);
    }

    /// Add a keyword rule with the highest priority
    pub fn prepend_rule(&mut self, rule: KeywordRule) {
        self.rules.insert(0, rule);
    }

    pub fn emoji_category(&self, glyph: &str) -> Option<&Category> {
        self.emoji.get(&emoji::normalize(glyph))
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn into_shared(self) -> SharedCategoryRegistry {
        Arc::new(self)
    }
}

/// Classifier bound to a registry snapshot
#[derive(Debug, Clone, Copy)]
pub struct SectionClassifier<'r> {
    registry: &'r CategoryRegistry,
}

impl<'r> SectionClassifier<'r> {
    pub fn new(registry: &'r CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Category for a single heading
    pub fn classify(&self, heading: &HeadingRecord) -> Category {
        if let Some(glyph) = heading.emoji.as_deref()
            && let Some(category) = self.registry.emoji_category(glyph)
        {
            return category.clone();
        }
        self.classify_text(&heading.label)
    }

    /// Keyword stage only
    pub fn classify_text(&self, text: &str) -> Category {
        let haystack = text.to_lowercase();
        self.registry
            .rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| rule.category.clone())
            .unwrap_or(Category::Uncategorized)
    }

    /// Assign categories to every heading in place
    pub fn classify_all(&self, headings: &mut [HeadingRecord]) {
        for heading in headings.iter_mut() {
            let category = self.classify(heading);
            tracing::debug!("Classified '{}' as {}", heading.text, category);
            heading.category = Some(category);
        }
    }
}
