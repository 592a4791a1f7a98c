//! Caller-supplied document metadata used for frontmatter injection.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Ordered key-value metadata for a single document.
///
/// Keys iterate in sorted order so frontmatter output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a key, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert every entry of `other` whose key is not already present
    pub fn merge_missing(&mut self, other: &Metadata) {
        for (key, value) in other.iter() {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Parse `key=value` pairs as given on the command line
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut metadata = Self::new();
        for pair in pairs {
            if let Some((key, value)) = pair.split_once('=') {
                metadata.insert(key.trim(), value.trim());
            }
        }
        metadata
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether a metadata value carries no information and should be omitted
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let metadata = Metadata::from_pairs(["title=Ops Guide", "author = Docs Circle", "bogus"]);
        assert_eq!(metadata.get_str("title"), Some("Ops Guide"));
        assert_eq!(metadata.get_str("author"), Some("Docs Circle"));
        assert!(!metadata.contains_key("bogus"));
    }

    #[test]
    fn test_merge_missing_keeps_existing() {
        let mut metadata = Metadata::new().with("title", "Caller");
        let existing = Metadata::new().with("title", "Old").with("tags", "ops");
        metadata.merge_missing(&existing);
        assert_eq!(metadata.get_str("title"), Some("Caller"));
        assert_eq!(metadata.get_str("tags"), Some("ops"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&Value::String("  ".to_string())));
        assert!(is_blank(&Value::Sequence(vec![])));
        assert!(!is_blank(&Value::Bool(false)));
    }
}
