use serde::Serialize;
use std::collections::HashSet;

use super::generator::NavigationEntry;

/// Result of checking navigation entries before it is written out
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check file uniqueness, extensions and titles
pub fn validate(entries: &[NavigationEntry]) -> NavigationReport {
    let mut report = NavigationReport {
        is_valid: true,
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for entry in entries.iter().flat_map(|e| e.walk()) {
        if !seen.insert(entry.file.as_str()) {
            report
                .errors
                .push(format!("Duplicate navigation path: {}", entry.file));
        }
        if !entry.file.ends_with(".md") {
            report
                .warnings
                .push(format!("Path without .md extension: {}", entry.file));
        }
        if entry.title.trim().is_empty() {
            report
                .warnings
                .push(format!("Entry for {} has an empty title", entry.file));
        }
        if entry.file.starts_with('/') || entry.file.split('/').any(|part| part == "..") {
            report
                .errors
                .push(format!("Path escapes the docs directory: {}", entry.file));
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_navigation() {
        let entries = vec![NavigationEntry {
            title: "Home".to_string(),
            file: "home/index.md".to_string(),
            children: vec![NavigationEntry::leaf("About", "home/about.md")],
        }];
        let report = validate(&entries);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_duplicates_and_extensions() {
        let entries = vec![
            NavigationEntry::leaf("A", "a/index.md"),
            NavigationEntry::leaf("B", "a/index.md"),
            NavigationEntry::leaf("", "notes.txt"),
            NavigationEntry::leaf("Up", "../outside.md"),
        ];
        let report = validate(&entries);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 2);
    }
}
