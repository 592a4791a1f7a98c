//! Template Registry
//!
//! Named store of template definitions. Populated once at startup
//! (built-ins, then custom templates from config) and then shared
//! read-only behind an `Arc`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::builtin;
use super::definition::TemplateDefinition;
use crate::types::{Result, WeaveError};

pub type SharedTemplateRegistry = Arc<TemplateRegistry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Builtin,
    Custom,
}

/// Listing row for a registered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub kind: TemplateKind,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateDefinition>,
    custom: BTreeSet<String>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    /// Registry holding the built-in templates
    pub fn builtin() -> Self {
        let templates = builtin::all()
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self {
            templates,
            custom: BTreeSet::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
            custom: BTreeSet::new(),
        }
    }

    /// Register a custom template, replacing any template of the same name
    pub fn register(&mut self, template: TemplateDefinition) -> Result<()> {
        template
            .check()
            .map_err(|reason| WeaveError::invalid_template(&template.name, reason))?;

        let name = template.name.clone();
        if self.templates.insert(name.clone(), template).is_some() {
            info!("Template '{}' replaced", name);
        } else {
            debug!("Template '{}' registered", name);
        }
        self.custom.insert(name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&TemplateDefinition> {
        self.templates
            .get(name)
            .ok_or_else(|| WeaveError::template_not_found(name, self.names()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn list(&self) -> Vec<TemplateInfo> {
        self.templates
            .values()
            .map(|t| TemplateInfo {
                name: t.name.clone(),
                display_name: t.display_name.clone(),
                description: t.description.clone(),
                kind: if self.custom.contains(&t.name) {
                    TemplateKind::Custom
                } else {
                    TemplateKind::Builtin
                },
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Serialize a registered template as YAML
    pub fn to_yaml(&self, name: &str) -> Result<String> {
        Ok(serde_yaml::to_string(self.get(name)?)?)
    }

    /// Write a registered template to a YAML file
    pub fn export(&self, name: &str, path: &Path) -> Result<()> {
        let yaml = self.to_yaml(name)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;
        info!("Template '{}' saved to {}", name, path.display());
        Ok(())
    }

    /// Parse and register a template from YAML.
    ///
    /// `fallback_name` is used when the document has no `name` field.
    pub fn load_yaml(&mut self, yaml: &str, fallback_name: &str) -> Result<String> {
        let mut template: TemplateDefinition = serde_yaml::from_str(yaml)
            .map_err(|e| WeaveError::invalid_template(fallback_name, e.to_string()))?;
        if template.name.trim().is_empty() {
            template.name = fallback_name.to_string();
        }
        let name = template.name.clone();
        self.register(template)?;
        Ok(name)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let yaml = fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        self.load_yaml(&yaml, stem)
    }

    /// Register every `*.yaml` / `*.yml` template in a directory.
    ///
    /// Files that fail to parse are skipped with a warning; returns the
    /// names that were registered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == "yaml" || e == "yml")
            })
            .collect();
        paths.sort();

        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_file(&path) {
                Ok(name) => loaded.push(name),
                Err(e) => warn!("Skipping template {}: {}", path.display(), e),
            }
        }
        info!("Loaded {} custom templates from {}", loaded.len(), dir.display());
        Ok(loaded)
    }

    pub fn into_shared(self) -> SharedTemplateRegistry {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CUSTOM: &str = "\
name: handbook
display_name: Team Handbook
description: Internal handbook
structure:
  toc: false
sections:
  - level: 1
    title: Welcome
    required: true
";

    #[test]
    fn test_builtin_names() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["minimal", "project_docs", "standard_docs", "technical_docs"]
        );
        assert!(registry.list().iter().all(|t| t.kind == TemplateKind::Builtin));
    }

    #[test]
    fn test_get_missing_lists_known_names() {
        let registry = TemplateRegistry::builtin();
        match registry.get("nonexistent_template") {
            Err(WeaveError::TemplateNotFound { name, available }) => {
                assert_eq!(name, "nonexistent_template");
                assert_eq!(available.len(), 4);
                assert!(available.contains(&"minimal".to_string()));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_yaml_registers_custom() {
        let mut registry = TemplateRegistry::builtin();
        let name = registry.load_yaml(CUSTOM, "ignored").unwrap();
        assert_eq!(name, "handbook");

        let template = registry.get("handbook").unwrap();
        assert!(!template.structure.toc);
        assert!(template.structure.frontmatter);

        let info = registry.list().into_iter().find(|t| t.name == "handbook").unwrap();
        assert_eq!(info.kind, TemplateKind::Custom);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut registry = TemplateRegistry::builtin();
        let yaml = "display_name: Bad\nsections:\n  - level: 9\n    title: Deep\n";
        let err = registry.load_yaml(yaml, "bad").unwrap_err();
        assert!(matches!(err, WeaveError::InvalidTemplate { .. }));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_export_and_reload() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::builtin();
        registry
            .export("technical_docs", &dir.path().join("tech.yaml"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        std::fs::write(dir.path().join("broken.yml"), ":: not yaml ::").unwrap();

        let mut fresh = TemplateRegistry::empty();
        let loaded = fresh.load_dir(dir.path()).unwrap();
        assert_eq!(loaded, vec!["technical_docs"]);
        assert_eq!(
            fresh.get("technical_docs").unwrap(),
            registry.get("technical_docs").unwrap()
        );
    }

    #[test]
    fn test_custom_replaces_builtin() {
        let mut registry = TemplateRegistry::builtin();
        let mut minimal = builtin::minimal();
        minimal.structure.toc = true;
        registry.register(minimal).unwrap();
        assert!(registry.get("minimal").unwrap().structure.toc);
        assert_eq!(registry.len(), 4);
    }
}
