//! MkDocs serialization
//!
//! Converts navigation entries to and from the `nav:` YAML shape:
//! a leaf is `- Title: path.md`, a branch is `- Title: [path.md, ...children]`
//! with its own page listed first and untitled.

use serde_yaml::{Mapping, Value};

use super::generator::NavigationEntry;
use crate::config::SiteConfig;
use crate::template::TemplateDefinition;
use crate::types::{Result, WeaveError};

const NAV_KEY: &str = "nav";

/// Navigation entries as a YAML sequence
pub fn to_nav_value(entries: &[NavigationEntry]) -> Value {
    Value::Sequence(entries.iter().map(entry_value).collect())
}

fn entry_value(entry: &NavigationEntry) -> Value {
    let target = if entry.is_leaf() {
        Value::String(entry.file.clone())
    } else {
        let mut items = Vec::with_capacity(entry.children.len() + 1);
        items.push(Value::String(entry.file.clone()));
        items.extend(entry.children.iter().map(entry_value));
        Value::Sequence(items)
    };
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(entry.title.clone()), target);
    Value::Mapping(mapping)
}

/// Render a standalone `nav:` document
pub fn nav_yaml(entries: &[NavigationEntry]) -> Result<String> {
    let mut root = Mapping::new();
    root.insert(Value::String(NAV_KEY.to_string()), to_nav_value(entries));
    Ok(serde_yaml::to_string(&Value::Mapping(root))?)
}

/// Parse a `nav:` sequence back into entries
pub fn from_nav_value(value: &Value) -> Result<Vec<NavigationEntry>> {
    let items = value
        .as_sequence()
        .ok_or_else(|| WeaveError::Config("nav must be a sequence".to_string()))?;
    items.iter().map(parse_entry).collect()
}

/// Parse a standalone `nav:` document
pub fn parse_nav_yaml(yaml: &str) -> Result<Vec<NavigationEntry>> {
    let doc: Value = serde_yaml::from_str(yaml)?;
    let nav = doc
        .get(NAV_KEY)
        .ok_or_else(|| WeaveError::Config("missing 'nav' key".to_string()))?;
    from_nav_value(nav)
}

fn parse_entry(item: &Value) -> Result<NavigationEntry> {
    let mapping = item
        .as_mapping()
        .filter(|m| m.len() == 1)
        .ok_or_else(|| WeaveError::Config(format!("invalid nav item: {:?}", item)))?;
    let Some((title, target)) = mapping.iter().next() else {
        return Err(WeaveError::Config("empty nav item".to_string()));
    };
    let title = title
        .as_str()
        .ok_or_else(|| WeaveError::Config("nav title must be a string".to_string()))?
        .to_string();

    match target {
        Value::String(file) => Ok(NavigationEntry::leaf(title, file.clone())),
        Value::Sequence(items) => {
            let (file, rest) = match items.split_first() {
                Some((Value::String(file), rest)) => (file.clone(), rest),
                _ => {
                    return Err(WeaveError::Config(format!(
                        "branch '{}' must list its own page first",
                        title
                    )));
                }
            };
            let children = rest.iter().map(parse_entry).collect::<Result<Vec<_>>>()?;
            Ok(NavigationEntry {
                title,
                file,
                children,
            })
        }
        _ => Err(WeaveError::Config(format!(
            "nav item '{}' must map to a path or a list",
            title
        ))),
    }
}

/// Replace the `nav:` key of an existing site configuration, keeping every other key
pub fn merge_nav(existing: &str, entries: &[NavigationEntry]) -> Result<String> {
    let mut doc: Value = if existing.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(existing)?
    };
    let mapping = doc
        .as_mapping_mut()
        .ok_or_else(|| WeaveError::Config("site configuration must be a mapping".to_string()))?;
    mapping.insert(Value::String(NAV_KEY.to_string()), to_nav_value(entries));
    Ok(serde_yaml::to_string(&doc)?)
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn strings(items: &[&str]) -> Value {
    Value::Sequence(items.iter().map(|s| key(s)).collect())
}

/// Render a site configuration fragment for the given template and navigation
pub fn site_config(
    site: &SiteConfig,
    template: &TemplateDefinition,
    entries: &[NavigationEntry],
) -> Result<String> {
    let structure = &template.structure;
    let formatting = &template.formatting;
    let mut root = Mapping::new();

    root.insert(key("site_name"), key(&site.name));
    root.insert(key("docs_dir"), key(&site.docs_dir));
    if let Some(repo_url) = &site.repo_url {
        root.insert(key("repo_url"), key(repo_url));
    }
    match (&site.edit_uri, structure.edit_uri) {
        (Some(uri), true) => {
            root.insert(key("edit_uri"), key(uri));
        }
        (_, false) => {
            root.insert(key("edit_uri"), key(""));
        }
        (None, true) => {}
    }

    let mut features = vec!["navigation.sections"];
    if structure.breadcrumbs {
        features.push("navigation.path");
    }
    if structure.toc {
        features.push("toc.follow");
    }
    if structure.edit_uri {
        features.push("content.action.edit");
    }
    let mut theme = Mapping::new();
    theme.insert(key("name"), key("material"));
    theme.insert(key("features"), strings(&features));
    root.insert(key("theme"), Value::Mapping(theme));

    if structure.search {
        root.insert(key("plugins"), strings(&["search"]));
    }

    let mut extensions: Vec<Value> = Vec::new();
    if structure.toc {
        let mut toc = Mapping::new();
        toc.insert(key("permalink"), Value::Bool(true));
        let mut item = Mapping::new();
        item.insert(key("toc"), Value::Mapping(toc));
        extensions.push(Value::Mapping(item));
    }
    if formatting.admonitions {
        extensions.push(key("admonition"));
        extensions.push(key("pymdownx.details"));
    }
    if formatting.code_blocks {
        extensions.push(key("pymdownx.superfences"));
        if formatting.syntax_highlighting {
            extensions.push(key("pymdownx.highlight"));
        }
    }
    if formatting.tables {
        extensions.push(key("tables"));
    }
    if !extensions.is_empty() {
        root.insert(key("markdown_extensions"), Value::Sequence(extensions));
    }

    root.insert(key(NAV_KEY), to_nav_value(entries));
    Ok(serde_yaml::to_string(&Value::Mapping(root))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin;

    fn sample() -> Vec<NavigationEntry> {
        vec![
            NavigationEntry {
                title: "Home".to_string(),
                file: "home/index.md".to_string(),
                children: vec![
                    NavigationEntry::leaf("About", "home/about.md"),
                    NavigationEntry {
                        title: "Team".to_string(),
                        file: "home/team.md".to_string(),
                        children: vec![NavigationEntry::leaf("Roles", "home/roles.md")],
                    },
                ],
            },
            NavigationEntry::leaf("FAQ", "faq/index.md"),
        ]
    }

    #[test]
    fn test_nav_yaml_shape() {
        let yaml = nav_yaml(&sample()).unwrap();
        let expected = "\
nav:
- Home:
  - home/index.md
  - About: home/about.md
  - Team:
    - home/team.md
    - Roles: home/roles.md
- FAQ: faq/index.md
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_nav_yaml_parses_back() {
        let entries = sample();
        let parsed = parse_nav_yaml(&nav_yaml(&entries).unwrap()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_empty_nav() {
        assert_eq!(nav_yaml(&[]).unwrap(), "nav: []\n");
    }

    #[test]
    fn test_merge_nav_preserves_other_keys() {
        let existing = "site_name: Ops\ntheme:\n  name: material\nnav:\n- Old: old.md\n";
        let merged = merge_nav(existing, &[NavigationEntry::leaf("New", "new/index.md")]).unwrap();
        let doc: Value = serde_yaml::from_str(&merged).unwrap();

        assert_eq!(doc["site_name"], key("Ops"));
        assert_eq!(doc["theme"]["name"], key("material"));
        let nav = from_nav_value(&doc["nav"]).unwrap();
        assert_eq!(nav, vec![NavigationEntry::leaf("New", "new/index.md")]);
    }

    #[test]
    fn test_merge_nav_rejects_non_mapping() {
        assert!(merge_nav("- just\n- a list\n", &[]).is_err());
    }

    #[test]
    fn test_site_config_follows_template_flags() {
        let site = SiteConfig {
            name: "Deep Funding".to_string(),
            edit_uri: Some("edit/main/docs/".to_string()),
            ..Default::default()
        };

        let standard = builtin::standard_docs();
        let yaml = site_config(&site, &standard, &sample()).unwrap();
        let doc: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc["site_name"], key("Deep Funding"));
        assert_eq!(doc["edit_uri"], key("edit/main/docs/"));
        let features = doc["theme"]["features"].as_sequence().unwrap();
        assert!(features.contains(&key("navigation.path")));
        assert!(
            doc["markdown_extensions"]
                .as_sequence()
                .unwrap()
                .contains(&key("admonition"))
        );

        let minimal = builtin::minimal();
        let yaml = site_config(&site, &minimal, &sample()).unwrap();
        let doc: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc["edit_uri"], key(""));
        assert!(
            !doc["theme"]["features"]
                .as_sequence()
                .unwrap()
                .contains(&key("navigation.path"))
        );
    }
}
