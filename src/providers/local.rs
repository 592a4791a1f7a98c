use async_trait::async_trait;
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use tracing::{debug, info};

use super::{DocumentSource, PublishReceipt, PublishRequest, PublishTarget, SourceDocument};
use crate::constants::navigation::{NAV_FILE, SITE_CONFIG_FILE};
use crate::navigation::{merge_nav, parse_nav_yaml};
use crate::types::{Result, WeaveError};

// =============================================================================
// Local File Source
// =============================================================================

/// Reads documents from a directory; an id without extension gets `.md`
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
}

impl LocalFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        if !is_contained(relative) {
            return Err(WeaveError::source(id, "document id escapes the source root"));
        }
        let mut path = self.root.join(relative);
        if path.extension().is_none() {
            path.set_extension("md");
        }
        Ok(path)
    }
}

#[async_trait]
impl DocumentSource for LocalFileSource {
    async fn fetch(&self, id: &str) -> Result<SourceDocument> {
        let path = self.path_for(id)?;
        debug!("Fetching {} from {}", id, path.display());

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| WeaveError::source(id, format!("{}: {}", path.display(), e)))?;

        Ok(SourceDocument {
            id: id.to_string(),
            title: path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string),
            content,
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}

// =============================================================================
// Directory Target
// =============================================================================

/// Publishes into a site directory: pages under `docs_dir`, the navigation
/// file and the site configuration at the root.
///
/// An existing site configuration keeps its other keys; only `nav:` is replaced.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    root: PathBuf,
    docs_dir: String,
}

impl DirectoryTarget {
    pub fn new(root: impl Into<PathBuf>, docs_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            docs_dir: docs_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` unless the file already holds it; returns whether it was written
    async fn write_if_changed(&self, path: &Path, content: &str) -> Result<bool> {
        if let Ok(existing) = fs::read_to_string(path).await
            && existing == content
        {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        Ok(true)
    }

    async fn site_config_content(
        &self,
        path: &Path,
        fragment: &str,
        navigation: &str,
    ) -> Result<String> {
        match fs::read_to_string(path).await {
            Ok(existing) => {
                let entries = parse_nav_yaml(navigation)?;
                merge_nav(&existing, &entries)
            }
            Err(_) => Ok(fragment.to_string()),
        }
    }
}

#[async_trait]
impl PublishTarget for DirectoryTarget {
    async fn publish(&self, request: PublishRequest) -> Result<PublishReceipt> {
        let mut files: Vec<(String, PathBuf, String)> = Vec::with_capacity(request.pages.len() + 2);

        for (page, content) in &request.pages {
            if !is_contained(Path::new(page)) {
                return Err(WeaveError::Publish(format!(
                    "page path escapes the docs directory: {}",
                    page
                )));
            }
            let display = format!("{}/{}", self.docs_dir, page);
            let path = self.root.join(&self.docs_dir).join(page);
            files.push((display, path, content.clone()));
        }

        files.push((
            NAV_FILE.to_string(),
            self.root.join(NAV_FILE),
            request.navigation.clone(),
        ));

        if let Some(fragment) = &request.site_config {
            let path = self.root.join(SITE_CONFIG_FILE);
            let content = self
                .site_config_content(&path, fragment, &request.navigation)
                .await?;
            files.push((SITE_CONFIG_FILE.to_string(), path, content));
        }

        let mut written = Vec::new();
        let mut unchanged = Vec::new();
        for (display, path, content) in files {
            if self.write_if_changed(&path, &content).await? {
                written.push(display);
            } else {
                unchanged.push(display);
            }
        }

        info!(
            "Published to {}: {} written, {} unchanged ({})",
            self.root.display(),
            written.len(),
            unchanged.len(),
            request.message
        );

        Ok(PublishReceipt {
            target: self.root.display().to_string(),
            written,
            unchanged,
            published_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Relative path that stays inside its base directory
fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn request() -> PublishRequest {
        let mut pages = BTreeMap::new();
        pages.insert("home/index.md".to_string(), "# Home\n".to_string());
        pages.insert("home/about.md".to_string(), "## About\n".to_string());
        let navigation = "nav:\n- Home:\n  - home/index.md\n  - About: home/about.md\n";
        PublishRequest {
            pages,
            navigation: navigation.to_string(),
            site_config: Some(format!("site_name: Docs\n{}", navigation)),
            message: "Update docs".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_adds_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("handbook.md"), "# Handbook\n").unwrap();

        let source = LocalFileSource::new(dir.path());
        let doc = source.fetch("handbook").await.unwrap();
        assert_eq!(doc.content, "# Handbook\n");
        assert_eq!(doc.title.as_deref(), Some("handbook"));
    }

    #[tokio::test]
    async fn test_fetch_missing_and_escaping() {
        let dir = TempDir::new().unwrap();
        let source = LocalFileSource::new(dir.path());

        let err = source.fetch("missing").await.unwrap_err();
        assert!(matches!(err, WeaveError::Source { ref id, .. } if id == "missing"));
        assert!(source.fetch("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_publish_skips_unchanged() {
        let dir = TempDir::new().unwrap();
        let target = DirectoryTarget::new(dir.path(), "docs");

        let first = target.publish(request()).await.unwrap();
        assert_eq!(first.written.len(), 4);
        assert!(dir.path().join("docs/home/about.md").exists());

        let second = target.publish(request()).await.unwrap();
        assert!(!second.changed());
        assert_eq!(second.unchanged.len(), 4);
    }

    #[tokio::test]
    async fn test_publish_merges_existing_site_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("mkdocs.yml"),
            "site_name: Existing\ntheme:\n  name: readthedocs\nnav:\n- Old: old.md\n",
        )
        .unwrap();

        let target = DirectoryTarget::new(dir.path(), "docs");
        target.publish(request()).await.unwrap();

        let merged = std::fs::read_to_string(dir.path().join("mkdocs.yml")).unwrap();
        assert!(merged.contains("site_name: Existing"));
        assert!(merged.contains("readthedocs"));
        assert!(merged.contains("About: home/about.md"));
        assert!(!merged.contains("old.md"));
    }

    #[tokio::test]
    async fn test_publish_rejects_escaping_page() {
        let dir = TempDir::new().unwrap();
        let target = DirectoryTarget::new(dir.path(), "docs");
        let mut request = request();
        request
            .pages
            .insert("../outside.md".to_string(), "x".to_string());
        assert!(matches!(
            target.publish(request).await,
            Err(WeaveError::Publish(_))
        ));
    }
}
