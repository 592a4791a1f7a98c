//! Collaborator Seams
//!
//! Narrow async contracts for the services around the core:
//! a document source (id in, raw text out) and a publish target
//! (pages + navigation in, receipt out). Only local filesystem
//! implementations live here; network clients plug in behind the same traits.

mod local;

pub use local::{DirectoryTarget, LocalFileSource};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::Result;

/// Raw document returned by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

/// Everything a target needs to publish one processed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Page contents keyed by navigation file path
    pub pages: BTreeMap<String, String>,
    /// Standalone `nav:` document
    pub navigation: String,
    /// Site configuration fragment
    pub site_config: Option<String>,
    /// Change description, e.g. a commit message
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub target: String,
    /// Files created or changed
    pub written: Vec<String>,
    /// Files skipped because their content was already current
    pub unchanged: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl PublishReceipt {
    pub fn changed(&self) -> bool {
        !self.written.is_empty()
    }
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch raw text by document identifier
    async fn fetch(&self, id: &str) -> Result<SourceDocument>;

    /// Source name for logging
    fn name(&self) -> &str;
}

#[async_trait]
pub trait PublishTarget: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<PublishReceipt>;

    /// Target name for logging
    fn name(&self) -> &str;
}

pub type SharedSource = Arc<dyn DocumentSource>;
pub type SharedTarget = Arc<dyn PublishTarget>;
