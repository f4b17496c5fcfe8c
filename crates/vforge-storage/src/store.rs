//! Storage seam shared by the publisher and the retention sweeper.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageResult;

/// Information about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Creation (last write) time
    pub last_modified: Option<DateTime<Utc>>,
}

/// Durable object storage for artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload a local file under `key`, replacing any existing object.
    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()>;

    /// Retrieval URL for `key`.
    async fn public_url(&self, key: &str) -> StorageResult<String>;

    /// Every stored object.
    async fn list_objects(&self) -> StorageResult<Vec<ObjectInfo>>;

    /// Delete all `keys` in one bulk call. Returns the number requested.
    async fn delete_objects(&self, keys: &[String]) -> StorageResult<u32>;

    /// Check the store is reachable.
    async fn check_connectivity(&self) -> StorageResult<()>;
}
