//! In-memory artifact store.
//!
//! Used by tests and by local runs without R2 credentials. Supports failure
//! injection so callers can exercise their error paths.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::fs;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::{ArtifactStore, ObjectInfo};

const DEFAULT_PUBLIC_BASE: &str = "https://memory.invalid/artifacts";

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Artifact store backed by a map.
#[derive(Debug)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    public_base: String,
    fail_uploads: AtomicBool,
    fail_listing: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_public_base(DEFAULT_PUBLIC_BASE)
    }

    /// Store whose URLs are `<base>/<key>`. An empty base yields bare keys.
    pub fn with_public_base(base: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base: base.into(),
            fail_uploads: AtomicBool::new(false),
            fail_listing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent upload fail.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent listing fail.
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Insert an object written at `last_modified`.
    pub fn insert_at(&self, key: impl Into<String>, data: Vec<u8>, last_modified: DateTime<Utc>) {
        self.write().insert(
            key.into(),
            StoredObject {
                data,
                content_type: "application/octet-stream".to_string(),
                last_modified,
            },
        );
    }

    /// Insert an object that is `age` old.
    pub fn insert_with_age(&self, key: impl Into<String>, data: Vec<u8>, age: Duration) {
        self.insert_at(key, data, Utc::now() - age);
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.read().get(key).map(|o| o.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.read().get(key).map(|o| o.content_type.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StoredObject>> {
        self.objects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StoredObject>> {
        self.objects.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::upload_failed("injected upload failure"));
        }

        let data = fs::read(path)
            .await
            .map_err(|e| StorageError::upload_failed(format!("{}: {}", path.display(), e)))?;

        debug!("Stored {} bytes under {}", data.len(), key);
        self.write().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn public_url(&self, key: &str) -> StorageResult<String> {
        if self.public_base.is_empty() {
            return Ok(key.to_string());
        }
        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), key))
    }

    async fn list_objects(&self) -> StorageResult<Vec<ObjectInfo>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StorageError::list_failed("injected listing failure"));
        }

        let mut objects: Vec<ObjectInfo> = self
            .read()
            .iter()
            .map(|(key, obj)| ObjectInfo {
                key: key.clone(),
                size: obj.data.len() as u64,
                last_modified: Some(obj.last_modified),
            })
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn delete_objects(&self, keys: &[String]) -> StorageResult<u32> {
        let mut objects = self.write();
        for key in keys {
            objects.remove(key);
        }
        Ok(keys.len() as u32)
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.mp4");
        let store = MemoryStore::new();

        std::fs::write(&path, b"first").unwrap();
        store.upload_file(&path, "k.mp4", "video/mp4").await.unwrap();
        std::fs::write(&path, b"second").unwrap();
        store.upload_file(&path, "k.mp4", "video/mp4").await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k.mp4").unwrap(), b"second");
        assert_eq!(store.content_type("k.mp4").unwrap(), "video/mp4");
    }

    #[tokio::test]
    async fn test_injected_upload_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.mp4");
        std::fs::write(&path, b"data").unwrap();

        let store = MemoryStore::new();
        store.set_fail_uploads(true);
        assert!(matches!(
            store.upload_file(&path, "k.mp4", "video/mp4").await,
            Err(StorageError::UploadFailed(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemoryStore::new();
        store.insert_with_age("old.mp4", vec![1, 2, 3], Duration::hours(30));
        store.insert_with_age("new.mp4", vec![1], Duration::minutes(5));

        let listed = store.list_objects().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].key, "old.mp4");
        assert_eq!(listed[1].size, 3);

        store.delete_objects(&["old.mp4".to_string()]).await.unwrap();
        assert_eq!(store.keys(), vec!["new.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_public_url() {
        let store = MemoryStore::with_public_base("https://cdn.example.com/");
        assert_eq!(
            store.public_url("a.mp4").await.unwrap(),
            "https://cdn.example.com/a.mp4"
        );
    }
}
