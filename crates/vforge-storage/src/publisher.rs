//! Artifact publisher.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use vforge_models::{ArtifactName, ARTIFACT_CONTENT_TYPE};

use crate::error::{StorageError, StorageResult};
use crate::store::ArtifactStore;

/// Uploads finished outputs and resolves their retrieval URL.
#[derive(Clone)]
pub struct ArtifactPublisher {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Upload `local` under `name` and return its retrieval URL.
    ///
    /// Publishing the same name twice overwrites. A URL that is empty or not
    /// an absolute http(s) URL counts as a failed publish, and the object
    /// just written is removed again so nothing unreachable is left behind.
    pub async fn publish(&self, local: &Path, name: &ArtifactName) -> StorageResult<String> {
        let key = name.as_str();

        self.store
            .upload_file(local, key, ARTIFACT_CONTENT_TYPE)
            .await?;

        let resolved = self
            .store
            .public_url(key)
            .await
            .and_then(|url| validate_url(key, &url).map(|_| url));

        let url = match resolved {
            Ok(url) => url,
            Err(e) => {
                self.discard(key).await;
                return Err(e);
            }
        };

        info!("Published artifact {} -> {}", key, url);
        Ok(url)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.delete_objects(&[key.to_string()]).await {
            warn!("Failed to remove unpublishable artifact {}: {}", key, e);
        }
    }
}

fn validate_url(key: &str, url: &str) -> StorageResult<()> {
    let invalid = || StorageError::InvalidUrl {
        key: key.to_string(),
        url: url.to_string(),
    };

    if url.trim().is_empty() {
        return Err(invalid());
    }

    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::Utc;
    use tempfile::TempDir;
    use vforge_models::Operation;

    fn output(dir: &TempDir, body: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("out.mp4");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_publish_returns_url() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let publisher = ArtifactPublisher::new(store.clone());
        let name = ArtifactName::generate(Operation::Trim, Utc::now());

        let url = publisher.publish(&output(&dir, b"video"), &name).await.unwrap();

        assert!(url.ends_with(name.as_str()));
        assert_eq!(store.get(name.as_str()).unwrap(), b"video");
        assert_eq!(
            store.content_type(name.as_str()).unwrap(),
            ARTIFACT_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_publish_twice_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let publisher = ArtifactPublisher::new(store.clone());
        let name = ArtifactName::generate(Operation::Crop, Utc::now());

        let first = publisher.publish(&output(&dir, b"one"), &name).await.unwrap();
        let second = publisher.publish(&output(&dir, b"two"), &name).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(name.as_str()).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_upload_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        store.set_fail_uploads(true);
        let publisher = ArtifactPublisher::new(store);
        let name = ArtifactName::generate(Operation::Merge, Utc::now());

        assert!(matches!(
            publisher.publish(&output(&dir, b"x"), &name).await,
            Err(StorageError::UploadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_unusable_url_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::with_public_base(""));
        let publisher = ArtifactPublisher::new(store.clone());
        let name = ArtifactName::generate(Operation::AddVoice, Utc::now());

        assert!(matches!(
            publisher.publish(&output(&dir, b"x"), &name).await,
            Err(StorageError::InvalidUrl { .. })
        ));
        assert!(!store.contains(name.as_str()));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("k", "https://cdn.example.com/k").is_ok());
        assert!(validate_url("k", "").is_err());
        assert!(validate_url("k", "ftp://host/k").is_err());
        assert!(validate_url("k", "k").is_err());
    }
}
