//! Background service deleting expired artifacts.
//!
//! Each run lists the bucket, selects objects older than the retention
//! window and removes them with one bulk delete. Failures are logged and
//! left for the next run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use vforge_models::ArtifactName;
use vforge_storage::{ArtifactStore, ObjectInfo};

use crate::config::RetentionConfig;
use crate::metrics;

/// Retention sweeper service.
pub struct RetentionSweeper {
    store: Arc<dyn ArtifactStore>,
    config: RetentionConfig,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn ArtifactStore>, config: RetentionConfig) -> Self {
        Self { store, config }
    }

    /// Run the sweep loop forever. Spawn as a background task.
    pub async fn run(&self) {
        if !self.config.enabled {
            info!("Artifact retention sweeper is disabled");
            return;
        }

        info!(
            "Starting retention sweeper (interval: {:?}, max age: {:?})",
            self.config.interval, self.config.max_age
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.sweep_once().await {
                metrics::record_sweep_failure();
                error!("Retention sweep failed: {:#}", e);
            }
        }
    }

    /// Run a single sweep. Returns the number of artifacts deleted.
    pub async fn sweep_once(&self) -> anyhow::Result<u32> {
        let objects = self.store.list_objects().await?;
        let expired = select_expired(&objects, Utc::now(), self.config.max_age);

        if expired.is_empty() {
            debug!("Retention sweep: nothing to delete ({} objects)", objects.len());
            return Ok(0);
        }

        let deleted = self.store.delete_objects(&expired).await?;
        metrics::record_artifacts_swept(deleted);
        info!(
            "Retention sweep deleted {} of {} artifacts",
            deleted,
            objects.len()
        );

        Ok(deleted)
    }
}

/// Keys of objects strictly older than `max_age` at `now`.
///
/// The store's write time is authoritative; objects without one fall back to
/// the timestamp embedded in their artifact name, and are kept if neither
/// is known.
pub fn select_expired(objects: &[ObjectInfo], now: DateTime<Utc>, max_age: Duration) -> Vec<String> {
    let Ok(max_age) = chrono::Duration::from_std(max_age) else {
        return Vec::new();
    };

    objects
        .iter()
        .filter(|obj| {
            obj.last_modified
                .or_else(|| ArtifactName::from_string(obj.key.as_str()).created_at())
                .is_some_and(|created| now - created > max_age)
        })
        .map(|obj| obj.key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vforge_models::Operation;
    use vforge_storage::MemoryStore;

    const DAY: Duration = Duration::from_secs(24 * 3600);

    fn object(key: &str, last_modified: Option<DateTime<Utc>>) -> ObjectInfo {
        ObjectInfo {
            key: key.to_string(),
            size: 1,
            last_modified,
        }
    }

    #[test]
    fn test_select_expired_boundaries() {
        let now = Utc::now();
        let objects = vec![
            object("old.mp4", Some(now - chrono::Duration::hours(25))),
            object("recent.mp4", Some(now - chrono::Duration::hours(1))),
            object("exact.mp4", Some(now - chrono::Duration::hours(24))),
            object("unknown.mp4", None),
        ];

        assert_eq!(select_expired(&objects, now, DAY), vec!["old.mp4".to_string()]);
    }

    #[test]
    fn test_select_expired_falls_back_to_name() {
        let now = Utc::now();
        let name = ArtifactName::generate(Operation::Trim, now - chrono::Duration::hours(30));
        let objects = vec![object(name.as_str(), None)];

        assert_eq!(
            select_expired(&objects, now, DAY),
            vec![name.as_str().to_string()]
        );
    }

    #[tokio::test]
    async fn test_sweep_once_deletes_only_expired() {
        let store = Arc::new(MemoryStore::new());
        store.insert_with_age("stale.mp4", vec![0], chrono::Duration::hours(48));
        store.insert_with_age("fresh.mp4", vec![0], chrono::Duration::hours(1));

        let sweeper = RetentionSweeper::new(store.clone(), RetentionConfig::default());

        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
        assert_eq!(store.keys(), vec!["fresh.mp4".to_string()]);

        // Nothing left to delete on the next run
        assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.insert_with_age("stale.mp4", vec![0], chrono::Duration::hours(48));
        store.set_fail_listing(true);

        let sweeper = RetentionSweeper::new(store.clone(), RetentionConfig::default());
        assert!(sweeper.sweep_once().await.is_err());

        store.set_fail_listing(false);
        assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
    }
}
