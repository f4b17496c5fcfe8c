//! Application state.

use std::sync::Arc;

use vforge_media::{ScratchDir, TransformInvoker};
use vforge_storage::{ArtifactPublisher, ArtifactStore, R2Client};
use vforge_worker::JobPipeline;

use crate::config::ApiConfig;

/// Shared application state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub scratch: Arc<ScratchDir>,
    pub store: Arc<dyn ArtifactStore>,
    pub pipeline: Arc<JobPipeline>,
}

impl AppState {
    /// Create application state backed by R2.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let scratch = ScratchDir::create(&config.scratch_dir).await?;
        let store = R2Client::from_env()?;
        Ok(Self::with_store(config, scratch, Arc::new(store)))
    }

    /// Create application state over an existing scratch directory and store.
    pub fn with_store(config: ApiConfig, scratch: ScratchDir, store: Arc<dyn ArtifactStore>) -> Self {
        let pipeline = JobPipeline::new(
            TransformInvoker::new(config.ffmpeg_path.clone()),
            ArtifactPublisher::new(Arc::clone(&store)),
        );

        Self {
            config,
            scratch: Arc::new(scratch),
            store,
            pipeline: Arc::new(pipeline),
        }
    }
}
