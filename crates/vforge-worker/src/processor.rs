//! Job pipeline.
//!
//! `Transforming -> Uploading -> done`, with a single cleanup of every path
//! the job touched once either stage has reached its outcome.

use std::fmt;
use std::time::Instant;

use tracing::Instrument;

use vforge_media::TransformInvoker;
use vforge_models::Artifact;
use vforge_storage::ArtifactPublisher;

use crate::error::{JobError, JobResult};
use crate::job::Job;
use crate::logging::JobLogger;
use crate::metrics;

/// Stage a job is in while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Transforming,
    Uploading,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Transforming => write!(f, "transforming"),
            JobStage::Uploading => write!(f, "uploading"),
        }
    }
}

/// Runs jobs to completion. Shared by every request; holds no per-job state.
#[derive(Clone)]
pub struct JobPipeline {
    invoker: TransformInvoker,
    publisher: ArtifactPublisher,
}

impl JobPipeline {
    pub fn new(invoker: TransformInvoker, publisher: ArtifactPublisher) -> Self {
        Self { invoker, publisher }
    }

    pub fn invoker(&self) -> &TransformInvoker {
        &self.invoker
    }

    /// Transform, publish, clean up.
    ///
    /// Every scratch path of the job is deleted before this returns, on
    /// success and on both failure paths. No artifact exists for a job that
    /// returns an error.
    pub async fn execute(&self, job: Job) -> JobResult<Artifact> {
        let Job {
            id,
            spec,
            artifact,
            output,
            files,
            ..
        } = job;
        let operation = spec.operation();
        let logger = JobLogger::new(&id, operation);
        let span = logger.create_span();

        async move {
            logger.log_start(&format!("{} inputs", spec.inputs().len()));

            let result = async {
                logger.log_progress(&JobStage::Transforming.to_string());
                let started = Instant::now();
                self.invoker.run(&spec, &output).await?;
                metrics::record_ffmpeg_duration(operation, started.elapsed().as_secs_f64());

                logger.log_progress(&JobStage::Uploading.to_string());
                let started = Instant::now();
                let url = self.publisher.publish(&output, &artifact).await?;
                metrics::record_upload_duration(started.elapsed().as_secs_f64());

                Ok::<_, JobError>(Artifact {
                    name: artifact.clone(),
                    url,
                })
            }
            .await;

            let removed = files.cleanup().await;
            metrics::record_scratch_removed(removed);

            match &result {
                Ok(published) => {
                    metrics::record_job_completed(operation);
                    logger.log_completion(&published.url);
                }
                Err(e) => {
                    metrics::record_job_failed(operation, e.stage());
                    logger.log_error(e.stage(), &e.to_string());
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::job::tests::TestSource;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use vforge_media::test_util::{stub_engines, STUB_FAILURE, STUB_OUTPUT};
    use vforge_media::{MediaError, ScratchDir};
    use vforge_models::{Operation, MERGE_FIELD, SUBTITLE_FIELD, VIDEO_FIELD};
    use vforge_storage::{MemoryStore, StorageError};

    fn pipeline(engine: &Path, store: Arc<MemoryStore>) -> JobPipeline {
        JobPipeline::new(
            TransformInvoker::new(engine.to_string_lossy()),
            ArtifactPublisher::new(store),
        )
    }

    fn scratch_is_empty(scratch: &ScratchDir) -> bool {
        std::fs::read_dir(scratch.uploads_dir()).unwrap().count() == 0
            && std::fs::read_dir(scratch.outputs_dir()).unwrap().count() == 0
    }

    #[tokio::test]
    async fn test_success_publishes_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let mut source = TestSource::default().file(&scratch, VIDEO_FIELD, "clip.mp4");

        let job = Job::build(Operation::Trim, &mut source, &scratch).unwrap();
        let name = job.artifact.clone();
        let artifact = pipeline(stub_engines().ok(), store.clone())
            .execute(job)
            .await
            .unwrap();

        assert_eq!(artifact.name, name);
        assert!(artifact.url.ends_with(name.as_str()));
        assert_eq!(store.get(name.as_str()).unwrap(), STUB_OUTPUT);
        assert!(scratch_is_empty(&scratch));
    }

    #[tokio::test]
    async fn test_transform_failure_removes_partial_output() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let mut source = TestSource::default()
            .file(&scratch, VIDEO_FIELD, "clip.mp4")
            .file(&scratch, SUBTITLE_FIELD, "subs.srt");

        let job = Job::build(Operation::AddCaption, &mut source, &scratch).unwrap();
        let err = pipeline(stub_engines().fail(), store.clone())
            .execute(job)
            .await
            .unwrap_err();

        match err {
            JobError::Transform(MediaError::FfmpegFailed { stderr, .. }) => {
                assert_eq!(stderr.as_deref(), Some(STUB_FAILURE));
            }
            other => panic!("expected transform failure, got {:?}", other),
        }
        assert!(store.is_empty());
        assert!(scratch_is_empty(&scratch));
    }

    #[tokio::test]
    async fn test_upload_failure_is_distinct() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        let store = Arc::new(MemoryStore::new());
        store.set_fail_uploads(true);
        let mut source = TestSource::default()
            .file(&scratch, MERGE_FIELD, "a.mp4")
            .file(&scratch, MERGE_FIELD, "b.mp4");

        let job = Job::build(Operation::Merge, &mut source, &scratch).unwrap();
        let err = pipeline(stub_engines().ok(), store.clone())
            .execute(job)
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Upload(StorageError::UploadFailed(_))));
        assert!(store.is_empty());
        assert!(scratch_is_empty(&scratch));
    }

    #[tokio::test]
    async fn test_concurrent_jobs_are_isolated() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(stub_engines().ok(), store.clone());

        let mut set = tokio::task::JoinSet::new();
        for _ in 0..4 {
            let mut source = TestSource::default().file(&scratch, VIDEO_FIELD, "clip.mp4");
            let job = Job::build(Operation::Crop, &mut source, &scratch).unwrap();
            let pipeline = pipeline.clone();
            set.spawn(async move { pipeline.execute(job).await });
        }

        while let Some(result) = set.join_next().await {
            assert!(result.unwrap().is_ok());
        }
        assert_eq!(store.len(), 4);
        assert!(scratch_is_empty(&scratch));
    }
}
