//! Job error types.

use thiserror::Error;

use vforge_media::MediaError;
use vforge_storage::StorageError;

pub type JobResult<T> = Result<T, JobError>;

/// Why a job failed. The variant tells the caller which stage failed.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Transform failed: {0}")]
    Transform(#[from] MediaError),

    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),
}

impl JobError {
    /// Stage label used in logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            JobError::Transform(_) => "transform",
            JobError::Upload(_) => "upload",
        }
    }

    /// Diagnostic detail for the client.
    pub fn details(&self) -> String {
        match self {
            JobError::Transform(e) => e.details(),
            JobError::Upload(e) => e.to_string(),
        }
    }
}
