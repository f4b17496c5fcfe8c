//! Structured job logging.

use tracing::{error, info, Span};
use uuid::Uuid;

use vforge_models::Operation;

/// Logs job lifecycle events with the job id and operation attached.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: Operation,
}

impl JobLogger {
    pub fn new(job_id: &Uuid, operation: Operation) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    pub fn log_error(&self, stage: &str, message: &str) {
        error!(
            job_id = %self.job_id,
            operation = %self.operation,
            stage = stage,
            "Job failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    /// Span carrying the job id, for instrumenting the whole job.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger_fields() {
        let id = Uuid::new_v4();
        let logger = JobLogger::new(&id, Operation::AddCaption);

        assert_eq!(logger.job_id, id.to_string());
        assert_eq!(logger.operation, Operation::AddCaption);
    }
}
