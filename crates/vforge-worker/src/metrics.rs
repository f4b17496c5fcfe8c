//! Job metrics.
//!
//! Emitted through the `metrics` facade; the API binary installs the
//! Prometheus recorder. Without a recorder these calls are no-ops.

use metrics::{counter, histogram};

use vforge_models::Operation;

pub mod names {
    pub const FFMPEG_DURATION_SECONDS: &str = "vforge_ffmpeg_duration_seconds";
    pub const UPLOAD_DURATION_SECONDS: &str = "vforge_upload_duration_seconds";
    pub const JOBS_COMPLETED_TOTAL: &str = "vforge_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vforge_jobs_failed_total";
    pub const SCRATCH_FILES_REMOVED_TOTAL: &str = "vforge_scratch_files_removed_total";
}

pub fn record_ffmpeg_duration(operation: Operation, duration_secs: f64) {
    let labels = [("operation", operation.as_str())];
    histogram!(names::FFMPEG_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_upload_duration(duration_secs: f64) {
    histogram!(names::UPLOAD_DURATION_SECONDS).record(duration_secs);
}

pub fn record_job_completed(operation: Operation) {
    let labels = [("operation", operation.as_str())];
    counter!(names::JOBS_COMPLETED_TOTAL, &labels).increment(1);
}

pub fn record_job_failed(operation: Operation, stage: &'static str) {
    let labels = [("operation", operation.as_str()), ("stage", stage)];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_scratch_removed(count: usize) {
    counter!(names::SCRATCH_FILES_REMOVED_TOTAL).increment(count as u64);
}
