//! Job pipeline for the media service.
//!
//! This crate provides:
//! - `Job` construction and validation from received request inputs
//! - The transform → publish → cleanup pipeline
//! - The job error taxonomy
//! - Structured job logging and processing metrics

pub mod error;
pub mod job;
pub mod logging;
pub mod metrics;
pub mod processor;

pub use error::{JobError, JobResult};
pub use job::{Job, JobSource};
pub use logging::JobLogger;
pub use processor::{JobPipeline, JobStage};
