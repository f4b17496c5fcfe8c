//! Shared data models for the VForge media service.
//!
//! This crate provides Serde-serializable types for:
//! - Operation kinds and their multipart field contracts
//! - Typed per-operation parameters with defaults
//! - Artifact naming
//! - JSON response bodies

pub mod artifact;
pub mod error;
pub mod operation;
pub mod params;
pub mod response;

// Re-export common types
pub use artifact::{
    Artifact, ArtifactName, ARTIFACT_CONTENT_TYPE, DEFAULT_RETENTION_HOURS, OUTPUT_EXTENSION,
};
pub use error::{ValidationError, ValidationResult};
pub use operation::{
    Operation, AUDIO_FIELD, MERGE_FIELD, MERGE_INPUT_COUNT, SUBTITLE_FIELD, VIDEO_FIELD,
};
pub use params::{CropParams, TrimParams};
pub use response::{ErrorResponse, TransformResponse};
