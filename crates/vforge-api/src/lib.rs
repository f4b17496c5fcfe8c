//! Axum HTTP API server for the media service.
//!
//! This crate provides:
//! - The five transform routes plus docs, health and readiness
//! - Multipart ingestion into scratch storage
//! - Error mapping to `{error, details}` bodies
//! - Security headers, request ids, CORS and a payload limit
//! - Prometheus metrics
//! - The artifact retention sweeper

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod upload;

pub use config::{ApiConfig, RetentionConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::RetentionSweeper;
pub use state::AppState;
pub use upload::UploadedForm;
