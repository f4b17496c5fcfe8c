//! Artifact storage on Cloudflare R2.
//!
//! This crate provides:
//! - The `ArtifactStore` seam (upload with overwrite, URL resolution, list, bulk delete)
//! - An S3-API client for R2
//! - An in-memory store for tests and local runs
//! - The artifact publisher

pub mod client;
pub mod error;
pub mod memory;
pub mod publisher;
pub mod store;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use publisher::ArtifactPublisher;
pub use store::{ArtifactStore, ObjectInfo};
