//! Multipart ingestion.
//!
//! Streams every file part of a request into scratch storage and keeps the
//! text parts in memory. The form owns every file it wrote until a job claims
//! it; whatever is left is deleted by [`UploadedForm::discard`], or by `Drop`
//! if the request fails half way through.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use vforge_media::{ScratchDir, ScratchFiles};
use vforge_models::ValidationError;
use vforge_worker::JobSource;

use crate::error::{ApiError, ApiResult};

/// A received multipart form.
#[derive(Debug, Default)]
pub struct UploadedForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<PathBuf>>,
    owned: ScratchFiles,
}

impl UploadedForm {
    /// Read the whole form, writing file parts under `scratch`.
    pub async fn receive(mut multipart: Multipart, scratch: &ScratchDir) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let path = scratch.upload_path(field.file_name());
                // Owned before the first byte lands so a failed write is still removed.
                form.owned.track(&path);
                let size = write_field(field, &path).await?;
                debug!("Received {} ({} bytes) -> {}", name, size, path.display());
                form.files.entry(name).or_default().push(path);
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Delete every file no job has claimed.
    pub async fn discard(self) -> usize {
        let UploadedForm { owned, .. } = self;
        owned.cleanup().await
    }
}

impl JobSource for UploadedForm {
    fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    fn files(&self, field: &str) -> &[PathBuf] {
        self.files.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn claim(&mut self, path: &Path, into: &mut ScratchFiles) -> bool {
        self.owned.transfer(path, into)
    }
}

async fn write_field(mut field: Field<'_>, path: &Path) -> ApiResult<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create upload file: {}", e)))?;

    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to write upload file: {}", e)))?;
    }
    file.flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to write upload file: {}", e)))?;

    Ok(size)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::Validation(ValidationError::malformed(e.body_text()))
    }
}
