//! Local scratch storage for uploads and outputs.
//!
//! Every file a job touches lives under one scratch root:
//! - `uploads/<uuid>.<ext>` for files received from clients
//! - `outputs/<artifact name>` for transform results
//!
//! [`ScratchFiles`] owns a set of those paths and deletes each of them once,
//! either through an explicit [`ScratchFiles::cleanup`] or, if the owner is
//! dropped first (panic, cancelled request), synchronously in `Drop`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use vforge_models::ArtifactName;

use crate::error::MediaResult;

/// Longest client-supplied extension kept on an upload.
const MAX_EXTENSION_LEN: usize = 8;
/// Extension used when the client's is missing or unusable.
const FALLBACK_EXTENSION: &str = "bin";

/// Scratch directory layout.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
    uploads: PathBuf,
    outputs: PathBuf,
}

impl ScratchDir {
    /// Create the directory tree under `root` and resolve it to an absolute path.
    ///
    /// Absolute paths matter: the subtitle filter reads its file by path.
    pub async fn create(root: impl AsRef<Path>) -> MediaResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root.join("uploads")).await?;
        fs::create_dir_all(root.join("outputs")).await?;

        let root = fs::canonicalize(root).await?;
        Ok(Self {
            uploads: root.join("uploads"),
            outputs: root.join("outputs"),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs
    }

    /// Fresh path for an upload, keeping a sanitised extension of the client filename.
    pub fn upload_path(&self, original_name: Option<&str>) -> PathBuf {
        let ext = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty()
                    && ext.len() <= MAX_EXTENSION_LEN
                    && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

        self.uploads.join(format!("{}.{}", Uuid::new_v4(), ext))
    }

    /// Output path for an artifact; the file name is the artifact name.
    pub fn output_path(&self, artifact: &ArtifactName) -> PathBuf {
        self.outputs.join(artifact.as_str())
    }
}

/// Delete every path that exists. Missing paths are skipped.
///
/// Never fails: deletion errors other than "not found" are logged and the
/// remaining paths are still processed. Returns the number of files removed.
pub async fn cleanup<P: AsRef<Path>>(paths: &[P]) -> usize {
    let mut removed = 0;
    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed scratch file {}", path.display());
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove scratch file {}: {}", path.display(), e),
        }
    }
    removed
}

/// Owned set of scratch paths, deleted exactly once.
#[derive(Debug, Default)]
pub struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a path. The file does not need to exist yet.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Give up ownership of a path without deleting it.
    pub fn release(&mut self, path: &Path) -> Option<PathBuf> {
        let idx = self.paths.iter().position(|p| p == path)?;
        Some(self.paths.remove(idx))
    }

    /// Move ownership of `path` into `other`. Returns false if not owned here.
    pub fn transfer(&mut self, path: &Path, other: &mut ScratchFiles) -> bool {
        match self.release(path) {
            Some(path) => {
                other.track(path);
                true
            }
            None => false,
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete every owned path. Consumes the set so it cannot run twice.
    pub async fn cleanup(mut self) -> usize {
        let paths = std::mem::take(&mut self.paths);
        cleanup(&paths).await
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed scratch file {} on drop", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove scratch file {}: {}", path.display(), e),
            }
        }
    }
}
