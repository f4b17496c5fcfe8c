//! Job construction.
//!
//! A [`Job`] is built from whatever the ingestion layer received. Building
//! validates the file fields first and the parameters second; only after
//! both pass does the job claim the uploaded files and reserve its output.
//! A failed build therefore leaves every uploaded file with its original
//! owner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use vforge_media::{ScratchDir, ScratchFiles, TransformSpec};
use vforge_models::{
    ArtifactName, CropParams, Operation, TrimParams, ValidationError, ValidationResult,
    AUDIO_FIELD, MERGE_FIELD, SUBTITLE_FIELD, VIDEO_FIELD,
};

/// Received request inputs a job can be built from.
pub trait JobSource {
    /// Text fields by name.
    fn fields(&self) -> &HashMap<String, String>;

    /// Local paths of the files received under `field`, in arrival order.
    fn files(&self, field: &str) -> &[PathBuf];

    /// Hand ownership of `path` over to `into`. Returns false if not owned.
    fn claim(&mut self, path: &Path, into: &mut ScratchFiles) -> bool;
}

/// One in-flight request.
#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub spec: TransformSpec,
    pub artifact: ArtifactName,
    pub output: PathBuf,
    /// Every path the job touches: inputs, output, auxiliary files.
    pub files: ScratchFiles,
}

impl Job {
    /// Validate `source` for `operation` and build the job.
    pub fn build<S: JobSource>(
        operation: Operation,
        source: &mut S,
        scratch: &ScratchDir,
    ) -> ValidationResult<Self> {
        for &(field, expected) in operation.file_fields() {
            let actual = source.files(field).len();
            if actual == 0 {
                return Err(ValidationError::missing_file(field));
            }
            if actual != expected {
                return Err(ValidationError::FileCount {
                    field: field.to_string(),
                    expected,
                    actual,
                });
            }
        }

        let spec = match operation {
            Operation::Trim => TransformSpec::Trim {
                input: nth_file(source, VIDEO_FIELD, 0)?,
                params: TrimParams::from_fields(source.fields())?,
            },
            Operation::Crop => TransformSpec::Crop {
                input: nth_file(source, VIDEO_FIELD, 0)?,
                params: CropParams::from_fields(source.fields())?,
            },
            Operation::AddVoice => TransformSpec::AddVoice {
                video: nth_file(source, VIDEO_FIELD, 0)?,
                audio: nth_file(source, AUDIO_FIELD, 0)?,
            },
            Operation::AddCaption => TransformSpec::AddCaption {
                video: nth_file(source, VIDEO_FIELD, 0)?,
                subtitle: nth_file(source, SUBTITLE_FIELD, 0)?,
            },
            Operation::Merge => TransformSpec::Merge {
                first: nth_file(source, MERGE_FIELD, 0)?,
                second: nth_file(source, MERGE_FIELD, 1)?,
            },
        };

        let artifact = ArtifactName::generate(operation, Utc::now());
        let output = scratch.output_path(&artifact);

        let mut files = ScratchFiles::new();
        for input in spec.inputs() {
            source.claim(input, &mut files);
        }
        files.track(&output);
        for aux in spec.auxiliary_paths(&output) {
            files.track(aux);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            spec,
            artifact,
            output,
            files,
        })
    }
}

/// File counts are checked before this runs, so a miss means a missing field.
fn nth_file<S: JobSource>(source: &S, field: &str, index: usize) -> ValidationResult<PathBuf> {
    source
        .files(field)
        .get(index)
        .cloned()
        .ok_or_else(|| ValidationError::missing_file(field))
}
