//! Artifact naming.
//!
//! An artifact takes the base name of the job's output file. The name embeds
//! the creation time in unix milliseconds plus a short random suffix so two
//! jobs finishing in the same millisecond still write distinct objects:
//! `<operation>-<millis>-<8 hex>.mp4`.

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Operation;

/// Content type of every uploaded artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "video/mp4";
/// File extension of every output.
pub const OUTPUT_EXTENSION: &str = "mp4";
/// Artifacts older than this are swept.
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Stable object name of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Generate a fresh name for an output of `operation` created at `now`.
    pub fn generate(operation: Operation, now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}-{}-{}.{}",
            operation.as_str(),
            now.timestamp_millis(),
            &suffix[..8],
            OUTPUT_EXTENSION
        ))
    }

    /// Wrap an existing object name.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Operation encoded in the name, if the name was generated by this service.
    pub fn operation(&self) -> Option<Operation> {
        let (op, _, _) = self.parts()?;
        Operation::from_name(op)
    }

    /// Creation time encoded in the name, if the name was generated by this service.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let (_, millis, _) = self.parts()?;
        let millis: i64 = millis.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    fn parts(&self) -> Option<(&str, &str, &str)> {
        let stem = self.0.strip_suffix(&format!(".{}", OUTPUT_EXTENSION))?;
        let mut parts = stem.rsplitn(3, '-');
        let suffix = parts.next()?;
        let millis = parts.next()?;
        let op = parts.next()?;
        Some((op, millis, suffix))
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Artifact {
    pub name: ArtifactName,
    /// Public retrieval URL
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_embeds_timestamp() {
        let now = Utc.timestamp_millis_opt(1_760_000_000_123).unwrap();
        let name = ArtifactName::generate(Operation::AddVoice, now);

        assert!(name.as_str().starts_with("add_voice-1760000000123-"));
        assert!(name.as_str().ends_with(".mp4"));
        assert_eq!(name.operation(), Some(Operation::AddVoice));
        assert_eq!(name.created_at(), Some(now));
    }

    #[test]
    fn test_names_are_unique_within_a_millisecond() {
        let now = Utc::now();
        let a = ArtifactName::generate(Operation::Trim, now);
        let b = ArtifactName::generate(Operation::Trim, now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_foreign_name_has_no_timestamp() {
        let name = ArtifactName::from_string("holiday.mov");
        assert_eq!(name.created_at(), None);
        assert_eq!(name.operation(), None);
    }
}
