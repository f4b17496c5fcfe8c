//! Operation kinds supported by the transform service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multipart field carrying the primary video.
pub const VIDEO_FIELD: &str = "video";
/// Multipart field carrying the replacement audio track.
pub const AUDIO_FIELD: &str = "audio";
/// Multipart field carrying the subtitle file.
pub const SUBTITLE_FIELD: &str = "subtitle";
/// Multipart field carrying both videos of a merge.
pub const MERGE_FIELD: &str = "videos";
/// Number of videos a merge takes.
pub const MERGE_INPUT_COUNT: usize = 2;

/// One of the five transformations a job can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Cut a time range with stream copy
    Trim,
    /// Apply a rectangular crop
    Crop,
    /// Replace the audio track
    AddVoice,
    /// Burn subtitles into the frames
    AddCaption,
    /// Concatenate two videos
    Merge,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Trim,
        Operation::Crop,
        Operation::AddVoice,
        Operation::AddCaption,
        Operation::Merge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Trim => "trim",
            Operation::Crop => "crop",
            Operation::AddVoice => "add_voice",
            Operation::AddCaption => "add_caption",
            Operation::Merge => "merge",
        }
    }

    /// HTTP route serving this operation.
    pub fn route(&self) -> &'static str {
        match self {
            Operation::Trim => "/trim",
            Operation::Crop => "/crop",
            Operation::AddVoice => "/add-voice",
            Operation::AddCaption => "/add-caption",
            Operation::Merge => "/merge",
        }
    }

    /// Multipart file fields the operation requires, with the number of files per field.
    pub fn file_fields(&self) -> &'static [(&'static str, usize)] {
        match self {
            Operation::Trim | Operation::Crop => &[(VIDEO_FIELD, 1)],
            Operation::AddVoice => &[(VIDEO_FIELD, 1), (AUDIO_FIELD, 1)],
            Operation::AddCaption => &[(VIDEO_FIELD, 1), (SUBTITLE_FIELD, 1)],
            Operation::Merge => &[(MERGE_FIELD, MERGE_INPUT_COUNT)],
        }
    }

    /// Parse from the snake_case name used in artifact names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
