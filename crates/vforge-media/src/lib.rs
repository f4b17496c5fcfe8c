//! FFmpeg CLI wrapper for the VForge transforms.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - A runner that waits for exactly one terminal outcome
//! - The five transforms (trim, crop, add voice, add caption, merge)
//! - Scratch-file naming and guaranteed deletion
//! - FFprobe media inspection

pub mod command;
pub mod error;
pub mod filters;
pub mod probe;
pub mod scratch;
pub mod transform;

#[cfg(all(unix, any(test, feature = "test-util")))]
pub mod test_util;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_media, MediaInfo};
pub use scratch::{cleanup, ScratchDir, ScratchFiles};
pub use transform::{ResourceLimits, TransformInvoker, TransformSpec};
