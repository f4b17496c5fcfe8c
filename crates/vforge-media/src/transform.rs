//! Transform invoker.
//!
//! Translates one operation plus its parameters into an FFmpeg invocation,
//! applies the same resource limits to every invocation, runs it, and
//! checks the output before handing it back.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use vforge_models::{CropParams, Operation, TrimParams};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{concat_list, crop_filter, subtitles_filter};

/// Video codec for re-encoding operations.
const VIDEO_CODEC: &str = "libx264";
/// Audio codec for re-encoding operations.
const AUDIO_CODEC: &str = "aac";

/// Per-invocation limits that bound memory and CPU on small hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// FFmpeg worker threads
    pub threads: u32,
    /// Encoder preset
    pub preset: String,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            threads: 1,
            preset: "ultrafast".to_string(),
        }
    }
}

/// A validated transform with its input paths.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    Trim { input: PathBuf, params: TrimParams },
    Crop { input: PathBuf, params: CropParams },
    AddVoice { video: PathBuf, audio: PathBuf },
    AddCaption { video: PathBuf, subtitle: PathBuf },
    Merge { first: PathBuf, second: PathBuf },
}

impl TransformSpec {
    pub fn operation(&self) -> Operation {
        match self {
            TransformSpec::Trim { .. } => Operation::Trim,
            TransformSpec::Crop { .. } => Operation::Crop,
            TransformSpec::AddVoice { .. } => Operation::AddVoice,
            TransformSpec::AddCaption { .. } => Operation::AddCaption,
            TransformSpec::Merge { .. } => Operation::Merge,
        }
    }

    /// Input files in the order the engine reads them.
    pub fn inputs(&self) -> Vec<&Path> {
        match self {
            TransformSpec::Trim { input, .. } | TransformSpec::Crop { input, .. } => {
                vec![input.as_path()]
            }
            TransformSpec::AddVoice { video, audio } => vec![video.as_path(), audio.as_path()],
            TransformSpec::AddCaption { video, subtitle } => {
                vec![video.as_path(), subtitle.as_path()]
            }
            TransformSpec::Merge { first, second } => vec![first.as_path(), second.as_path()],
        }
    }

    /// Extra files the invocation writes next to `output`.
    pub fn auxiliary_paths(&self, output: &Path) -> Vec<PathBuf> {
        match self {
            TransformSpec::Merge { .. } => vec![concat_list_path(output)],
            _ => Vec::new(),
        }
    }
}

/// Concat list written for a merge.
fn concat_list_path(output: &Path) -> PathBuf {
    output.with_extension("txt")
}

/// Builds and runs transforms.
#[derive(Debug, Clone)]
pub struct TransformInvoker {
    runner: FfmpegRunner,
    limits: ResourceLimits,
}

impl TransformInvoker {
    pub fn new(ffmpeg_binary: impl Into<String>) -> Self {
        Self {
            runner: FfmpegRunner::new(ffmpeg_binary),
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn binary(&self) -> &str {
        self.runner.binary()
    }

    /// Build the FFmpeg command for `spec` writing to `output`.
    pub fn build_command(&self, spec: &TransformSpec, output: &Path) -> FfmpegCommand {
        let cmd = match spec {
            TransformSpec::Trim { input, params } => FfmpegCommand::new(input, output)
                .seek(params.start_time)
                .duration(params.duration)
                .codec_copy(),
            TransformSpec::Crop { input, params } => FfmpegCommand::new(input, output)
                .video_filter(crop_filter(params))
                .video_codec(VIDEO_CODEC),
            TransformSpec::AddVoice { video, audio } => FfmpegCommand::new(video, output)
                .add_input(audio)
                .map("0:v:0")
                .map("1:a:0")
                .video_codec("copy")
                .audio_codec(AUDIO_CODEC)
                .shortest(),
            TransformSpec::AddCaption { video, subtitle } => FfmpegCommand::new(video, output)
                .video_filter(subtitles_filter(subtitle))
                .video_codec(VIDEO_CODEC),
            TransformSpec::Merge { .. } => {
                FfmpegCommand::new(concat_list_path(output), output)
                    .input_args(["-f", "concat", "-safe", "0"])
                    .video_codec(VIDEO_CODEC)
                    .audio_codec(AUDIO_CODEC)
            }
        };

        cmd.threads(self.limits.threads)
            .preset(self.limits.preset.clone())
    }

    /// Run `spec` to completion and return the finalized output path.
    ///
    /// Resolves only after the engine has exited. On error the engine is no
    /// longer running; any partial output is left for the caller to delete.
    pub async fn run(&self, spec: &TransformSpec, output: &Path) -> MediaResult<PathBuf> {
        let operation = spec.operation();
        info!(
            "Running {} transform -> {}",
            operation,
            output.display()
        );

        if let TransformSpec::Merge { first, second } = spec {
            fs::write(concat_list_path(output), concat_list(&[first, second])).await?;
        }

        let cmd = self.build_command(spec, output);
        self.runner.run(&cmd).await?;

        verify_output(output).await?;

        info!("{} transform finished: {}", operation, output.display());
        Ok(output.to_path_buf())
    }
}

/// The output must exist and hold data before anything may publish it.
async fn verify_output(output: &Path) -> MediaResult<()> {
    match fs::metadata(output).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        Ok(_) => Err(MediaError::EmptyOutput(output.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MediaError::EmptyOutput(output.to_path_buf()))
        }
        Err(e) => Err(MediaError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(spec: &TransformSpec) -> Vec<String> {
        TransformInvoker::new("ffmpeg")
            .build_command(spec, Path::new("/out/result.mp4"))
            .build_args()
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_limits_apply_to_every_operation() {
        let specs = [
            TransformSpec::Trim {
                input: "/in/a.mp4".into(),
                params: TrimParams::default(),
            },
            TransformSpec::Crop {
                input: "/in/a.mp4".into(),
                params: CropParams::default(),
            },
            TransformSpec::AddVoice {
                video: "/in/a.mp4".into(),
                audio: "/in/b.mp3".into(),
            },
            TransformSpec::AddCaption {
                video: "/in/a.mp4".into(),
                subtitle: "/in/c.srt".into(),
            },
            TransformSpec::Merge {
                first: "/in/a.mp4".into(),
                second: "/in/b.mp4".into(),
            },
        ];

        for spec in &specs {
            let args = args(spec);
            assert!(has_pair(&args, "-threads", "1"), "{:?}", spec.operation());
            assert!(has_pair(&args, "-preset", "ultrafast"), "{:?}", spec.operation());
            assert_eq!(args.last().unwrap(), "/out/result.mp4");
        }
    }

    #[test]
    fn test_trim_stream_copies() {
        let args = args(&TransformSpec::Trim {
            input: "/in/a.mp4".into(),
            params: TrimParams {
                start_time: 2.5,
                duration: 5.0,
            },
        });
        assert!(has_pair(&args, "-ss", "2.500"));
        assert!(has_pair(&args, "-t", "5.000"));
        assert!(has_pair(&args, "-c", "copy"));
        assert!(!args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_crop_filter_geometry() {
        let args = args(&TransformSpec::Crop {
            input: "/in/a.mp4".into(),
            params: CropParams {
                w: 720,
                h: 1280,
                x: 10,
                y: 20,
            },
        });
        assert!(has_pair(&args, "-vf", "crop=720:1280:10:20"));
    }

    #[test]
    fn test_add_voice_maps_and_truncates() {
        let args = args(&TransformSpec::AddVoice {
            video: "/in/a.mp4".into(),
            audio: "/in/b.mp3".into(),
        });
        assert!(has_pair(&args, "-map", "0:v:0"));
        assert!(has_pair(&args, "-map", "1:a:0"));
        assert!(has_pair(&args, "-c:v", "copy"));
        assert!(args.contains(&"-shortest".to_string()));
    }

    #[test]
    fn test_add_caption_uses_absolute_subtitle_path() {
        let args = args(&TransformSpec::AddCaption {
            video: "/in/a.mp4".into(),
            subtitle: "/in/c.srt".into(),
        });
        assert!(has_pair(&args, "-vf", "subtitles=filename=/in/c.srt"));
    }

    #[test]
    fn test_merge_uses_concat_demuxer() {
        let spec = TransformSpec::Merge {
            first: "/in/a.mp4".into(),
            second: "/in/b.mp4".into(),
        };
        let args = args(&spec);
        assert!(has_pair(&args, "-f", "concat"));
        assert!(has_pair(&args, "-i", "/out/result.txt"));
        assert!(!args.contains(&"-filter_complex".to_string()));
        assert_eq!(
            spec.auxiliary_paths(Path::new("/out/result.mp4")),
            vec![PathBuf::from("/out/result.txt")]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_verifies_output() {
        use crate::test_util::stub_engines;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("trim.mp4");
        let spec = TransformSpec::Trim {
            input: dir.path().join("in.mp4"),
            params: TrimParams::default(),
        };

        let invoker = TransformInvoker::new(stub_engines().ok().to_string_lossy());
        assert_eq!(invoker.run(&spec, &output).await.unwrap(), output);

        let invoker = TransformInvoker::new(stub_engines().silent().to_string_lossy());
        let err = invoker
            .run(&spec, &dir.path().join("never.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::EmptyOutput(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_merge_writes_concat_list() {
        use crate::test_util::stub_engines;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("merge.mp4");
        let spec = TransformSpec::Merge {
            first: dir.path().join("a.mp4"),
            second: dir.path().join("b.mp4"),
        };

        let invoker = TransformInvoker::new(stub_engines().ok().to_string_lossy());
        invoker.run(&spec, &output).await.unwrap();

        let list = std::fs::read_to_string(dir.path().join("merge.txt")).unwrap();
        assert_eq!(list.lines().count(), 2);
        assert!(list.contains("a.mp4"));
    }
}
