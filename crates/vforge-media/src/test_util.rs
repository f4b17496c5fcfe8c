//! Stub engines for exercising transforms without FFmpeg.
//!
//! Available to other crates' tests through the `test-util` feature. The
//! scripts are written once per process, before anything spawns them, so no
//! test execs a file another thread still holds open for writing.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;

/// What the failing stub prints on stderr.
pub const STUB_FAILURE: &str = "Invalid data found when processing input";

/// What the succeeding stub writes to its output.
pub const STUB_OUTPUT: &[u8] = b"stub-media";

/// Shell scripts standing in for the ffmpeg binary.
pub struct StubEngines {
    _dir: TempDir,
    ok: PathBuf,
    fail: PathBuf,
    silent: PathBuf,
}

impl StubEngines {
    /// Writes [`STUB_OUTPUT`] to its last argument and exits 0.
    pub fn ok(&self) -> &Path {
        &self.ok
    }

    /// Writes a partial output, prints [`STUB_FAILURE`] and exits 1.
    pub fn fail(&self) -> &Path {
        &self.fail
    }

    /// Exits 0 without writing anything.
    pub fn silent(&self) -> &Path {
        &self.silent
    }
}

pub fn stub_engines() -> &'static StubEngines {
    static ENGINES: OnceLock<StubEngines> = OnceLock::new();
    ENGINES.get_or_init(|| {
        let dir = TempDir::new().expect("create stub engine dir");
        let write = |name: &str, body: String| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("write stub engine");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("chmod stub engine");
            path
        };
        let output = String::from_utf8_lossy(STUB_OUTPUT);

        StubEngines {
            ok: write(
                "ffmpeg-ok",
                format!(
                    "for arg in \"$@\"; do out=\"$arg\"; done\nprintf '{}' > \"$out\"\n",
                    output
                ),
            ),
            fail: write(
                "ffmpeg-fail",
                format!(
                    "for arg in \"$@\"; do out=\"$arg\"; done\nprintf 'partial' > \"$out\"\necho '{}' >&2\nexit 1\n",
                    STUB_FAILURE
                ),
            ),
            silent: write("ffmpeg-silent", "exit 0\n".to_string()),
            _dir: dir,
        }
    })
}
