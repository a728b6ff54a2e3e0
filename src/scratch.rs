use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context as _;

use crate::{error::ZoomResult, schedule::FrameIndex};

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// ffmpeg input pattern matching the files produced by [`ScratchDir::frame_path`].
pub const FRAME_PATTERN: &str = "%04d.png";

/// Ephemeral directory holding the intermediate frame files for one run.
///
/// The directory is created fresh per run and removed (with everything in
/// it) when the guard drops, on success and on error paths alike.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh per-run directory under the system temp dir.
    pub fn create(prefix: &str) -> ZoomResult<Self> {
        let path = std::env::temp_dir().join(format!(
            "{prefix}_{}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create scratch directory '{}'", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Zero-padded frame file path inside the directory, `0001.png` onward.
    pub fn frame_path(&self, frame: FrameIndex) -> PathBuf {
        self.path.join(format!("{:04}.png", frame.0))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
