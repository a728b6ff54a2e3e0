use std::path::{Path, PathBuf};

use crate::{
    error::{ZoomError, ZoomResult},
    runner::{CommandRunner, CommandSpec},
    scratch::FRAME_PATTERN,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> ZoomResult<()> {
        if self.fps == 0 {
            return Err(ZoomError::validation("encode fps must be non-zero"));
        }
        Ok(())
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }
}

pub fn default_gif_config(out_path: impl Into<PathBuf>) -> EncodeConfig {
    EncodeConfig {
        fps: 30,
        out_path: out_path.into(),
        overwrite: true,
    }
}

/// Cheap availability probe, run through the injected runner.
pub fn is_ffmpeg_available(runner: &mut dyn CommandRunner) -> bool {
    runner
        .run(&CommandSpec::new("ffmpeg").arg("-version"))
        .map(|o| o.success)
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> ZoomResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Build the single encode invocation over the frame sequence.
///
/// The command runs from inside the scratch directory so the relative
/// `%04d.png` pattern resolves there; `out_path` must already be absolute.
pub fn encode_command(cfg: &EncodeConfig, scratch_dir: &Path) -> CommandSpec {
    let mut spec = CommandSpec::new("ffmpeg");
    spec = if cfg.overwrite {
        spec.arg("-y")
    } else {
        spec.arg("-n")
    };
    spec.arg("-loglevel")
        .arg("error")
        .arg("-f")
        .arg("image2")
        .arg("-framerate")
        .arg(cfg.fps.to_string())
        .arg("-i")
        .arg(FRAME_PATTERN)
        .arg(&cfg.out_path)
        .current_dir(scratch_dir)
}

/// Encode the frame sequence in `scratch_dir` into `cfg.out_path`.
///
/// A relative output path is resolved against the invoking directory, not
/// the scratch cwd. A nonzero ffmpeg exit is always an error.
pub fn encode_frames(
    cfg: &EncodeConfig,
    scratch_dir: &Path,
    runner: &mut dyn CommandRunner,
) -> ZoomResult<()> {
    cfg.validate()?;

    let cfg = if cfg.out_path.is_absolute() {
        cfg.clone()
    } else {
        use anyhow::Context as _;
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        cfg.clone().with_out_path(cwd.join(&cfg.out_path))
    };

    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(ZoomError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    let outcome = runner.run(&encode_command(&cfg, scratch_dir))?;
    if !outcome.success {
        return Err(ZoomError::encode(format!(
            "ffmpeg exited with status {}: {}",
            outcome
                .status_code
                .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            outcome.stderr
        )));
    }

    Ok(())
}
