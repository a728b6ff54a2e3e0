use std::path::{Path, PathBuf};

use crate::{
    encode_ffmpeg::{EncodeConfig, encode_frames, is_ffmpeg_available},
    error::{ZoomError, ZoomResult},
    runner::{CommandRunner, CommandSpec},
    schedule::{FrameParams, ZoomSchedule},
    scratch::ScratchDir,
};

/// How a failed renderer invocation is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Log the failure and continue with the next frame.
    #[default]
    Lenient,
    /// Abort the run at the first failing frame.
    Strict,
}

/// Options for [`render_zoom`].
#[derive(Clone, Debug)]
pub struct ZoomOpts {
    /// Fractal center x, passed through to the renderer unparsed.
    pub center_x: String,
    /// Fractal center y, passed through to the renderer unparsed.
    pub center_y: String,
    /// Escape-radius threshold, passed through to the renderer unparsed.
    pub threshold: String,
    pub schedule: ZoomSchedule,
    /// Renderer executable; a relative path resolves against the invoking
    /// directory.
    pub renderer: PathBuf,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    pub on_failure: FailureMode,
}

impl ZoomOpts {
    /// Stock 1200-frame, 30 fps run writing `out.gif` next to the caller.
    pub fn new(
        center_x: impl Into<String>,
        center_y: impl Into<String>,
        threshold: impl Into<String>,
    ) -> Self {
        Self {
            center_x: center_x.into(),
            center_y: center_y.into(),
            threshold: threshold.into(),
            schedule: ZoomSchedule::default(),
            renderer: PathBuf::from("./mandelbrot"),
            fps: 30,
            out_path: PathBuf::from("out.gif"),
            overwrite: true,
            on_failure: FailureMode::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoomStats {
    pub frames_total: u32,
    pub frames_rendered: u32,
    pub frames_failed: u32,
}

/// Render the zoom sequence frame by frame, then assemble the GIF.
///
/// Fully sequential: each renderer invocation completes before the next
/// begins, and the single encoder invocation runs after the last frame. The
/// scratch directory holding the intermediate frames is removed when this
/// function returns, on success and on error alike.
#[tracing::instrument(skip(opts, runner), fields(frames = opts.schedule.frames))]
pub fn render_zoom(opts: &ZoomOpts, runner: &mut dyn CommandRunner) -> ZoomResult<ZoomStats> {
    let encode_cfg = EncodeConfig {
        fps: opts.fps,
        out_path: opts.out_path.clone(),
        overwrite: opts.overwrite,
    };
    encode_cfg.validate()?;

    // Refuse to start before spending a full render on a missing encoder.
    if !is_ffmpeg_available(runner) {
        return Err(ZoomError::encode(
            "ffmpeg is required for GIF assembly, but was not found on PATH",
        ));
    }

    let renderer = resolve_invoking_path(&opts.renderer)?;
    let scratch = ScratchDir::create("mandelzoom_frames")?;
    tracing::info!(scratch = %scratch.path().display(), "rendering zoom sequence");

    let mut stats = ZoomStats::default();
    for params in opts.schedule.iter() {
        let out_file = scratch.frame_path(params.frame);
        let spec = render_command(opts, &renderer, &params, &out_file);
        stats.frames_total += 1;

        match runner.run(&spec) {
            Ok(outcome) if outcome.success => {
                stats.frames_rendered += 1;
                tracing::debug!(
                    frame = params.frame.0,
                    scale = params.scale,
                    limit = params.limit,
                    "frame rendered"
                );
            }
            Ok(outcome) => {
                stats.frames_failed += 1;
                let status = outcome
                    .status_code
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string());
                if opts.on_failure == FailureMode::Strict {
                    return Err(ZoomError::render(format!(
                        "renderer exited with status {status} on frame {}: {}",
                        params.frame.0, outcome.stderr
                    )));
                }
                tracing::warn!(
                    frame = params.frame.0,
                    status = %status,
                    "renderer failed; continuing"
                );
            }
            Err(err) => {
                stats.frames_failed += 1;
                if opts.on_failure == FailureMode::Strict {
                    return Err(err);
                }
                tracing::warn!(
                    frame = params.frame.0,
                    error = %err,
                    "renderer could not be run; continuing"
                );
            }
        }
    }

    encode_frames(&encode_cfg, scratch.path(), runner)?;
    tracing::info!(
        rendered = stats.frames_rendered,
        failed = stats.frames_failed,
        out = %opts.out_path.display(),
        "zoom sequence encoded"
    );

    Ok(stats)
}

/// Renderer invocation for one frame:
/// `<renderer> <x> <y> <threshold> <limit> <scale> <out_file>`.
fn render_command(
    opts: &ZoomOpts,
    renderer: &Path,
    params: &FrameParams,
    out_file: &Path,
) -> CommandSpec {
    CommandSpec::new(renderer)
        .arg(&opts.center_x)
        .arg(&opts.center_y)
        .arg(&opts.threshold)
        .arg(params.limit.to_string())
        .arg(params.scale.to_string())
        .arg(out_file)
}

fn resolve_invoking_path(path: &Path) -> ZoomResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    use anyhow::Context as _;
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
