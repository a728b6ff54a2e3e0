#![forbid(unsafe_code)]

pub mod encode_ffmpeg;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod schedule;
pub mod scratch;

pub use encode_ffmpeg::{EncodeConfig, default_gif_config, is_ffmpeg_available};
pub use error::{ZoomError, ZoomResult};
pub use pipeline::{FailureMode, ZoomOpts, ZoomStats, render_zoom};
pub use runner::{CommandRunner, CommandSpec, RecordingRunner, RunOutcome, SystemRunner};
pub use schedule::{
    DEFAULT_FRAME_COUNT, FrameIndex, FrameParams, ZoomSchedule, limit_for, params_for, scale_for,
};
pub use scratch::{FRAME_PATTERN, ScratchDir};
