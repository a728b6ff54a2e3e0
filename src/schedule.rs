use crate::error::{ZoomError, ZoomResult};

/// 1-based index of a frame in the zoom sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Parameters handed to the renderer for one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameParams {
    pub frame: FrameIndex,
    /// Zoom-depth multiplier, strictly decreasing with the frame index.
    pub scale: f64,
    /// Per-pixel escape-iteration bound, saturating as the zoom deepens.
    pub limit: f64,
}

/// Frame count of the stock 40-second zoom at 30 fps.
pub const DEFAULT_FRAME_COUNT: u32 = 1200;

const LIMIT_BASE: f64 = 500.0;
const LIMIT_GAIN: f64 = 1.00915;
const LIMIT_RATE: f64 = 0.002247;
const LIMIT_SPAN: f64 = 8000.0;

/// Zoom-depth multiplier for frame `i`: `1 / 1.1^(2·sqrt(10·i + 400))`.
///
/// Strictly decreasing and positive over the whole schedule domain.
pub fn scale_for(frame: FrameIndex) -> f64 {
    let i = f64::from(frame.0);
    1.0 / 1.1f64.powf(2.0 * (10.0 * i + 400.0).sqrt())
}

/// Iteration limit for frame `i`: `500 + 1.00915·tanh(0.002247·i)·8000`.
///
/// Grows with zoom depth so detail stays visible, saturating below
/// `500 + 1.00915·8000` as tanh flattens out.
pub fn limit_for(frame: FrameIndex) -> f64 {
    let i = f64::from(frame.0);
    LIMIT_BASE + LIMIT_GAIN * (LIMIT_RATE * i).tanh() * LIMIT_SPAN
}

/// Full renderer parameters for one frame.
pub fn params_for(frame: FrameIndex) -> FrameParams {
    FrameParams {
        frame,
        scale: scale_for(frame),
        limit: limit_for(frame),
    }
}

/// The per-frame schedule of a zoom run: frames `1..=frames` in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ZoomSchedule {
    pub frames: u32,
}

impl ZoomSchedule {
    pub fn new(frames: u32) -> ZoomResult<Self> {
        if frames == 0 {
            return Err(ZoomError::schedule("frame count must be >= 1"));
        }
        Ok(Self { frames })
    }

    pub fn len_frames(self) -> u32 {
        self.frames
    }

    /// Yields the schedule in increasing frame order.
    pub fn iter(self) -> impl Iterator<Item = FrameParams> {
        (1..=self.frames).map(|i| params_for(FrameIndex(i)))
    }
}

impl Default for ZoomSchedule {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAME_COUNT,
        }
    }
}
