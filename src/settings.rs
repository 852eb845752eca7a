use crate::{
    curve::SpeedCurve,
    foundation::error::{RevelaError, RevelaResult},
};

/// How the image is progressively revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealMode {
    /// Coarse mosaic sharpening toward full resolution.
    Pixelate,
    /// Magnified about the image center, zooming out to full view.
    CenterZoom,
}

/// Default for [`RevealTuning::snap_threshold`].
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.88;
/// Default for [`RevealTuning::max_zoom`].
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;

/// Tunable constants of the reveal mapping.
///
/// Both fields have sensible defaults; hosts rarely need to touch them.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RevealTuning {
    /// Raw visual progress above this snaps to exactly 1.0, so a reveal
    /// never lingers almost-sharp. Valid range `(0, 1]`.
    pub snap_threshold: f64,
    /// CenterZoom magnification at visual progress 0. Must be `>= 1`.
    pub max_zoom: f64,
}

impl Default for RevealTuning {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl RevealTuning {
    pub fn validate(&self) -> RevelaResult<()> {
        if !self.snap_threshold.is_finite()
            || self.snap_threshold <= 0.0
            || self.snap_threshold > 1.0
        {
            return Err(RevelaError::validation(
                "RevealTuning snap_threshold must lie in (0, 1]",
            ));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < 1.0 {
            return Err(RevelaError::validation(
                "RevealTuning max_zoom must be >= 1",
            ));
        }
        Ok(())
    }

    /// Apply the snap rule: strictly above the threshold becomes exactly 1.
    pub fn snap(&self, visual: f64) -> f64 {
        if visual > self.snap_threshold {
            1.0
        } else {
            visual
        }
    }
}

/// Everything that shapes one reveal: duration, mode, filtering, pacing.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RevealSettings {
    pub duration_secs: f64, // total reveal duration, seconds
    pub mode: RevealMode,
    /// Bilinear instead of nearest-neighbor for the pixelation stages.
    /// CenterZoom and fully revealed frames always filter bilinearly.
    pub smoothing: bool,
    pub curve: SpeedCurve,
    #[serde(default)]
    pub tuning: RevealTuning,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            mode: RevealMode::Pixelate,
            smoothing: false,
            curve: SpeedCurve::default(),
            tuning: RevealTuning::default(),
        }
    }
}

impl RevealSettings {
    pub fn validate(&self) -> RevelaResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(RevelaError::validation(
                "RevealSettings duration_secs must be finite and > 0",
            ));
        }
        self.curve.validate()?;
        self.tuning.validate()
    }

    /// Map normalized time to the visual progress a frame should render at:
    /// curve evaluation followed by the end-of-reveal snap.
    pub fn visual_progress(&self, t: f64) -> f64 {
        self.tuning.snap(self.curve.eval(t))
    }
}
