use crate::foundation::error::{RevelaError, RevelaResult};

/// One knot of a speed curve. `x` is elapsed fraction, `y` visual progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Piecewise-linear mapping from elapsed fraction to visual progress.
///
/// A valid curve spans `x = 0..=1` with at least two points sorted by `x`.
/// Adjacent points may share an `x`; evaluation treats that as a jump and
/// resolves to the later point's `y`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SpeedCurve {
    pub points: Vec<ControlPoint>, // sorted by x, first at 0, last at 1
}

impl SpeedCurve {
    pub fn new(points: Vec<ControlPoint>) -> RevelaResult<Self> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> RevelaResult<()> {
        if self.points.len() < 2 {
            return Err(RevelaError::validation(
                "SpeedCurve must have at least two control points",
            ));
        }
        for p in &self.points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(RevelaError::validation(
                    "SpeedCurve coordinates must be finite",
                ));
            }
            if !(0.0..=1.0).contains(&p.x) || !(0.0..=1.0).contains(&p.y) {
                return Err(RevelaError::validation(
                    "SpeedCurve coordinates must lie in [0, 1]",
                ));
            }
        }
        if self.points[0].x != 0.0 {
            return Err(RevelaError::validation(
                "SpeedCurve must start at x = 0",
            ));
        }
        if self.points[self.points.len() - 1].x != 1.0 {
            return Err(RevelaError::validation("SpeedCurve must end at x = 1"));
        }
        if !self.points.windows(2).all(|w| w[0].x <= w[1].x) {
            return Err(RevelaError::validation(
                "SpeedCurve control points must be sorted by x",
            ));
        }
        Ok(())
    }

    /// Map elapsed fraction `t` to visual progress.
    ///
    /// Out-of-range `t` clamps to the endpoint values; a NaN `t` resolves to
    /// the first point's value. The result is clamped to `[0, 1]`. An empty
    /// curve (rejected by [`validate`](Self::validate)) evaluates to `0.0`.
    pub fn eval(&self, t: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        let last = self.points[self.points.len() - 1];

        if t <= first.x {
            return first.y.clamp(0.0, 1.0);
        }
        if t >= last.x {
            return last.y.clamp(0.0, 1.0);
        }

        // First point strictly right of t; its left neighbor starts the
        // segment. A NaN t fails both range checks above and stops at idx 0.
        let idx = self.points.partition_point(|p| p.x <= t);
        if idx == 0 {
            return first.y.clamp(0.0, 1.0);
        }
        if idx >= self.points.len() {
            return last.y.clamp(0.0, 1.0);
        }

        let a = self.points[idx - 1];
        let b = self.points[idx];

        let span = b.x - a.x;
        if span <= 0.0 {
            return b.y.clamp(0.0, 1.0);
        }

        let local = (t - a.x) / span;
        (a.y + (b.y - a.y) * local).clamp(0.0, 1.0)
    }
}

impl Default for SpeedCurve {
    fn default() -> Self {
        CurvePreset::Tortoise.curve()
    }
}

/// Built-in reveal pacing curves.
///
/// Every preset opens at `y = 0.01`: a faint first hint instead of a fully
/// obscured frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CurvePreset {
    /// Steady reveal from start to finish.
    Linear,
    /// Withholds almost everything until the final quarter.
    Suspense,
    /// Slow burn: 20% clarity takes 80% of the time. The default.
    Tortoise,
    /// Front-loaded; most detail arrives early.
    Flash,
}

impl CurvePreset {
    pub fn curve(self) -> SpeedCurve {
        let points = match self {
            Self::Linear => vec![
                ControlPoint::new(0.0, 0.01),
                ControlPoint::new(0.25, 0.25),
                ControlPoint::new(0.5, 0.5),
                ControlPoint::new(0.75, 0.75),
                ControlPoint::new(1.0, 1.0),
            ],
            Self::Suspense => vec![
                ControlPoint::new(0.0, 0.01),
                ControlPoint::new(0.25, 0.02),
                ControlPoint::new(0.5, 0.04),
                ControlPoint::new(0.75, 0.12),
                ControlPoint::new(1.0, 1.0),
            ],
            Self::Tortoise => vec![
                ControlPoint::new(0.0, 0.01),
                ControlPoint::new(0.8, 0.2),
                ControlPoint::new(1.0, 1.0),
            ],
            Self::Flash => vec![
                ControlPoint::new(0.0, 0.01),
                ControlPoint::new(0.25, 0.5),
                ControlPoint::new(0.5, 0.8),
                ControlPoint::new(0.75, 0.95),
                ControlPoint::new(1.0, 1.0),
            ],
        };
        SpeedCurve { points }
    }
}
