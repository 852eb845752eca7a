use crate::foundation::error::{RevelaError, RevelaResult};

/// Lifecycle of one reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayState {
    /// Fresh: nothing played yet, elapsed fraction 0.
    Idle,
    Playing,
    Paused,
    /// Elapsed fraction reached 1. Terminal until a reset.
    Completed,
}

impl PlayState {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Result of advancing the clock by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    /// Elapsed fraction after the tick, in `[0, 1]`.
    pub t: f64,
    /// True exactly once, on the tick that reaches `t = 1`.
    pub just_completed: bool,
}

/// Drives elapsed fraction `t` from host-supplied monotonic timestamps.
///
/// The clock never reads wall time. Every entry into `Playing` stores the
/// entry timestamp as the delta reference, so time spent paused contributes
/// nothing and a resume never skips ahead.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    duration_secs: f64,
    t: f64,
    state: PlayState,
    reference: f64, // monotonic seconds of the last counted instant
}

impl PlaybackClock {
    pub fn new(duration_secs: f64) -> RevelaResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(RevelaError::validation(
                "PlaybackClock duration_secs must be finite and > 0",
            ));
        }
        Ok(Self {
            duration_secs,
            t: 0.0,
            state: PlayState::Idle,
            reference: 0.0,
        })
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Change the reveal duration. Takes effect from the next advance on.
    pub fn set_duration(&mut self, duration_secs: f64) -> RevelaResult<()> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(RevelaError::validation(
                "PlaybackClock duration_secs must be finite and > 0",
            ));
        }
        self.duration_secs = duration_secs;
        Ok(())
    }

    /// Start or restart playback at monotonic time `now`.
    ///
    /// No-op when already playing. Rejected once the reveal is complete.
    pub fn play(&mut self, now: f64) -> RevelaResult<()> {
        if self.state == PlayState::Completed || self.t >= 1.0 {
            return Err(RevelaError::validation(
                "cannot play: the reveal is already complete",
            ));
        }
        if self.state == PlayState::Playing {
            return Ok(());
        }
        self.state = PlayState::Playing;
        self.reference = now;
        Ok(())
    }

    /// `Paused -> Playing`, resetting the delta reference to `now`.
    pub fn resume(&mut self, now: f64) -> RevelaResult<()> {
        if self.state != PlayState::Paused {
            return Err(RevelaError::validation(
                "cannot resume: the reveal is not paused",
            ));
        }
        self.state = PlayState::Playing;
        self.reference = now;
        Ok(())
    }

    /// `Playing -> Paused`; any other state is left unchanged.
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Force completion ("reveal now"). Returns true if this call completed
    /// the reveal, false if it already was complete.
    pub fn seek_end(&mut self) -> bool {
        let newly = self.state != PlayState::Completed;
        self.t = 1.0;
        self.state = PlayState::Completed;
        newly
    }

    /// Park at the start, paused. Used when the image cannot be played.
    pub fn park(&mut self) {
        self.t = 0.0;
        self.state = PlayState::Paused;
    }

    /// Back to `Idle` at `t = 0` (active image changed).
    pub fn reset(&mut self) {
        self.t = 0.0;
        self.state = PlayState::Idle;
    }

    /// Advance by the wall-clock delta since the last counted instant.
    ///
    /// Only meaningful while `Playing`; otherwise reports the current state
    /// without moving. Non-monotonic timestamps clamp to a zero delta.
    pub fn advance(&mut self, now: f64) -> Advance {
        if self.state != PlayState::Playing {
            return Advance {
                t: self.t,
                just_completed: false,
            };
        }

        let delta = (now - self.reference).max(0.0);
        self.reference = now;

        self.t = (self.t + delta / self.duration_secs).min(1.0);
        if self.t >= 1.0 {
            self.t = 1.0;
            self.state = PlayState::Completed;
            return Advance {
                t: 1.0,
                just_completed: true,
            };
        }
        Advance {
            t: self.t,
            just_completed: false,
        }
    }
}
