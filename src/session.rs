use crate::assets::PreparedImage;
use crate::foundation::error::{RevelaError, RevelaResult};
use crate::playback::clock::{PlayState, PlaybackClock};
use crate::playback::scheduler::{FrameScheduler, TickId};
use crate::render::Surface;
use crate::render::reveal::RevealRenderer;
use crate::settings::RevealSettings;

/// Identifies one decode request issued by [`RevealSession::begin_image`].
///
/// Decode completions present the token back to the session; results for any
/// token other than the most recent one are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodeToken(u64);

/// What a session operation changed, reported back to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Decoded pixels are installed; the first frame can be rendered.
    ImageReady,
    /// One playback step happened. `t` is the elapsed fraction, `visual` the
    /// curve-shaped, snapped progress the frame was rendered at.
    Progress { t: f64, visual: f64 },
    /// The reveal reached the end of its timeline.
    Completed,
    /// Decoding the current image failed; playback is parked at zero.
    DecodeFailed { reason: String },
}

enum ImageSlot {
    Empty,
    Decoding(DecodeToken),
    Ready(PreparedImage),
    Failed,
}

/// Drives one image through decode, playback, and per-frame rendering.
///
/// The session owns the clock and the renderer but no event loop. The host
/// supplies monotonic timestamps in seconds, runs decodes bracketed by
/// `begin_image` and `image_ready`/`image_failed`, delivers scheduled ticks
/// back through `tick`, and reacts to the returned [`SessionEvent`]s.
pub struct RevealSession<S: FrameScheduler> {
    settings: RevealSettings,
    clock: PlaybackClock,
    renderer: RevealRenderer,
    scheduler: S,
    slot: ImageSlot,
    decode_gen: u64,
    expected_tick: Option<TickId>,
}

impl<S: FrameScheduler> RevealSession<S> {
    pub fn new(settings: RevealSettings, scheduler: S) -> RevelaResult<Self> {
        settings.validate()?;
        let clock = PlaybackClock::new(settings.duration_secs)?;
        let renderer = RevealRenderer::new(&settings);
        Ok(Self {
            settings,
            clock,
            renderer,
            scheduler,
            slot: ImageSlot::Empty,
            decode_gen: 0,
            expected_tick: None,
        })
    }

    /// Start over with a new image: reset playback to idle and hand out the
    /// token the decode completion must present.
    ///
    /// Any in-flight tick and any older decode become stale immediately.
    pub fn begin_image(&mut self) -> DecodeToken {
        if let Some(id) = self.expected_tick.take() {
            self.scheduler.cancel(id);
        }
        self.decode_gen += 1;
        let token = DecodeToken(self.decode_gen);
        self.slot = ImageSlot::Decoding(token);
        self.clock.reset();
        token
    }

    /// Install decoded pixels for the decode identified by `token`.
    ///
    /// A stale token (anything but the latest) is discarded without effect.
    pub fn image_ready(&mut self, token: DecodeToken, image: PreparedImage) -> Vec<SessionEvent> {
        match self.slot {
            ImageSlot::Decoding(expected) if expected == token => {
                self.slot = ImageSlot::Ready(image);
                vec![SessionEvent::ImageReady]
            }
            _ => vec![],
        }
    }

    /// Record a decode failure for the decode identified by `token`.
    ///
    /// On the live token the session parks paused at zero progress so the
    /// host can surface the error and pick another image.
    pub fn image_failed(
        &mut self,
        token: DecodeToken,
        reason: impl Into<String>,
    ) -> Vec<SessionEvent> {
        match self.slot {
            ImageSlot::Decoding(expected) if expected == token => {
                self.slot = ImageSlot::Failed;
                self.clock.park();
                vec![SessionEvent::DecodeFailed {
                    reason: reason.into(),
                }]
            }
            _ => vec![],
        }
    }

    /// Begin playback from idle, or continue after a pause.
    ///
    /// `now` restarts the delta reference, so time spent outside Playing
    /// never counts toward the reveal. Calling while already playing is a
    /// no-op; calling after completion or without a decoded image errs.
    pub fn play(&mut self, now: f64) -> RevelaResult<()> {
        if !matches!(self.slot, ImageSlot::Ready(_)) {
            return Err(RevelaError::validation("play requires a decoded image"));
        }
        if self.clock.state().is_playing() {
            return Ok(());
        }
        self.clock.play(now)?;
        self.expected_tick = Some(self.scheduler.schedule());
        Ok(())
    }

    /// Continue a paused reveal. Unlike `play`, errs in any other state.
    pub fn resume(&mut self, now: f64) -> RevelaResult<()> {
        if !matches!(self.slot, ImageSlot::Ready(_)) {
            return Err(RevelaError::validation("resume requires a decoded image"));
        }
        self.clock.resume(now)?;
        self.expected_tick = Some(self.scheduler.schedule());
        Ok(())
    }

    /// Stop advancing. The pending tick is cancelled so a late delivery
    /// cannot move the clock.
    pub fn pause(&mut self) {
        self.clock.pause();
        if let Some(id) = self.expected_tick.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Jump straight to the end of the timeline.
    ///
    /// Completes the timeline from any state and renders the same frame a
    /// natural completion would: the curve's value at `t = 1`, snapped.
    /// `Completed` is emitted only on the transition into the completed
    /// state, never twice.
    pub fn seek_end(&mut self, surface: &mut dyn Surface) -> RevelaResult<Vec<SessionEvent>> {
        if let Some(id) = self.expected_tick.take() {
            self.scheduler.cancel(id);
        }
        let newly_completed = self.clock.seek_end();
        let visual = self.settings.visual_progress(1.0);
        if let ImageSlot::Ready(image) = &self.slot {
            self.renderer.render(image, visual, surface)?;
        }
        let mut events = vec![SessionEvent::Progress { t: 1.0, visual }];
        if newly_completed {
            events.push(SessionEvent::Completed);
        }
        Ok(events)
    }

    /// Deliver a scheduled tick.
    ///
    /// Only the single tick the session is waiting on has any effect;
    /// cancelled or superseded ticks return no events. A live tick advances
    /// the clock, renders the frame, and schedules a successor unless the
    /// reveal just completed.
    #[tracing::instrument(skip(self, surface))]
    pub fn tick(
        &mut self,
        id: TickId,
        now: f64,
        surface: &mut dyn Surface,
    ) -> RevelaResult<Vec<SessionEvent>> {
        if self.expected_tick != Some(id) {
            return Ok(vec![]);
        }
        self.expected_tick = None;

        let advance = self.clock.advance(now);
        let visual = self.settings.visual_progress(advance.t);
        if let ImageSlot::Ready(image) = &self.slot {
            self.renderer.render(image, visual, surface)?;
        }

        let mut events = vec![SessionEvent::Progress {
            t: advance.t,
            visual,
        }];
        if advance.just_completed {
            events.push(SessionEvent::Completed);
        }
        if self.clock.state().is_playing() {
            self.expected_tick = Some(self.scheduler.schedule());
        }
        Ok(events)
    }

    /// Render the current frame without advancing time. No-op until pixels
    /// are ready.
    pub fn render_now(&mut self, surface: &mut dyn Surface) -> RevelaResult<()> {
        let visual = self.settings.visual_progress(self.clock.t());
        if let ImageSlot::Ready(image) = &self.slot {
            self.renderer.render(image, visual, surface)?;
        }
        Ok(())
    }

    /// Change the reveal duration. Progress made so far keeps its fraction;
    /// only later ticks convert time at the new rate.
    pub fn set_duration(&mut self, duration_secs: f64) -> RevelaResult<()> {
        self.clock.set_duration(duration_secs)?;
        self.settings.duration_secs = duration_secs;
        Ok(())
    }

    pub fn state(&self) -> PlayState {
        self.clock.state()
    }

    /// Elapsed fraction of the timeline, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.clock.t()
    }

    /// Visual progress the next rendered frame would use.
    pub fn visual(&self) -> f64 {
        self.settings.visual_progress(self.clock.t())
    }

    pub fn is_image_ready(&self) -> bool {
        matches!(self.slot, ImageSlot::Ready(_))
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }

    /// Host-side access to the scheduler, e.g. to drain a
    /// [`ManualScheduler`](crate::playback::scheduler::ManualScheduler).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
