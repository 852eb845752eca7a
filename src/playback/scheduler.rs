/// Identifies one granted tick.
///
/// Ids are allocated monotonically by the scheduler. The session remembers
/// the id it expects next and discards anything else, so correctness never
/// depends on a host actually honoring [`FrameScheduler::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

/// Host-provided source of future frame ticks.
///
/// The session requests at most one pending tick at a time. The host must
/// deliver each granted tick back through `RevealSession::tick` together
/// with a monotonic timestamp in seconds.
pub trait FrameScheduler {
    /// Request a single future tick.
    fn schedule(&mut self) -> TickId;

    /// Best-effort cancellation of a previously granted tick.
    fn cancel(&mut self, id: TickId);
}

/// Deterministic scheduler for tests and offline drivers.
///
/// Holds at most one pending tick; the host pops it with
/// [`take`](Self::take) and feeds it back at a timestamp of its choosing.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<TickId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tick waiting to be delivered, if any.
    pub fn pending(&self) -> Option<TickId> {
        self.pending
    }

    /// Pop the pending tick for delivery.
    pub fn take(&mut self) -> Option<TickId> {
        self.pending.take()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> TickId {
        self.next += 1;
        let id = TickId(self.next);
        self.pending = Some(id);
        id
    }

    fn cancel(&mut self, id: TickId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}
