//! Cooperative frame scheduling.
//!
//! The host owns the clock and pumps due frames; nothing here spawns threads
//! or timers, so a test can drive an engine frame by frame.

use std::time::Duration;

/// Identifies one scheduled frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// Start/cancel capability for one-shot frame callbacks.
pub trait FrameScheduler {
    /// Schedule a frame `delay` after host time `now`. A `now` older than
    /// the latest time the scheduler has seen counts as that latest time.
    fn schedule(&mut self, now: Duration, delay: Duration) -> FrameId;

    /// Drop a scheduled frame; unknown or already fired ids are ignored
    fn cancel(&mut self, id: FrameId);

    /// Move the clock to `now` and pop the earliest frame due by then
    fn next_due(&mut self, now: Duration) -> Option<FrameId>;
}

/// Deadline queue driven by a host-supplied monotonic clock.
#[derive(Debug, Default)]
pub struct FrameQueue {
    clock: Duration,
    next_id: u64,
    pending: Vec<(Duration, FrameId)>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest host time observed
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Deadline of a still pending frame
    pub fn deadline(&self, id: FrameId) -> Option<Duration> {
        self.pending
            .iter()
            .find(|(_, pending)| *pending == id)
            .map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn observe(&mut self, now: Duration) {
        self.clock = self.clock.max(now);
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self, now: Duration, delay: Duration) -> FrameId {
        self.observe(now);
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.pending.push((self.clock + delay, id));
        id
    }

    fn cancel(&mut self, id: FrameId) {
        self.pending.retain(|(_, pending)| *pending != id);
    }

    fn next_due(&mut self, now: Duration) -> Option<FrameId> {
        self.observe(now);
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= self.clock)
            .min_by_key(|(_, entry)| **entry)?;
        Some(self.pending.remove(pos).1)
    }
}
