use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use super::scheduler::{FrameId, FrameScheduler};
use crate::domain::{Cell, GridState, Rule, SeedPolicy};
use crate::error::{EngineError, Result};
use crate::rendering::{Renderer, Surface};

/// Shortest gap between two frames
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Delay between frames at `ticks_per_second` (clamped to at least 1)
pub fn frame_interval(ticks_per_second: u32) -> Duration {
    (Duration::from_secs(1) / ticks_per_second.max(1)).max(MIN_FRAME_INTERVAL)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Produces fresh generations when the animation restarts
pub struct Reseeder {
    policy: SeedPolicy,
    rng: StdRng,
}

impl Reseeder {
    pub fn new(policy: SeedPolicy) -> Self {
        let rng = match &policy {
            SeedPolicy::Random { seed: Some(seed), .. } => StdRng::seed_from_u64(*seed),
            _ => StdRng::from_os_rng(),
        };
        Self { policy, rng }
    }

    pub fn policy(&self) -> &SeedPolicy {
        &self.policy
    }

    /// Next initial field for a `width` x `height` grid
    pub fn seed(&mut self, width: u32, height: u32) -> Result<Vec<Cell>> {
        self.policy.generate(width, height, &mut self.rng)
    }
}

/// AnimationController owns the grid and renderer and drives the
/// tick/render loop through an injected frame scheduler.
///
/// Only one frame body runs at a time and the next frame is scheduled
/// after the current one has rendered, so generation N is always on screen
/// before generation N+1 is computed.
pub struct AnimationController<S: Surface, F: FrameScheduler> {
    grid: GridState,
    renderer: Renderer<S>,
    scheduler: F,
    reseeder: Reseeder,
    state: PlaybackState,
    ticks_per_second: u32,
    pending: Option<FrameId>,
    last_frame_time: Option<Duration>,
    reseed_on_start: bool,
    last_error: Option<EngineError>,
}

impl<S: Surface, F: FrameScheduler> AnimationController<S, F> {
    pub fn new(
        grid: GridState,
        renderer: Renderer<S>,
        scheduler: F,
        reseeder: Reseeder,
        ticks_per_second: u32,
    ) -> Self {
        Self {
            grid,
            renderer,
            scheduler,
            reseeder,
            state: PlaybackState::Stopped,
            ticks_per_second: ticks_per_second.max(1),
            pending: None,
            last_frame_time: None,
            reseed_on_start: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Frame currently waiting to fire, if any
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    /// Host time of the last frame that ran
    pub fn last_frame_time(&self) -> Option<Duration> {
        self.last_frame_time
    }

    /// Most recent runtime error, kept until taken
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<EngineError> {
        self.last_error.take()
    }

    fn interval(&self) -> Duration {
        frame_interval(self.ticks_per_second)
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    fn halt(&mut self, err: EngineError) -> EngineError {
        warn!(%err, generation = self.grid.generation(), "animation stopped");
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
        self.reseed_on_start = true;
        self.last_error = Some(err.clone());
        err
    }

    /// Stopped -> Running.
    ///
    /// Paints the current generation right away and schedules the first
    /// tick one interval after host time `now`. After a `stop()` the grid is
    /// reseeded from the configured policy before painting.
    pub fn start(&mut self, now: Duration) -> Result<()> {
        if self.state != PlaybackState::Stopped {
            warn!(state = ?self.state, "start ignored");
            return Ok(());
        }

        if self.reseed_on_start {
            let cells = self.reseeder.seed(self.grid.width(), self.grid.height())?;
            self.grid.reseed(cells)?;
            self.reseed_on_start = false;
            debug!("grid reseeded");
        }

        if let Err(err) = self.renderer.render(&self.grid) {
            return Err(self.halt(err));
        }

        self.state = PlaybackState::Running;
        self.pending = Some(self.scheduler.schedule(now, self.interval()));
        info!(ticks_per_second = self.ticks_per_second, "animation started");
        Ok(())
    }

    /// Running -> Paused; the scheduled frame is cancelled
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Running {
            debug!(state = ?self.state, "pause ignored");
            return;
        }
        self.cancel_pending();
        self.state = PlaybackState::Paused;
        info!(generation = self.grid.generation(), "animation paused");
    }

    /// Paused -> Running; the next frame fires one interval after `now`
    pub fn resume(&mut self, now: Duration) {
        if self.state != PlaybackState::Paused {
            debug!(state = ?self.state, "resume ignored");
            return;
        }
        self.state = PlaybackState::Running;
        self.pending = Some(self.scheduler.schedule(now, self.interval()));
        info!(generation = self.grid.generation(), "animation resumed");
    }

    /// Any state -> Stopped; a later `start()` begins from a fresh seed
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.state != PlaybackState::Stopped {
            info!(generation = self.grid.generation(), "animation stopped");
        }
        self.state = PlaybackState::Stopped;
        self.reseed_on_start = true;
    }

    /// Change the tick rate; a frame that is already scheduled keeps its deadline
    pub fn set_speed(&mut self, ticks_per_second: u32) {
        self.ticks_per_second = ticks_per_second.max(1);
        debug!(ticks_per_second = self.ticks_per_second, "speed changed");
    }

    /// Swap the transition rule; applies from the next tick on
    pub fn set_rule(&mut self, rule: Box<dyn Rule>) {
        info!(rule = rule.name(), notation = %rule.notation(), "rule changed");
        self.grid.set_rule(rule);
    }

    /// Run every frame due by `now`. Returns how many frames ran.
    ///
    /// A render failure stops the animation; the error is returned here and
    /// also kept for `last_error`.
    pub fn advance(&mut self, now: Duration) -> Result<usize> {
        let mut frames = 0;
        while let Some(id) = self.scheduler.next_due(now) {
            if self.run_frame(id, now)? {
                frames += 1;
            }
        }
        Ok(frames)
    }

    /// Body of one frame: tick, render, schedule the next one.
    /// Returns false when `id` is not the frame this controller is waiting on.
    pub fn run_frame(&mut self, id: FrameId, now: Duration) -> Result<bool> {
        if self.state != PlaybackState::Running || self.pending != Some(id) {
            debug!(?id, "skipping stale frame");
            return Ok(false);
        }
        self.pending = None;

        self.grid.tick();
        if let Err(err) = self.renderer.render(&self.grid) {
            return Err(self.halt(err));
        }
        self.last_frame_time = Some(now);
        debug!(generation = self.grid.generation(), population = self.grid.population(), "frame");

        self.pending = Some(self.scheduler.schedule(now, self.interval()));
        Ok(true)
    }
}

impl<S: Surface, F: FrameScheduler> Drop for AnimationController<S, F> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scheduler::FrameQueue;
    use crate::domain::LifeLikeRule;
    use crate::rendering::{Palette, PixelSurface};

    const MS: Duration = Duration::from_millis(1);

    type TestController = AnimationController<PixelSurface, FrameQueue>;

    fn blinker_controller(ticks_per_second: u32) -> TestController {
        let policy = SeedPolicy::Preset("blinker".into());
        let mut reseeder = Reseeder::new(policy);
        let grid = GridState::create(5, 5, reseeder.seed(5, 5).unwrap()).unwrap();
        let renderer = Renderer::new(PixelSurface::new(1, 1), 2, Palette::default(), 5, 5).unwrap();
        AnimationController::new(grid, renderer, FrameQueue::new(), reseeder, ticks_per_second)
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(20), 50 * MS);
        assert_eq!(frame_interval(1), Duration::from_secs(1));
        assert_eq!(frame_interval(0), Duration::from_secs(1));
        assert_eq!(frame_interval(1_000_000), MIN_FRAME_INTERVAL);
    }

    #[test]
    fn test_starts_stopped() {
        let controller = blinker_controller(20);
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.pending_frame(), None);
    }

    #[test]
    fn test_start_renders_and_schedules() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();

        assert_eq!(controller.state(), PlaybackState::Running);
        let pending = controller.pending_frame().unwrap();
        assert_eq!(controller.scheduler().deadline(pending), Some(50 * MS));
        // Seed generation already painted: blinker center cell (row 2, col 2)
        let palette = *controller.renderer().palette();
        assert_eq!(controller.renderer().surface().pixel(5, 5), Some(palette.alive));
    }

    #[test]
    fn test_frames_tick_in_order() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();

        assert_eq!(controller.advance(49 * MS).unwrap(), 0);
        assert_eq!(controller.advance(50 * MS).unwrap(), 1);
        assert_eq!(controller.grid().generation(), 1);
        assert_eq!(controller.last_frame_time(), Some(50 * MS));

        assert_eq!(controller.advance(100 * MS).unwrap(), 1);
        assert_eq!(controller.grid().generation(), 2);
    }

    #[test]
    fn test_one_frame_per_pump() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        // Host stalled for a second: still only one generation
        assert_eq!(controller.advance(Duration::from_secs(1)).unwrap(), 1);
        assert_eq!(controller.grid().generation(), 1);
    }

    #[test]
    fn test_pause_cancels_scheduled_frame() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        let cancelled = controller.pending_frame().unwrap();

        controller.pause();
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert!(controller.scheduler().is_empty());
        assert_eq!(controller.advance(500 * MS).unwrap(), 0);
        assert_eq!(controller.grid().generation(), 0);

        // Firing the stale id by hand must not run the body
        assert!(!controller.run_frame(cancelled, 500 * MS).unwrap());
        assert_eq!(controller.grid().generation(), 0);
    }

    #[test]
    fn test_resume_continues_from_paused_generation() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        controller.advance(50 * MS).unwrap();
        controller.pause();

        controller.resume(50 * MS);
        assert_eq!(controller.state(), PlaybackState::Running);
        assert_eq!(controller.advance(99 * MS).unwrap(), 0);
        assert_eq!(controller.advance(100 * MS).unwrap(), 1);
        assert_eq!(controller.grid().generation(), 2);
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut controller = blinker_controller(20);
        controller.resume(Duration::ZERO);
        assert_eq!(controller.state(), PlaybackState::Stopped);
        controller.pause();
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_resume_after_idle_gap_waits_full_interval() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        assert_eq!(controller.advance(100 * MS).unwrap(), 1);
        controller.pause();

        // Host went quiet while paused; nothing pumped until well after resume
        let resumed_at = Duration::from_secs(10);
        controller.resume(resumed_at);
        let pending = controller.pending_frame().unwrap();
        assert_eq!(controller.scheduler().deadline(pending), Some(resumed_at + 50 * MS));

        assert_eq!(controller.advance(resumed_at).unwrap(), 0);
        assert_eq!(controller.advance(resumed_at + 49 * MS).unwrap(), 0);
        assert_eq!(controller.advance(resumed_at + 50 * MS).unwrap(), 1);
        assert_eq!(controller.grid().generation(), 2);
    }

    #[test]
    fn test_restart_after_idle_gap_waits_full_interval() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        controller.stop();

        let restarted_at = Duration::from_secs(20);
        controller.start(restarted_at).unwrap();
        assert_eq!(controller.advance(restarted_at + 10 * MS).unwrap(), 0);
        assert_eq!(controller.grid().generation(), 0);
        assert_eq!(controller.advance(restarted_at + 50 * MS).unwrap(), 1);
    }

    #[test]
    fn test_set_rule_applies_from_next_tick() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        controller.set_rule(Box::new(LifeLikeRule::seeds()));
        assert_eq!(controller.grid().rule().name(), "Seeds");

        // Conway keeps the blinker's center alive; Seeds kills every live cell
        controller.advance(50 * MS).unwrap();
        assert_eq!(controller.grid().generation(), 1);
        assert_eq!(controller.grid().get(2, 2), Cell::Dead);
    }

    #[test]
    fn test_set_speed_affects_only_later_frames() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        let scheduled = controller.pending_frame().unwrap();

        controller.set_speed(1);
        assert_eq!(controller.ticks_per_second(), 1);
        assert_eq!(controller.scheduler().deadline(scheduled), Some(50 * MS));

        assert_eq!(controller.advance(50 * MS).unwrap(), 1);
        let next = controller.pending_frame().unwrap();
        assert_eq!(controller.scheduler().deadline(next), Some(1_050 * MS));
    }

    #[test]
    fn test_set_speed_clamps_to_one() {
        let mut controller = blinker_controller(20);
        controller.set_speed(0);
        assert_eq!(controller.ticks_per_second(), 1);
    }

    #[test]
    fn test_stop_then_start_reseeds() {
        let mut controller = blinker_controller(20);
        let seed = controller.grid().snapshot().to_vec();
        controller.start(Duration::ZERO).unwrap();
        controller.advance(50 * MS).unwrap();
        assert_ne!(controller.grid().snapshot(), seed.as_slice());

        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(controller.scheduler().is_empty());

        controller.start(Duration::ZERO).unwrap();
        assert_eq!(controller.grid().generation(), 0);
        assert_eq!(controller.grid().snapshot(), seed.as_slice());
    }

    #[test]
    fn test_stop_then_start_draws_new_random_field() {
        let policy = SeedPolicy::Random { alive_probability: 0.5, seed: Some(9) };
        let mut reseeder = Reseeder::new(policy);
        let first = reseeder.seed(16, 16).unwrap();
        let grid = GridState::create(16, 16, first.clone()).unwrap();
        let renderer =
            Renderer::new(PixelSurface::new(1, 1), 1, Palette::default(), 16, 16).unwrap();
        let mut controller =
            AnimationController::new(grid, renderer, FrameQueue::new(), reseeder, 10);

        controller.start(Duration::ZERO).unwrap();
        controller.stop();
        controller.start(Duration::ZERO).unwrap();
        assert_eq!(controller.grid().generation(), 0);
        assert_ne!(controller.grid().snapshot(), first.as_slice());
    }

    #[test]
    fn test_lost_surface_stops_loop() {
        let mut controller = blinker_controller(20);
        controller.start(Duration::ZERO).unwrap();
        controller.renderer_mut().surface_mut().invalidate();

        assert_eq!(controller.advance(50 * MS), Err(EngineError::SurfaceUnavailable));
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.pending_frame(), None);
        assert_eq!(controller.last_error(), Some(&EngineError::SurfaceUnavailable));
        assert_eq!(controller.take_error(), Some(EngineError::SurfaceUnavailable));
        assert_eq!(controller.last_error(), None);

        // Not retried
        assert_eq!(controller.advance(Duration::from_secs(5)).unwrap(), 0);
    }

    #[test]
    fn test_start_fails_on_lost_surface() {
        let mut controller = blinker_controller(20);
        controller.renderer_mut().surface_mut().invalidate();
        assert_eq!(controller.start(Duration::ZERO), Err(EngineError::SurfaceUnavailable));
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(controller.scheduler().is_empty());
    }
}
