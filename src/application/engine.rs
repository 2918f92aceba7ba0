use std::collections::HashSet;
use std::time::Duration;

use tracing::info;

use super::config::EngineConfig;
use super::controller::{AnimationController, PlaybackState, Reseeder};
use super::scheduler::{FrameQueue, FrameScheduler};
use crate::domain::{GridState, Rule};
use crate::error::{EngineError, Result};
use crate::rendering::{PixelSurface, Renderer, Surface, surface_size};

/// The page/window side of the engine: turns container ids into surfaces,
/// provides a frame scheduler and tells the time.
pub trait Host {
    type Surface: Surface;
    type Scheduler: FrameScheduler;

    /// Resolve a container id to a drawing surface
    fn resolve_container(&mut self, container_id: &str) -> Option<Self::Surface>;

    /// A scheduler for one engine's animation loop
    fn frame_scheduler(&mut self) -> Self::Scheduler;

    /// Current host time on the clock later passed to `EngineHandle::advance`
    fn now(&self) -> Duration;
}

/// Host without a window; every known container id resolves to a fresh
/// `PixelSurface`. Its clock only moves through `set_now`.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    containers: HashSet<String>,
    now: Duration,
}

impl HeadlessHost {
    pub fn new<I, T>(container_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            containers: container_ids.into_iter().map(Into::into).collect(),
            now: Duration::ZERO,
        }
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = now;
    }
}

impl Host for HeadlessHost {
    type Surface = PixelSurface;
    type Scheduler = FrameQueue;

    fn resolve_container(&mut self, container_id: &str) -> Option<PixelSurface> {
        self.containers
            .contains(container_id)
            .then(|| PixelSurface::new(0, 0))
    }

    fn frame_scheduler(&mut self) -> FrameQueue {
        FrameQueue::new()
    }

    fn now(&self) -> Duration {
        self.now
    }
}

/// Caller-held control surface of a running engine.
///
/// Dropping the handle cancels the animation loop.
pub struct EngineHandle<S: Surface, F: FrameScheduler> {
    controller: AnimationController<S, F>,
}

impl<S: Surface, F: FrameScheduler> EngineHandle<S, F> {
    /// Build an engine on an already resolved surface and start it at host
    /// time `now`
    #[allow(clippy::too_many_arguments)]
    pub fn launch(
        surface: S,
        scheduler: F,
        now: Duration,
        width: u32,
        height: u32,
        cell_size: u32,
        ticks_per_second: u32,
        config: EngineConfig,
    ) -> Result<Self> {
        let EngineConfig { seed, rule, palette, parallel_threshold, .. } = config;

        let mut reseeder = Reseeder::new(seed);
        let grid = GridState::create(width, height, reseeder.seed(width, height)?)?
            .with_rule(rule)
            .with_parallel_threshold(parallel_threshold);
        let renderer = Renderer::new(surface, cell_size, palette, width, height)?;

        let mut controller =
            AnimationController::new(grid, renderer, scheduler, reseeder, ticks_per_second);
        controller.start(now)?;

        Ok(Self { controller })
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    /// Continue from the paused generation; the next frame is one
    /// interval after `now`
    pub fn resume(&mut self, now: Duration) {
        self.controller.resume(now);
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Restart after `stop()` from a freshly seeded grid
    pub fn start(&mut self, now: Duration) -> Result<()> {
        self.controller.start(now)
    }

    pub fn set_speed(&mut self, ticks_per_second: u32) {
        self.controller.set_speed(ticks_per_second);
    }

    pub fn set_rule(&mut self, rule: Box<dyn Rule>) {
        self.controller.set_rule(rule);
    }

    /// Pump the animation loop up to host time `now`.
    /// This is the error channel for runtime failures.
    pub fn advance(&mut self, now: Duration) -> Result<usize> {
        self.controller.advance(now)
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn generation(&self) -> u64 {
        self.controller.grid().generation()
    }

    pub fn grid(&self) -> &GridState {
        self.controller.grid()
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.controller.ticks_per_second()
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.controller.last_error()
    }

    pub fn take_error(&mut self) -> Option<EngineError> {
        self.controller.take_error()
    }

    pub fn surface(&self) -> &S {
        self.controller.renderer().surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.controller.renderer_mut().surface_mut()
    }

    pub fn controller(&self) -> &AnimationController<S, F> {
        &self.controller
    }
}

fn require_positive(name: &'static str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(EngineError::invalid_argument(name, "must be greater than zero"));
    }
    Ok(())
}

/// Entry point: `game(containerId, width, height, cellSize, speed)` with the
/// default configuration.
pub fn game<H: Host>(
    host: &mut H,
    container_id: &str,
    width: u32,
    height: u32,
    cell_size: u32,
    speed: u32,
) -> Result<EngineHandle<H::Surface, H::Scheduler>> {
    game_with_config(host, container_id, width, height, cell_size, speed, EngineConfig::default())
}

/// Entry point with explicit configuration.
///
/// Every failure here is synchronous and leaves nothing running.
pub fn game_with_config<H: Host>(
    host: &mut H,
    container_id: &str,
    width: u32,
    height: u32,
    cell_size: u32,
    speed: u32,
    config: EngineConfig,
) -> Result<EngineHandle<H::Surface, H::Scheduler>> {
    require_positive("width", width)?;
    require_positive("height", height)?;
    require_positive("cell_size", cell_size)?;
    require_positive("speed", speed)?;
    surface_size(width, height, cell_size)?;
    config.seed.validate()?;

    let surface = host
        .resolve_container(container_id)
        .ok_or_else(|| EngineError::ContainerNotFound(container_id.to_string()))?;
    let ticks_per_second = config.speed_unit.ticks_per_second(speed);

    let handle = EngineHandle::launch(
        surface,
        host.frame_scheduler(),
        host.now(),
        width,
        height,
        cell_size,
        ticks_per_second,
        config,
    )?;
    info!(container_id, width, height, cell_size, ticks_per_second, "engine launched");
    Ok(handle)
}
