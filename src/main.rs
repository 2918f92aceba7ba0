use std::time::Duration;

use macroquad::prelude::*;
use toroidal_life::{
    EngineConfig, EngineHandle, FrameQueue, Host, PlaybackState, WindowSurface, all_rules,
    game_with_config, rule_by_name,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// Bootstrap arguments: game("game", 50, 50, 15, 20)
const CONTAINER_ID: &str = "game";
const GRID_WIDTH: u32 = 50;
const GRID_HEIGHT: u32 = 50;
const CELL_SIZE: u32 = 15;
const SPEED: u32 = 20;

fn window_conf() -> Conf {
    Conf {
        window_title: "Toroidal Life".to_owned(),
        window_width: (GRID_WIDTH * CELL_SIZE) as i32,
        window_height: (GRID_HEIGHT * CELL_SIZE) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// The window is the only container this binary knows about
struct WindowHost;

impl Host for WindowHost {
    type Surface = WindowSurface;
    type Scheduler = FrameQueue;

    fn resolve_container(&mut self, container_id: &str) -> Option<WindowSurface> {
        (container_id == CONTAINER_ID).then(WindowSurface::new)
    }

    fn frame_scheduler(&mut self) -> FrameQueue {
        FrameQueue::new()
    }

    fn now(&self) -> Duration {
        Duration::from_secs_f64(get_time())
    }
}

/// Rule from the first command line argument (a name or B/S notation),
/// Conway when absent
fn config_from_args() -> EngineConfig {
    let config = EngineConfig::default();
    let Some(arg) = std::env::args().nth(1) else {
        return config;
    };
    match rule_by_name(&arg) {
        Ok(rule) => config.with_rule(rule),
        Err(err) => {
            warn!(%err, "falling back to the default rule");
            config
        }
    }
}

/// Keyboard controls: Space pause/resume, S stop/start, Up/Down speed,
/// R next rule
fn process_keyboard_input(handle: &mut EngineHandle<WindowSurface, FrameQueue>, now: Duration) {
    if is_key_pressed(KeyCode::Space) {
        match handle.state() {
            PlaybackState::Running => handle.pause(),
            PlaybackState::Paused => handle.resume(now),
            PlaybackState::Stopped => {}
        }
    }

    if is_key_pressed(KeyCode::S) {
        if handle.state() == PlaybackState::Stopped {
            if let Err(err) = handle.start(now) {
                error!(%err, "restart failed");
            }
        } else {
            handle.stop();
        }
    }

    if is_key_pressed(KeyCode::R) {
        let rules = all_rules();
        let current = handle.grid().rule().name().to_owned();
        let next = rules
            .iter()
            .position(|rule| rule.name() == current)
            .map_or(0, |idx| (idx + 1) % rules.len());
        if let Some(rule) = rules.into_iter().nth(next) {
            handle.set_rule(rule);
        }
    }

    let speed = handle.ticks_per_second();
    if is_key_pressed(KeyCode::Up) {
        handle.set_speed(speed.saturating_add(1).min(60));
    } else if is_key_pressed(KeyCode::Down) {
        handle.set_speed(speed.saturating_sub(1).max(1));
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut host = WindowHost;
    let launched = game_with_config(
        &mut host,
        CONTAINER_ID,
        GRID_WIDTH,
        GRID_HEIGHT,
        CELL_SIZE,
        SPEED,
        config_from_args(),
    );
    let mut handle = match launched {
        Ok(handle) => handle,
        Err(err) => {
            error!(%err, "engine failed to start");
            return;
        }
    };

    loop {
        let now = host.now();
        process_keyboard_input(&mut handle, now);

        if let Err(err) = handle.advance(now) {
            error!(%err, generation = handle.generation(), "animation loop ended");
        }

        clear_background(BLACK);
        handle.surface_mut().present();

        if is_key_pressed(KeyCode::Escape) {
            info!(generation = handle.generation(), "exiting");
            break;
        }

        next_frame().await;
    }
}
