// Domain layer - Automaton state and rules
pub mod domain;

// Application layer - Animation loop and engine entry point
pub mod application;

// Infrastructure layer - Drawing surfaces
pub mod rendering;

pub mod error;

// Re-exports for convenience
pub use domain::{
    Cell, GridState, LifeLikeRule, Pattern, Rule, SeedPolicy, all_rules, named_preset, presets,
    random_fill, rule_by_name,
};
pub use application::{
    AnimationController, EngineConfig, EngineHandle, FrameQueue, FrameScheduler, HeadlessHost,
    Host, PlaybackState, SpeedUnit, game, game_with_config,
};
pub use rendering::{Palette, PixelSurface, Renderer, Surface, WindowSurface};
pub use error::{EngineError, Result};
