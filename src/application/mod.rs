mod config;
mod controller;
mod engine;
mod scheduler;

pub use config::{EngineConfig, SpeedUnit};
pub use controller::{
    AnimationController, MIN_FRAME_INTERVAL, PlaybackState, Reseeder, frame_interval,
};
pub use engine::{EngineHandle, HeadlessHost, Host, game, game_with_config};
pub use scheduler::{FrameId, FrameQueue, FrameScheduler};
