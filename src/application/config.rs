use crate::domain::{DEFAULT_PARALLEL_THRESHOLD, Rule, SeedPolicy, default_rule};
use crate::rendering::Palette;

/// How the `speed` argument of `game()` is read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    /// Generations per second (`game(.., 20)` runs 20 ticks a second)
    #[default]
    TicksPerSecond,
    /// Milliseconds between generations
    MillisPerTick,
}

impl SpeedUnit {
    /// Convert a raw speed argument into ticks per second, never below 1
    pub fn ticks_per_second(self, speed: u32) -> u32 {
        match self {
            SpeedUnit::TicksPerSecond => speed.max(1),
            SpeedUnit::MillisPerTick => (1_000 / speed.max(1)).max(1),
        }
    }
}

/// Engine settings that are not part of the `game()` call itself
pub struct EngineConfig {
    pub seed: SeedPolicy,
    pub speed_unit: SpeedUnit,
    pub rule: Box<dyn Rule>,
    pub palette: Palette,
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: SeedPolicy::default(),
            speed_unit: SpeedUnit::default(),
            rule: default_rule(),
            palette: Palette::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_speed_unit(mut self, unit: SpeedUnit) -> Self {
        self.speed_unit = unit;
        self
    }

    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}
