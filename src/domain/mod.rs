mod cell;
mod grid;
mod rules;
mod patterns;

pub use cell::Cell;
pub use grid::{DEFAULT_PARALLEL_THRESHOLD, GridState};
pub use rules::{LifeLikeRule, Rule, all_rules, default_rule, rule_by_name};
pub use patterns::{Pattern, SeedPolicy, named_preset, presets, random_fill};
