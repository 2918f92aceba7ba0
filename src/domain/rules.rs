use std::fmt::Write as _;

use super::Cell;
use crate::error::{EngineError, Result};

/// Transition function applied to every cell on each tick.
pub trait Rule: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Birth/survival notation such as `B3/S23`
    fn notation(&self) -> String;

    /// Next state of a cell with `neighbors` live neighbors
    fn evolve(&self, current: Cell, neighbors: u8) -> Cell;
}

/// Outer-totalistic rule over the Moore neighborhood.
///
/// Bit `n` of `birth` means a dead cell with `n` live neighbors is born;
/// bit `n` of `survival` means a live cell with `n` live neighbors survives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeLikeRule {
    name: String,
    birth: u16,
    survival: u16,
}

const NAMED_RULES: [(&str, &str); 4] = [
    ("Conway", "B3/S23"),
    ("HighLife", "B36/S23"),
    ("Seeds", "B2/S"),
    ("Day&Night", "B3678/S34678"),
];

fn mask(counts: &[u8]) -> u16 {
    counts
        .iter()
        .filter(|&&n| n <= 8)
        .fold(0, |mask, &n| mask | 1 << n)
}

fn digits(mask: u16) -> String {
    (0..=8u8).filter(|&n| mask & (1 << n) != 0).fold(String::new(), |mut out, n| {
        let _ = write!(out, "{n}");
        out
    })
}

impl LifeLikeRule {
    pub fn new(name: impl Into<String>, birth: &[u8], survival: &[u8]) -> Self {
        Self {
            name: name.into(),
            birth: mask(birth),
            survival: mask(survival),
        }
    }

    /// B3/S23
    pub fn conway() -> Self {
        Self::new("Conway", &[3], &[2, 3])
    }

    /// B36/S23: Conway plus birth on six neighbors
    pub fn highlife() -> Self {
        Self::new("HighLife", &[3, 6], &[2, 3])
    }

    /// B2/S: no cell survives a tick
    pub fn seeds() -> Self {
        Self::new("Seeds", &[2], &[])
    }

    /// B3678/S34678
    pub fn day_and_night() -> Self {
        Self::new("Day&Night", &[3, 6, 7, 8], &[3, 4, 6, 7, 8])
    }

    /// Parse `B<digits>/S<digits>` (either order, case-insensitive).
    /// A missing half means the empty set.
    pub fn parse(notation: &str) -> Result<Self> {
        let invalid = |reason: String| EngineError::invalid_argument("rule", reason);

        let mut birth = None;
        let mut survival = None;
        for part in notation.trim().split('/') {
            let mut chars = part.chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survival,
                _ => return Err(invalid(format!("`{notation}` is not B/S notation"))),
            };
            if slot.is_some() {
                return Err(invalid(format!("`{notation}` repeats `{part}`")));
            }

            let mut counts = Vec::new();
            for c in chars {
                match c.to_digit(10) {
                    Some(n) if n <= 8 => counts.push(n as u8),
                    _ => {
                        return Err(invalid(format!("bad neighbor count `{c}` in `{notation}`")));
                    }
                }
            }
            *slot = Some(mask(&counts));
        }

        let mut rule = Self {
            name: String::new(),
            birth: birth.unwrap_or(0),
            survival: survival.unwrap_or(0),
        };
        rule.name = rule.notation();
        Ok(rule)
    }
}

impl Default for LifeLikeRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeLikeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn notation(&self) -> String {
        format!("B{}/S{}", digits(self.birth), digits(self.survival))
    }

    fn evolve(&self, current: Cell, neighbors: u8) -> Cell {
        let mask = match current {
            Cell::Alive => self.survival,
            Cell::Dead => self.birth,
        };
        Cell::from_alive(neighbors <= 8 && mask & (1 << neighbors) != 0)
    }
}

/// The named rules, Conway first
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(LifeLikeRule::conway()),
        Box::new(LifeLikeRule::highlife()),
        Box::new(LifeLikeRule::seeds()),
        Box::new(LifeLikeRule::day_and_night()),
    ]
}

/// Resolve a rule by name (ignoring ASCII case) or by B/S notation
pub fn rule_by_name(name: &str) -> Result<Box<dyn Rule>> {
    let name = name.trim();
    match NAMED_RULES.iter().find(|(known, _)| known.eq_ignore_ascii_case(name)) {
        Some((known, notation)) => {
            let mut rule = LifeLikeRule::parse(notation)?;
            rule.name = known.to_string();
            Ok(Box::new(rule))
        }
        None => Ok(Box::new(LifeLikeRule::parse(name)?)),
    }
}

pub fn default_rule() -> Box<dyn Rule> {
    Box::new(LifeLikeRule::conway())
}
