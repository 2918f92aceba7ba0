use rand::Rng;

use super::Cell;
use crate::error::{EngineError, Result};

/// A fixed pattern that can be stamped into a field
#[derive(Clone, Debug)]
pub struct Pattern {
    pub id: &'static str,
    pub description: &'static str,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<(usize, usize)>, // Relative (x, y) coordinates of alive cells
}

impl Pattern {
    /// Create a new pattern from alive cell coordinates
    pub fn new(id: &'static str, description: &'static str, cells: Vec<(usize, usize)>) -> Self {
        let width = cells.iter().map(|(x, _)| *x).max().unwrap_or(0) + 1;
        let height = cells.iter().map(|(_, y)| *y).max().unwrap_or(0) + 1;
        Self { id, description, width, height, cells }
    }

    /// Top-left offset that centers the pattern in a `width` x `height` field
    pub fn centered_origin(&self, width: u32, height: u32) -> (usize, usize) {
        (
            (width as usize).saturating_sub(self.width) / 2,
            (height as usize).saturating_sub(self.height) / 2,
        )
    }

    /// Render the pattern into a row-major field, centered.
    /// Cells that fall past an edge wrap around to the opposite side.
    pub fn stamp(&self, width: u32, height: u32) -> Vec<Cell> {
        let (w, h) = (width as usize, height as usize);
        let mut field = vec![Cell::Dead; w * h];
        if w == 0 || h == 0 {
            return field;
        }

        let (ox, oy) = self.centered_origin(width, height);
        for &(dx, dy) in &self.cells {
            let x = (ox + dx) % w;
            let y = (oy + dy) % h;
            field[y * w + x] = Cell::Alive;
        }
        field
    }
}

/// Fill a field where each cell is independently alive with `alive_probability`.
///
/// The result depends only on the supplied random stream, so a seeded RNG
/// reproduces the same field.
pub fn random_fill<R: Rng>(
    width: u32,
    height: u32,
    alive_probability: f64,
    rng: &mut R,
) -> Result<Vec<Cell>> {
    if !(0.0..=1.0).contains(&alive_probability) {
        return Err(EngineError::invalid_argument(
            "alive_probability",
            format!("must be within [0, 1], got {alive_probability}"),
        ));
    }

    let cells = (0..width as usize * height as usize)
        .map(|_| Cell::from_alive(rng.random::<f64>() < alive_probability))
        .collect();
    Ok(cells)
}

/// Look up a preset by id (case-insensitive) and center it in the field
pub fn named_preset(id: &str, width: u32, height: u32) -> Result<Vec<Cell>> {
    presets::find(id)
        .map(|pattern| pattern.stamp(width, height))
        .ok_or_else(|| EngineError::UnknownPreset(id.to_string()))
}

/// How the initial generation of an engine is produced
#[derive(Clone, Debug, PartialEq)]
pub enum SeedPolicy {
    /// Independent random fill; `seed: None` draws from OS entropy
    Random { alive_probability: f64, seed: Option<u64> },
    /// One of the named presets
    Preset(String),
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Random { alive_probability: 0.5, seed: None }
    }
}

impl SeedPolicy {
    /// Check the policy without generating anything
    pub fn validate(&self) -> Result<()> {
        match self {
            SeedPolicy::Random { alive_probability, .. } => {
                if (0.0..=1.0).contains(alive_probability) {
                    Ok(())
                } else {
                    Err(EngineError::invalid_argument(
                        "alive_probability",
                        format!("must be within [0, 1], got {alive_probability}"),
                    ))
                }
            }
            SeedPolicy::Preset(id) => presets::find(id)
                .map(|_| ())
                .ok_or_else(|| EngineError::UnknownPreset(id.clone())),
        }
    }

    /// Produce a field of `width * height` cells, drawing from `rng` when random
    pub fn generate<R: Rng>(&self, width: u32, height: u32, rng: &mut R) -> Result<Vec<Cell>> {
        match self {
            SeedPolicy::Random { alive_probability, .. } => {
                random_fill(width, height, *alive_probability, rng)
            }
            SeedPolicy::Preset(id) => named_preset(id, width, height),
        }
    }
}

/// Classic Game of Life patterns library
pub mod presets {
    use super::*;

    /// Glider - simplest spaceship, moves diagonally
    pub fn glider() -> Pattern {
        Pattern::new(
            "glider",
            "Moves diagonally (period 4)",
            vec![
                (1, 0),
                (2, 1),
                (0, 2), (1, 2), (2, 2),
            ]
        )
    }

    /// Blinker - period 2 oscillator
    pub fn blinker() -> Pattern {
        Pattern::new(
            "blinker",
            "Oscillator (period 2)",
            vec![
                (0, 1), (1, 1), (2, 1),
            ]
        )
    }

    /// Toad - period 2 oscillator
    pub fn toad() -> Pattern {
        Pattern::new(
            "toad",
            "Oscillator (period 2)",
            vec![
                (1, 0), (2, 0), (3, 0),
                (0, 1), (1, 1), (2, 1),
            ]
        )
    }

    /// Beacon - period 2 oscillator
    pub fn beacon() -> Pattern {
        Pattern::new(
            "beacon",
            "Oscillator (period 2)",
            vec![
                (0, 0), (1, 0),
                (0, 1),
                (3, 2),
                (2, 3), (3, 3),
            ]
        )
    }

    /// Pulsar - period 3 oscillator
    pub fn pulsar() -> Pattern {
        Pattern::new(
            "pulsar",
            "Oscillator (period 3)",
            vec![
                // Top
                (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
                // Upper middle
                (0, 2), (5, 2), (7, 2), (12, 2),
                (0, 3), (5, 3), (7, 3), (12, 3),
                (0, 4), (5, 4), (7, 4), (12, 4),
                // Center
                (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
                (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
                // Lower middle
                (0, 8), (5, 8), (7, 8), (12, 8),
                (0, 9), (5, 9), (7, 9), (12, 9),
                (0, 10), (5, 10), (7, 10), (12, 10),
                // Bottom
                (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
            ]
        )
    }

    /// Lightweight Spaceship (LWSS)
    pub fn lwss() -> Pattern {
        Pattern::new(
            "lwss",
            "Lightweight Spaceship (period 4)",
            vec![
                (1, 0), (4, 0),
                (0, 1),
                (0, 2), (4, 2),
                (0, 3), (1, 3), (2, 3), (3, 3),
            ]
        )
    }

    /// Gosper Glider Gun - produces gliders indefinitely
    pub fn glider_gun() -> Pattern {
        Pattern::new(
            "glider-gun",
            "Produces gliders (period 30)",
            vec![
                // Left square
                (0, 4), (0, 5),
                (1, 4), (1, 5),

                // Left circle
                (10, 4), (10, 5), (10, 6),
                (11, 3), (11, 7),
                (12, 2), (12, 8),
                (13, 2), (13, 8),
                (14, 5),
                (15, 3), (15, 7),
                (16, 4), (16, 5), (16, 6),
                (17, 5),

                // Middle pieces
                (20, 2), (20, 3), (20, 4),
                (21, 2), (21, 3), (21, 4),
                (22, 1), (22, 5),
                (24, 0), (24, 1), (24, 5), (24, 6),

                // Right square
                (34, 2), (34, 3),
                (35, 2), (35, 3),
            ]
        )
    }

    /// R-pentomino - classic methuselah (stabilizes after 1103 generations)
    pub fn r_pentomino() -> Pattern {
        Pattern::new(
            "r-pentomino",
            "Methuselah - stabilizes at gen 1103",
            vec![
                (1, 0), (2, 0),
                (0, 1), (1, 1),
                (1, 2),
            ]
        )
    }

    /// Acorn - small methuselah that stabilizes after 5206 generations
    pub fn acorn() -> Pattern {
        Pattern::new(
            "acorn",
            "Methuselah - stabilizes at gen 5206",
            vec![
                (1, 0),
                (3, 1),
                (0, 2), (1, 2), (4, 2), (5, 2), (6, 2),
            ]
        )
    }

    /// Block - simple still life
    pub fn block() -> Pattern {
        Pattern::new(
            "block",
            "Still life",
            vec![
                (0, 0), (1, 0),
                (0, 1), (1, 1),
            ]
        )
    }

    /// Get all available patterns
    pub fn all_patterns() -> Vec<Pattern> {
        vec![
            glider(),
            blinker(),
            toad(),
            beacon(),
            pulsar(),
            lwss(),
            glider_gun(),
            r_pentomino(),
            acorn(),
            block(),
        ]
    }

    /// Find a pattern by id, ignoring ASCII case
    pub fn find(id: &str) -> Option<Pattern> {
        all_patterns()
            .into_iter()
            .find(|pattern| pattern.id.eq_ignore_ascii_case(id))
    }
}
