// cell.rs - A single grid cell: life state, age and color

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 24-bit pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel drawn independently and uniformly from 0..=255.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.random::<u8>(),
            g: rng.random::<u8>(),
            b: rng.random::<u8>(),
        }
    }
}

/// One grid cell.
///
/// A live cell owns its color for as long as it survives; a dead cell has
/// neither color nor age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    Live { color: Rgb, age: u32 },
    #[default]
    Dead,
}

impl Cell {
    /// Newborn cell with a random color.
    pub fn live<R: Rng>(rng: &mut R) -> Self {
        Self::with_color(Rgb::random(rng))
    }

    /// Newborn cell with a caller-chosen color.
    pub const fn with_color(color: Rgb) -> Self {
        Cell::Live { color, age: 0 }
    }

    pub const fn is_live(&self) -> bool {
        matches!(self, Cell::Live { .. })
    }

    pub const fn is_dead(&self) -> bool {
        matches!(self, Cell::Dead)
    }

    /// Consecutive ticks survived; always 0 for a dead cell.
    pub const fn age(&self) -> u32 {
        match self {
            Cell::Live { age, .. } => *age,
            Cell::Dead => 0,
        }
    }

    /// Dead cells report black, the "off" pixel.
    pub const fn color(&self) -> Rgb {
        match self {
            Cell::Live { color, .. } => *color,
            Cell::Dead => Rgb::BLACK,
        }
    }

    /// Marks one more tick survived. Does nothing on a dead cell.
    pub fn advance_age(&mut self) {
        if let Cell::Live { age, .. } = self {
            *age = age.saturating_add(1);
        }
    }
}
