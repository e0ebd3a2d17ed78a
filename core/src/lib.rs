#![no_std]

extern crate alloc;

use alloc::string::String;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use director::*;
pub use error::*;
pub use session::*;
pub use shape::*;
pub use types::*;

mod cell;
mod director;
mod error;
mod session;
mod shape;
mod types;

pub const GRID_SIZE_MIN: Coord = 6;
pub const GRID_SIZE_MAX: Coord = 10;
pub const TOTAL_ROUNDS_MIN: u8 = 1;
pub const TOTAL_ROUNDS_MAX: u8 = 20;
pub const TIME_LIMIT_MIN_MS: TimeMs = 100;
pub const TIME_LIMIT_MAX_MS: TimeMs = 10_000;

pub const DEFAULT_GRID_SIZE: Coord = 10;
pub const DEFAULT_TOTAL_ROUNDS: u8 = 10;
pub const DEFAULT_TIME_LIMIT_MS: TimeMs = 1_000;

/// Fixed delays for the round-intro and round-result auto-advances.
pub const ROUND_INTRO_DELAY_MS: TimeMs = 1_500;
pub const ROUND_RESULT_DELAY_MS: TimeMs = 1_500;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Far,
    Medium,
    Close,
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::Medium
    }
}

/// Reaction-time presets offered by the settings panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    /// Reaction budget the preset stands for. `Custom` starts from the
    /// default until the player dials in their own value.
    pub const fn time_limit_ms(self) -> TimeMs {
        match self {
            Self::Easy => 1_500,
            Self::Medium => DEFAULT_TIME_LIMIT_MS,
            Self::Hard => 600,
            Self::Custom => DEFAULT_TIME_LIMIT_MS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellColorKey {
    Default,
    Highlighted,
    Correct,
    Wrong,
}

/// Display colors per cell status, kept as CSS hex strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellColors {
    pub default: String,
    pub highlighted: String,
    pub correct: String,
    pub wrong: String,
}

impl CellColors {
    pub fn get(&self, key: CellColorKey) -> &str {
        match key {
            CellColorKey::Default => &self.default,
            CellColorKey::Highlighted => &self.highlighted,
            CellColorKey::Correct => &self.correct,
            CellColorKey::Wrong => &self.wrong,
        }
    }

    pub fn set(&mut self, key: CellColorKey, value: String) {
        match key {
            CellColorKey::Default => self.default = value,
            CellColorKey::Highlighted => self.highlighted = value,
            CellColorKey::Correct => self.correct = value,
            CellColorKey::Wrong => self.wrong = value,
        }
    }
}

impl Default for CellColors {
    fn default() -> Self {
        Self {
            default: String::from("#4a90d9"),
            highlighted: String::from("#ffd700"),
            correct: String::from("#4caf50"),
            wrong: String::from("#f44336"),
        }
    }
}

/// Player-tunable configuration. Values arriving from outside are clamped
/// into the supported bounds instead of being rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub grid_size: Coord,
    pub shape: ShapeKind,
    pub time_limit: TimeMs,
    pub total_rounds: u8,
    pub zoom: ZoomLevel,
    pub cell_colors: CellColors,
    pub player_name: String,
}

impl GameSettings {
    pub fn new(grid_size: Coord, shape: ShapeKind, time_limit: TimeMs, total_rounds: u8) -> Self {
        Self {
            grid_size,
            shape,
            time_limit,
            total_rounds,
            ..Self::default()
        }
        .clamped()
    }

    pub fn clamped(mut self) -> Self {
        self.grid_size = self.grid_size.clamp(GRID_SIZE_MIN, GRID_SIZE_MAX);
        self.time_limit = self.time_limit.clamp(TIME_LIMIT_MIN_MS, TIME_LIMIT_MAX_MS);
        self.total_rounds = self.total_rounds.clamp(TOTAL_ROUNDS_MIN, TOTAL_ROUNDS_MAX);
        self
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    /// Score that clinches the match before all rounds are played.
    pub const fn rounds_to_win(&self) -> u8 {
        self.total_rounds / 2 + 1
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            shape: ShapeKind::Square,
            time_limit: DEFAULT_TIME_LIMIT_MS,
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            zoom: ZoomLevel::default(),
            cell_colors: CellColors::default(),
            player_name: String::from("Player"),
        }
    }
}

/// Occupancy grid marking which cells of the board belong to the active
/// shape, plus the cached population count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeMask {
    mask: Array2<bool>,
    active_count: CellCount,
}

impl ShapeMask {
    pub(crate) fn new_unchecked(mask: Array2<bool>) -> Self {
        let active_count = mask
            .iter()
            .filter(|&&active| active)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self { mask, active_count }
    }

    pub fn from_mask(mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mask.dim();
        if rows != cols {
            return Err(GameError::InvalidMaskShape);
        }
        Ok(Self::new_unchecked(mask))
    }

    pub fn grid_size(&self) -> Coord {
        self.mask.dim().0 as Coord
    }

    pub fn total_cells(&self) -> CellCount {
        self.mask.len() as CellCount
    }

    pub fn active_cells(&self) -> CellCount {
        self.active_count
    }

    pub fn is_active(&self, id: CellId) -> bool {
        id < self.total_cells() && self[id]
    }

    /// Flat ids of the active cells, in row-major order.
    pub fn iter_active_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &active)| active)
            .map(|(id, _)| id as CellId)
    }
}

impl Index<CellId> for ShapeMask {
    type Output = bool;

    fn index(&self, id: CellId) -> &Self::Output {
        &self.mask[id_to_coords(id, self.grid_size()).to_nd_index()]
    }
}
