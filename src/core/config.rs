//! Engine configuration.
//!
//! `EngineConfig` fixes everything about a board that does not change
//! during play: side length, the winning tile, and the chance that a
//! spawned tile is a 4 instead of a 2.
//!
//! Invalid values are programmer errors and panic in the builder methods,
//! the same way `Grid::new(0)` does.

use serde::{Deserialize, Serialize};

use super::grid::Tile;

/// Default side length.
pub const DEFAULT_SIZE: usize = 4;

/// Default winning tile.
pub const DEFAULT_WIN_TILE: Tile = 2048;

/// Default probability that a spawned tile is a 4.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Why a deserialized config was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineConfigError {
    #[error("size must be positive")]
    ZeroSize,
    #[error("win_tile {0} is not a power of two of at least 4")]
    InvalidWinTile(Tile),
    #[error("four_probability {0} is outside [0, 1]")]
    InvalidFourProbability(f64),
}

/// Immutable board parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the square grid.
    pub size: usize,

    /// Reaching this tile ends the game as a win.
    pub win_tile: Tile,

    /// Probability in `[0, 1]` that a spawned tile is a 4.
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            win_tile: DEFAULT_WIN_TILE,
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}

impl EngineConfig {
    /// Default configuration: 4x4, win at 2048, 10% fours.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the side length.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Board size must be positive");
        self.size = size;
        self
    }

    /// Set the winning tile.
    #[must_use]
    pub fn with_win_tile(mut self, win_tile: Tile) -> Self {
        assert!(
            win_tile >= 4 && win_tile.is_power_of_two(),
            "Win tile must be a power of two of at least 4"
        );
        self.win_tile = win_tile;
        self
    }

    /// Set the probability of spawning a 4.
    #[must_use]
    pub fn with_four_probability(mut self, probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "Four probability must be within [0, 1]"
        );
        self.four_probability = probability;
        self
    }

    /// Check a deserialized config, returning the first problem found.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.size == 0 {
            return Err(EngineConfigError::ZeroSize);
        }
        if self.win_tile < 4 || !self.win_tile.is_power_of_two() {
            return Err(EngineConfigError::InvalidWinTile(self.win_tile));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineConfigError::InvalidFourProbability(
                self.four_probability,
            ));
        }
        Ok(())
    }
}
