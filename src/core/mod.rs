//! Core board types: grid, directions, RNG, configuration.
//!
//! These are the building blocks the rules operate on. Nothing here knows
//! how tiles move; see `rules` for that.

pub mod config;
pub mod direction;
pub mod grid;
pub mod rng;

pub use config::{EngineConfig, EngineConfigError};
pub use direction::{Direction, ParseDirectionError};
pub use grid::{can_merge, is_valid_tile, Grid, GridError, LineIndices, Tile, MAX_TILE};
pub use rng::GameRng;
