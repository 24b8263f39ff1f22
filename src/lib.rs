//! # rust-2048
//!
//! The sliding-tile puzzle: shift every tile on a square grid in one
//! direction, merge equal neighbours, reach the winning tile before the
//! board locks up.
//!
//! ## Design Principles
//!
//! 1. **Engine owns the board**: `BoardEngine` is the only thing that
//!    writes the grid or score. Everything else reads through accessors.
//!
//! 2. **No globals**: engines are plain values; randomness is injected as
//!    any `rand::Rng`, so seeded games replay exactly.
//!
//! 3. **Collaborators behind traits**: drawing (`Renderer`), input
//!    (`InputSource`), and best-score storage (`ScoreStore`) are traits the
//!    `GameSession` is generic over.
//!
//! ## Modules
//!
//! - `core`: grid, directions, RNG, engine configuration
//! - `rules`: line slide and the board engine
//! - `session`: the move protocol, best score, and end-of-game policy
//! - `render`: tile labels and the text renderer
//! - `input`: commands, key and swipe mapping, scripted input
//! - `store`: best-score persistence
//! - `config`: application settings from TOML and the environment
//! - `terminal`: crossterm input and raw-mode handling (feature `cli`)
//!
//! ## Example
//!
//! ```
//! use rust_2048::{BoardEngine, Direction, EngineConfig};
//!
//! let mut engine = BoardEngine::seeded(EngineConfig::default(), 2048);
//! for direction in Direction::ALL {
//!     if engine.apply_move(direction) {
//!         engine.spawn_random_tile();
//!     }
//! }
//! assert!(engine.grid().non_empty_count() >= 2);
//! ```

pub mod config;
pub mod core;
pub mod input;
pub mod render;
pub mod rules;
pub mod session;
pub mod store;

#[cfg(feature = "cli")]
pub mod terminal;

// Re-export commonly used types
pub use crate::core::{Direction, EngineConfig, GameRng, Grid, GridError, Tile};

pub use crate::rules::{slide_line, BoardEngine, GameStatus, LineSlide, Spawn};

pub use crate::session::{GameSession, SessionError, SessionSummary, TurnOutcome};

pub use crate::render::{tile_class, tile_label, BoardView, Renderer, TextRenderer};

pub use crate::input::{Command, InputSource, Key, ScriptedInput};

pub use crate::store::{JsonFileStore, MemoryStore, ScoreStore, StoreError, BEST_SCORE_KEY};

pub use crate::config::{AppConfig, ConfigError};
