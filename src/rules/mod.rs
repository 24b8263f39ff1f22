//! Board rules: how lines slide and how the engine applies them.
//!
//! - `line`: one line's compaction, merge, and padding
//! - `engine`: `BoardEngine`, which owns the grid and score and applies
//!   moves, spawns, resets, and terminal checks
//!
//! Presentation code calls into `BoardEngine` but never writes the grid
//! directly.

pub mod engine;
pub mod line;

pub use engine::{BoardEngine, GameStatus, Spawn};
pub use line::{slide_line, LineSlide, LineValues};
