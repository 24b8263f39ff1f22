//! The board engine: owns the grid and score, applies moves.
//!
//! `BoardEngine` is a plain value. Create as many as needed; nothing is
//! global. Randomness comes from the injected generator, so two engines
//! built with the same seed and fed the same moves stay identical.
//!
//! ## Move protocol
//!
//! `apply_move` only slides and merges. When it reports `true` the caller
//! must follow up with `spawn_random_tile` and a terminal check; when it
//! reports `false` nothing changed and nothing should spawn. `GameSession`
//! implements this protocol; tests and tools may drive it by hand.

use log::{debug, info, trace};
use rand::Rng;

use super::line::{slide_line, LineValues};
use crate::core::{Direction, EngineConfig, GameRng, Grid, Tile};

/// Where a game stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves remain and the winning tile is absent.
    InProgress,
    /// The winning tile is on the board.
    Won,
    /// The board is full and no adjacent tiles match.
    Lost,
}

impl GameStatus {
    /// True for `Won` and `Lost`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// A tile placed by `spawn_random_tile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Row-major cell index.
    pub index: usize,
    /// 2 or 4.
    pub value: Tile,
}

/// Grid, score, and the rules that change them.
#[derive(Clone, Debug)]
pub struct BoardEngine<R = GameRng> {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    rng: R,
}

impl BoardEngine<GameRng> {
    /// Start a game with a `GameRng` seeded from `seed`.
    ///
    /// ```
    /// use rust_2048::core::EngineConfig;
    /// use rust_2048::rules::BoardEngine;
    ///
    /// let engine = BoardEngine::seeded(EngineConfig::default(), 42);
    /// assert_eq!(engine.score(), 0);
    /// assert_eq!(engine.grid().non_empty_count(), 2);
    /// ```
    #[must_use]
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, GameRng::new(seed))
    }
}

impl<R: Rng> BoardEngine<R> {
    /// Start a game: empty grid, score 0, two spawned tiles.
    ///
    /// # Panics
    ///
    /// Panics if the config is invalid (zero size, bad win tile or
    /// probability).
    #[must_use]
    pub fn new(config: EngineConfig, rng: R) -> Self {
        if let Err(problem) = config.validate() {
            panic!("Invalid engine config: {problem}");
        }
        let mut engine = Self {
            grid: Grid::new(config.size),
            config,
            score: 0,
            rng,
        };
        engine.spawn_opening_tiles();
        engine
    }

    /// Resume from an explicit grid and score without spawning anything.
    ///
    /// # Panics
    ///
    /// Panics if the config is invalid or the grid size differs from it.
    #[must_use]
    pub fn from_grid(config: EngineConfig, grid: Grid, score: u64, rng: R) -> Self {
        if let Err(problem) = config.validate() {
            panic!("Invalid engine config: {problem}");
        }
        assert_eq!(
            grid.size(),
            config.size,
            "Grid size must match configured size"
        );
        Self {
            config,
            grid,
            score,
            rng,
        }
    }

    /// Current grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Put a 2 (or, with `four_probability`, a 4) on a uniformly chosen
    /// empty cell. Does nothing on a full grid.
    pub fn spawn_random_tile(&mut self) -> Option<Spawn> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let index = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(self.config.four_probability) {
            4
        } else {
            2
        };
        self.grid.set(index, value);
        debug!("spawned {value} at cell {index}");
        Some(Spawn { index, value })
    }

    /// Slide every line toward `direction`, merging equal neighbours once.
    ///
    /// Returns whether any cell changed. Score grows by the value of every
    /// merged tile. Does not spawn; see the module docs.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        let mut moved = false;
        let mut gained = 0u64;

        for line in 0..self.size() {
            let indices = self.grid.line_indices(direction, line);
            let before: LineValues = indices.iter().map(|&i| self.grid.cells()[i]).collect();
            let slide = slide_line(&before);
            if !slide.changed(&before) {
                continue;
            }
            moved = true;
            gained += slide.gained;
            for (&index, &value) in indices.iter().zip(slide.values.iter()) {
                self.grid.set(index, value);
            }
        }

        if moved {
            self.score += gained;
            debug!("moved {direction}: +{gained}, score {}", self.score);
        } else {
            trace!("move {direction} changed nothing");
        }
        moved
    }

    /// True once the winning tile is on the board.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.grid.max_tile() >= self.config.win_tile
    }

    /// True while some move could still change the grid.
    #[must_use]
    pub fn has_moves(&self) -> bool {
        self.grid.has_empty() || self.grid.has_adjacent_pair()
    }

    /// Win, loss, or still playing. A win takes precedence.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.has_won() {
            GameStatus::Won
        } else if !self.has_moves() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// True when the game has been won or no move is possible.
    ///
    /// Callers that need to tell the two apart use `status`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Start over: score 0, empty grid, two new tiles.
    pub fn reset(&mut self) {
        info!("new game, previous score {}", self.score);
        self.score = 0;
        self.grid = Grid::new(self.config.size);
        self.spawn_opening_tiles();
    }

    fn spawn_opening_tiles(&mut self) {
        // A 1x1 board only has room for one
        self.spawn_random_tile();
        self.spawn_random_tile();
    }
}
