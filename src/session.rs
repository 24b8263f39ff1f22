//! A playing session: the layer between input, engine, and output.
//!
//! `GameSession` owns one `BoardEngine` and drives it by the move
//! protocol: a move that changed the board is followed by a spawn, a best
//! score update, a redraw, and a terminal check. A finished game (won or
//! lost) is announced and then immediately replaced by a fresh one.
//!
//! Best-score persistence is best effort. Store failures are logged and
//! play continues on the in-memory value.

use log::{info, warn};
use rand::Rng;
use std::io;

use crate::core::Direction;
use crate::input::{Command, InputSource};
use crate::render::{BoardView, Renderer};
use crate::rules::{BoardEngine, GameStatus};
use crate::store::{load_best_score, save_best_score, ScoreStore};

/// What handling one command did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The move changed nothing; no tile spawned.
    Unchanged,
    /// Tiles moved and a new one spawned.
    Moved { gained: u64 },
    /// The move ended a game, which was announced and reset.
    Finished { status: GameStatus, score: u64 },
    /// The player started a new game.
    Restarted,
    /// The player asked to stop.
    Quit,
}

/// Failures that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("rendering failed: {0}")]
    Render(#[source] io::Error),
    #[error("reading input failed: {0}")]
    Input(#[source] io::Error),
}

/// Totals reported when `run` returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Games that ended by win or loss (not by restart or quit).
    pub games_finished: u32,
    /// Of those, how many were wins.
    pub wins: u32,
    /// Best score at the end of the session.
    pub best_score: u64,
}

/// Engine plus its renderer and best-score store.
pub struct GameSession<R, D, S> {
    engine: BoardEngine<R>,
    renderer: D,
    store: S,
    best_score: u64,
    summary: SessionSummary,
}

impl<R: Rng, D: Renderer, S: ScoreStore> GameSession<R, D, S> {
    /// Wrap an engine. Reads the stored best score; an unreadable store
    /// counts as 0.
    pub fn new(engine: BoardEngine<R>, renderer: D, store: S) -> Self {
        let best_score = match load_best_score(&store) {
            Ok(best) => best,
            Err(e) => {
                warn!("could not read best score, starting from 0: {e}");
                0
            }
        };
        Self {
            engine,
            renderer,
            store,
            best_score,
            summary: SessionSummary::default(),
        }
    }

    /// The engine being played.
    pub fn engine(&self) -> &BoardEngine<R> {
        &self.engine
    }

    /// The renderer.
    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    /// The best-score store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Best score seen, stored or from this session.
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Totals so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            best_score: self.best_score,
            ..self.summary
        }
    }

    /// Take the session apart, e.g. to inspect what a renderer wrote.
    pub fn into_parts(self) -> (BoardEngine<R>, D, S) {
        (self.engine, self.renderer, self.store)
    }

    /// Draw the opening board.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.render()
    }

    /// Apply one command.
    pub fn handle(&mut self, command: Command) -> Result<TurnOutcome, SessionError> {
        match command {
            Command::Move(direction) => self.play_move(direction),
            Command::NewGame => {
                self.engine.reset();
                self.render()?;
                Ok(TurnOutcome::Restarted)
            }
            Command::Quit => Ok(TurnOutcome::Quit),
        }
    }

    /// Feed commands from `input` until it quits or runs dry.
    pub fn run<I: InputSource + ?Sized>(
        &mut self,
        input: &mut I,
    ) -> Result<SessionSummary, SessionError> {
        self.start()?;
        while let Some(command) = input.next_command().map_err(SessionError::Input)? {
            if self.handle(command)? == TurnOutcome::Quit {
                break;
            }
        }
        Ok(self.summary())
    }

    fn play_move(&mut self, direction: Direction) -> Result<TurnOutcome, SessionError> {
        let before = self.engine.score();
        if !self.engine.apply_move(direction) {
            return Ok(TurnOutcome::Unchanged);
        }
        self.engine.spawn_random_tile();
        let gained = self.engine.score() - before;
        self.record_score();
        self.render()?;

        let status = self.engine.status();
        if !status.is_terminal() {
            return Ok(TurnOutcome::Moved { gained });
        }

        let score = self.engine.score();
        info!("game over: {status:?} with score {score}");
        self.summary.games_finished += 1;
        if status == GameStatus::Won {
            self.summary.wins += 1;
        }
        self.renderer
            .announce(status, score, self.engine.config().win_tile)
            .map_err(SessionError::Render)?;
        self.engine.reset();
        self.render()?;
        Ok(TurnOutcome::Finished { status, score })
    }

    fn record_score(&mut self) {
        let score = self.engine.score();
        if score <= self.best_score {
            return;
        }
        self.best_score = score;
        if let Err(e) = save_best_score(&mut self.store, score) {
            warn!("could not save best score {score}: {e}");
        }
    }

    fn render(&mut self) -> Result<(), SessionError> {
        let view = BoardView {
            grid: self.engine.grid(),
            score: self.engine.score(),
            best_score: self.best_score,
        };
        self.renderer.render(&view).map_err(SessionError::Render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, GameRng, Grid, Tile};
    use crate::store::{MemoryStore, StoreError, BEST_SCORE_KEY};

    /// Records what it was asked to draw.
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<(Vec<Tile>, u64, u64)>,
        announcements: Vec<(GameStatus, u64)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, view: &BoardView<'_>) -> io::Result<()> {
            self.frames
                .push((view.grid.cells().to_vec(), view.score, view.best_score));
            Ok(())
        }

        fn announce(&mut self, status: GameStatus, score: u64, _win_tile: Tile) -> io::Result<()> {
            self.announcements.push((status, score));
            Ok(())
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    fn session_with<S: ScoreStore>(
        size: usize,
        cells: Vec<Tile>,
        store: S,
    ) -> GameSession<GameRng, RecordingRenderer, S> {
        let config = EngineConfig::new().with_size(size);
        let grid = Grid::from_cells(size, cells).unwrap();
        let engine = BoardEngine::from_grid(config, grid, 0, GameRng::new(11));
        GameSession::new(engine, RecordingRenderer::default(), store)
    }

    /// 4x4 board with a single mergeable pair in the top-left corner.
    fn opening_pair() -> Vec<Tile> {
        let mut cells = vec![0; 16];
        cells[0] = 2;
        cells[1] = 2;
        cells
    }

    #[test]
    fn test_unchanged_move_does_not_spawn_or_render() {
        let mut session = session_with(2, vec![2, 4, 0, 0], MemoryStore::new());
        let outcome = session.handle(Command::Move(Direction::Left)).unwrap();

        assert_eq!(outcome, TurnOutcome::Unchanged);
        assert_eq!(session.engine().grid().cells(), &[2, 4, 0, 0]);
        assert!(session.renderer().frames.is_empty());
    }

    #[test]
    fn test_move_spawns_and_renders() {
        let mut session = session_with(4, opening_pair(), MemoryStore::new());
        let outcome = session.handle(Command::Move(Direction::Left)).unwrap();

        assert_eq!(outcome, TurnOutcome::Moved { gained: 4 });
        assert_eq!(session.engine().grid().non_empty_count(), 2);
        assert_eq!(session.renderer().frames.len(), 1);
        assert_eq!(session.best_score(), 4);
        assert_eq!(
            session.store().get(BEST_SCORE_KEY).unwrap().as_deref(),
            Some("4")
        );
    }

    #[test]
    fn test_best_score_only_rises() {
        let store = MemoryStore::with_entry(BEST_SCORE_KEY, "100");
        let mut session = session_with(4, opening_pair(), store);
        assert_eq!(session.best_score(), 100);

        session.handle(Command::Move(Direction::Left)).unwrap();
        assert_eq!(session.best_score(), 100);
        assert_eq!(
            session.store().get(BEST_SCORE_KEY).unwrap().as_deref(),
            Some("100")
        );
    }

    #[test]
    fn test_win_announces_and_resets() {
        let mut session = session_with(2, vec![1024, 1024, 0, 0], MemoryStore::new());
        let outcome = session.handle(Command::Move(Direction::Left)).unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Finished {
                status: GameStatus::Won,
                score: 2048
            }
        );
        assert_eq!(session.renderer().announcements, vec![(GameStatus::Won, 2048)]);
        assert_eq!(session.engine().score(), 0);
        assert_eq!(session.engine().grid().non_empty_count(), 2);
        assert_eq!(session.best_score(), 2048);
        assert_eq!(session.summary().wins, 1);
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        let mut session = session_with(2, vec![2, 2, 0, 0], BrokenStore);
        assert_eq!(session.best_score(), 0);

        let outcome = session.handle(Command::Move(Direction::Left)).unwrap();
        assert!(matches!(outcome, TurnOutcome::Moved { gained: 4 }));
        assert_eq!(session.best_score(), 4);
    }

    #[test]
    fn test_new_game_command() {
        let mut session = session_with(2, vec![2, 2, 0, 0], MemoryStore::new());
        session.handle(Command::Move(Direction::Left)).unwrap();
        let outcome = session.handle(Command::NewGame).unwrap();

        assert_eq!(outcome, TurnOutcome::Restarted);
        assert_eq!(session.engine().score(), 0);
        assert_eq!(session.engine().grid().non_empty_count(), 2);
    }
}
