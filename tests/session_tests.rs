//! Session integration tests.
//!
//! A session wired the way the binary wires it: text renderer into a
//! buffer, JSON file store in a temp dir, scripted input.

use std::io::{self, Write};

use rust_2048::input::ScriptedInput;
use rust_2048::store::{load_best_score, JsonFileStore, ScoreStore, BEST_SCORE_KEY};
use rust_2048::{
    tile_class, BoardEngine, BoardView, Command, Direction, EngineConfig, GameRng, GameSession,
    GameStatus, Grid, MemoryStore, Renderer, SessionError, TextRenderer, Tile, TurnOutcome,
};
use tempfile::tempdir;

type BufferSession<S> = GameSession<GameRng, TextRenderer<Vec<u8>>, S>;

fn session<S: ScoreStore>(config: EngineConfig, cells: Vec<Tile>, store: S) -> BufferSession<S> {
    let grid = Grid::from_cells(config.size, cells).unwrap();
    let engine = BoardEngine::from_grid(config, grid, 0, GameRng::new(21));
    GameSession::new(engine, TextRenderer::new(Vec::new()), store)
}

fn output<S: ScoreStore>(session: BufferSession<S>) -> String {
    let (_, renderer, _) = session.into_parts();
    String::from_utf8(renderer.into_inner()).unwrap()
}

// =============================================================================
// Move Protocol Tests
// =============================================================================

/// Scripted play renders the opening board and each effective move.
#[test]
fn test_run_renders_each_effective_move() {
    let config = EngineConfig::new().with_size(3);
    let mut game = session(config, vec![2, 2, 0, 0, 0, 0, 0, 0, 0], MemoryStore::new());
    let mut input = ScriptedInput::parse("l").unwrap();

    let summary = game.run(&mut input).unwrap();
    assert_eq!(summary.games_finished, 0);
    assert_eq!(summary.best_score, 4);

    let out = output(game);
    assert_eq!(out.matches("Score:").count(), 2);
    assert!(out.contains("Score: 4   Best: 4"));
}

/// A move that changes nothing is reported and leaves the board alone.
#[test]
fn test_unchanged_move_outcome() {
    let config = EngineConfig::new().with_size(2);
    let mut game = session(config, vec![2, 4, 0, 0], MemoryStore::new());

    let outcome = game.handle(Command::Move(Direction::Up)).unwrap();
    assert_eq!(outcome, TurnOutcome::Unchanged);
    assert_eq!(game.engine().grid().cells(), &[2, 4, 0, 0]);
}

/// Quit stops the run before the rest of the script.
#[test]
fn test_quit_stops_run() {
    let config = EngineConfig::new().with_size(4);
    let mut cells = vec![0; 16];
    cells[0] = 2;
    let mut game = session(config, cells, MemoryStore::new());
    let mut input = ScriptedInput::parse("r q l l").unwrap();

    game.run(&mut input).unwrap();
    assert_eq!(input.remaining(), 2);
}

// =============================================================================
// End of Game Tests
// =============================================================================

/// Reaching the winning tile is announced, counted, and followed by a new game.
#[test]
fn test_win_flow() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("best.json"));
    let config = EngineConfig::new().with_size(2);
    let mut game = session(config, vec![1024, 1024, 0, 0], store);

    let mut input = ScriptedInput::new([Command::Move(Direction::Left)]);
    let summary = game.run(&mut input).unwrap();

    assert_eq!(summary.games_finished, 1);
    assert_eq!(summary.wins, 1);
    assert_eq!(summary.best_score, 2048);
    assert_eq!(game.engine().score(), 0);
    assert_eq!(game.engine().grid().non_empty_count(), 2);

    let out = output(game);
    assert!(out.contains("Congratulations! You reached 2048! Final score: 2048"));
    let announced = out.rfind("Congratulations").unwrap();
    let last_frame = out.rfind("Score: 0   Best: 2048").unwrap();
    assert!(announced < last_frame, "fresh board drawn after the announcement");
}

/// A move that fills the board with no pairs loses.
#[test]
fn test_loss_flow() {
    let config = EngineConfig::new().with_size(2).with_four_probability(0.0);
    // Left leaves one hole at index 1, which must take a 2: [4, 2, 8, 16]
    let mut game = session(config, vec![0, 4, 8, 16], MemoryStore::new());

    let outcome = game.handle(Command::Move(Direction::Left)).unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Finished {
            status: GameStatus::Lost,
            score: 0
        }
    );
    assert_eq!(game.summary().games_finished, 1);
    assert_eq!(game.summary().wins, 0);
    assert!(output(game).contains("Game Over! No more moves possible. Final score: 0"));
}

/// A custom win tile is honoured and named in the announcement.
#[test]
fn test_custom_win_tile_announcement() {
    let config = EngineConfig::new().with_size(2).with_win_tile(16);
    let mut game = session(config, vec![8, 8, 0, 0], MemoryStore::new());

    let outcome = game.handle(Command::Move(Direction::Right)).unwrap();
    assert!(matches!(
        outcome,
        TurnOutcome::Finished {
            status: GameStatus::Won,
            score: 16
        }
    ));
    assert!(output(game).contains("You reached 16!"));
}

// =============================================================================
// Best Score Tests
// =============================================================================

/// The best score written by one session is read by the next.
#[test]
fn test_best_score_persists_between_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores").join("best.json");
    let config = EngineConfig::new().with_size(2);

    let mut first = session(config.clone(), vec![8, 8, 0, 0], JsonFileStore::new(&path));
    first.handle(Command::Move(Direction::Left)).unwrap();
    assert_eq!(first.best_score(), 16);

    let reopened = JsonFileStore::new(&path);
    assert_eq!(load_best_score(&reopened).unwrap(), 16);

    let second = session(config, vec![2, 0, 0, 0], reopened);
    assert_eq!(second.best_score(), 16);
}

/// A corrupt store file is survivable: play starts from 0 and later writes
/// fail without ending the session.
#[test]
fn test_corrupt_store_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("best.json");
    std::fs::write(&path, "not json").unwrap();

    let config = EngineConfig::new().with_size(2);
    let mut game = session(config, vec![2, 2, 0, 0], JsonFileStore::new(&path));
    assert_eq!(game.best_score(), 0);

    let outcome = game.handle(Command::Move(Direction::Left)).unwrap();
    assert_eq!(outcome, TurnOutcome::Moved { gained: 4 });
    assert_eq!(game.best_score(), 4);
}

/// A stored best score above the current game is left alone.
#[test]
fn test_lower_score_does_not_overwrite() {
    let config = EngineConfig::new().with_size(2);
    let store = MemoryStore::with_entry(BEST_SCORE_KEY, "500");
    let mut game = session(config, vec![2, 2, 0, 0], store);

    game.handle(Command::Move(Direction::Left)).unwrap();
    assert_eq!(game.best_score(), 500);
    assert_eq!(game.store().get(BEST_SCORE_KEY).unwrap().as_deref(), Some("500"));
    assert!(output(game).contains("Score: 4   Best: 500"));
}

// =============================================================================
// Frontend Tests
// =============================================================================

/// Renderer that records each frame as style classes, the way a web view
/// would lay out its cells.
#[derive(Default)]
struct ClassRenderer {
    frames: Vec<Vec<String>>,
}

impl Renderer for ClassRenderer {
    fn render(&mut self, view: &BoardView<'_>) -> io::Result<()> {
        self.frames.push(view.grid.cells().iter().map(|&v| tile_class(v)).collect());
        Ok(())
    }

    fn announce(&mut self, _status: GameStatus, _score: u64, _win_tile: Tile) -> io::Result<()> {
        Ok(())
    }
}

/// A class-based frontend sees merged tiles under their new class.
#[test]
fn test_class_renderer_tracks_merges() {
    let config = EngineConfig::new().with_size(2);
    let grid = Grid::from_cells(2, vec![2, 2, 0, 0]).unwrap();
    let engine = BoardEngine::from_grid(config, grid, 0, GameRng::new(3));
    let mut game = GameSession::new(engine, ClassRenderer::default(), MemoryStore::new());

    game.start().unwrap();
    game.handle(Command::Move(Direction::Left)).unwrap();

    let frames = &game.renderer().frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], ["tile tile-2", "tile tile-2", "tile", "tile"]);
    assert_eq!(frames[1][0], "tile tile-4");
    // One spawned tile joins the merged one
    assert_eq!(frames[1].iter().filter(|c| c.as_str() != "tile").count(), 2);
}

// =============================================================================
// Error Propagation Tests
// =============================================================================

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Renderer failures end the session with a render error.
#[test]
fn test_render_failure_propagates() {
    let engine = BoardEngine::seeded(EngineConfig::new(), 4);
    let mut game = GameSession::new(engine, TextRenderer::new(BrokenPipe), MemoryStore::new());

    let err = game.run(&mut ScriptedInput::parse("l").unwrap()).unwrap_err();
    assert!(matches!(err, SessionError::Render(_)));
}
