//! Presentation of the board.
//!
//! The engine exposes its grid and score; a [`Renderer`] turns them into
//! something a player can see. Each tile value maps to a display label and a
//! style class keyed by the value (`tile tile-2048`), so a frontend can
//! style tiles without knowing the rules.
//!
//! [`TextRenderer`] draws a boxed grid into any `io::Write`, optionally with
//! ANSI colors.

use std::io::{self, Write};

use crate::core::{Grid, Tile};
use crate::rules::GameStatus;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_DIM: &str = "\x1b[90m";
const COLOR_BOLD: &str = "\x1b[1m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What a renderer gets after every change.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    pub grid: &'a Grid,
    pub score: u64,
    pub best_score: u64,
}

/// Output side of the game.
pub trait Renderer {
    /// Draw the current board.
    fn render(&mut self, view: &BoardView<'_>) -> io::Result<()>;

    /// Tell the player the game ended. Called before the board is reset.
    fn announce(&mut self, status: GameStatus, score: u64, win_tile: Tile) -> io::Result<()>;
}

/// Display text for a tile; empty cells are blank.
#[must_use]
pub fn tile_label(value: Tile) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Style classes for a tile: `tile`, plus `tile-<value>` when occupied.
///
/// [`TextRenderer`] colors by value directly; this is for frontends that
/// style cells by class name, such as a web view over [`BoardView`].
///
/// ```
/// use rust_2048::{tile_class, Grid};
///
/// let grid = Grid::from_cells(2, vec![2, 0, 0, 2048]).unwrap();
/// let classes: Vec<String> = grid.cells().iter().map(|&v| tile_class(v)).collect();
/// assert_eq!(classes, ["tile tile-2", "tile", "tile", "tile tile-2048"]);
/// ```
#[must_use]
pub fn tile_class(value: Tile) -> String {
    if value == 0 {
        "tile".to_string()
    } else {
        format!("tile tile-{value}")
    }
}

/// Message shown when a game ends; `None` while it is still going.
#[must_use]
pub fn announcement(status: GameStatus, win_tile: Tile) -> Option<String> {
    match status {
        GameStatus::Won => Some(format!("Congratulations! You reached {win_tile}!")),
        GameStatus::Lost => Some("Game Over! No more moves possible.".to_string()),
        GameStatus::InProgress => None,
    }
}

/// 256-color foreground escape for a tile, cycling through a palette by
/// the tile's exponent.
fn tile_color(value: Tile) -> String {
    const PALETTE: [u8; 11] = [250, 223, 215, 209, 203, 197, 227, 221, 214, 208, 202];
    let exponent = value.trailing_zeros() as usize;
    let code = PALETTE[(exponent.saturating_sub(1)) % PALETTE.len()];
    format!("\x1b[38;5;{code}m")
}

/// Width of one cell's content, wide enough for the largest tile.
fn cell_width(grid: &Grid) -> usize {
    tile_label(grid.max_tile()).len().max(4)
}

/// Boxed text grid, one string per output line.
#[must_use]
pub fn render_grid_lines(grid: &Grid, colored: bool) -> Vec<String> {
    let width = cell_width(grid);
    let size = grid.size();
    let border = {
        let segment = "-".repeat(width + 2);
        let mut line = String::from("+");
        for _ in 0..size {
            line.push_str(&segment);
            line.push('+');
        }
        line
    };

    let mut lines = Vec::with_capacity(size * 2 + 1);
    lines.push(border.clone());
    for row in 0..size {
        let mut line = String::from("|");
        for col in 0..size {
            let value = grid.get(row, col);
            let label = if value == 0 {
                ".".to_string()
            } else {
                tile_label(value)
            };
            let padded = format!(" {label:>width$} ");
            if colored {
                let color = if value == 0 {
                    COLOR_DIM.to_string()
                } else {
                    tile_color(value)
                };
                line.push_str(&format!("{color}{padded}{COLOR_RESET}"));
            } else {
                line.push_str(&padded);
            }
            line.push('|');
        }
        lines.push(line);
        lines.push(border.clone());
    }
    lines
}

/// Boxed text grid joined with `\n`.
#[must_use]
pub fn render_grid(grid: &Grid, colored: bool) -> String {
    render_grid_lines(grid, colored).join("\n")
}

/// Renders to a writer as plain or colored text.
pub struct TextRenderer<W: Write> {
    out: W,
    colored: bool,
    clear_screen: bool,
    line_ending: &'static str,
    pending: Option<String>,
}

impl<W: Write> TextRenderer<W> {
    /// Plain text, no screen clearing, `\n` line endings.
    pub fn new(out: W) -> Self {
        Self {
            out,
            colored: false,
            clear_screen: false,
            line_ending: "\n",
            pending: None,
        }
    }

    /// Color tiles with ANSI escapes.
    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Clear the screen before each frame. Announcements are then held and
    /// shown under the next frame, which would otherwise wipe them.
    #[must_use]
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Use `\r\n`, needed while the terminal is in raw mode.
    #[must_use]
    pub fn raw_line_endings(mut self) -> Self {
        self.line_ending = "\r\n";
        self
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}{}", text, self.line_ending)
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &BoardView<'_>) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        let header = format!("Score: {}   Best: {}", view.score, view.best_score);
        if self.colored {
            self.line(&format!("{COLOR_BOLD}{header}{COLOR_RESET}"))?;
        } else {
            self.line(&header)?;
        }
        for line in render_grid_lines(view.grid, self.colored) {
            self.line(&line)?;
        }
        if let Some(message) = self.pending.take() {
            self.line(&message)?;
        }
        self.out.flush()
    }

    fn announce(&mut self, status: GameStatus, score: u64, win_tile: Tile) -> io::Result<()> {
        let Some(message) = announcement(status, win_tile) else {
            return Ok(());
        };
        let message = format!("{message} Final score: {score}");
        if self.clear_screen {
            self.pending = Some(message);
            return Ok(());
        }
        self.line(&message)?;
        self.out.flush()
    }
}
