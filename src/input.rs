//! Input side of the game.
//!
//! Raw device events become [`Command`]s here; the session only ever sees
//! commands. Keyboard keys map through [`key_command`], touch swipes through
//! [`swipe_direction`], and [`ScriptedInput`] replays a fixed command list
//! for headless play and tests.

use std::collections::VecDeque;
use std::io;

use crate::core::Direction;

/// Something the player asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Shift tiles.
    Move(Direction),
    /// Abandon the current game and start another.
    NewGame,
    /// Stop playing.
    Quit,
}

/// Produces commands from some device.
pub trait InputSource {
    /// Next command, blocking if needed. `Ok(None)` means input is
    /// exhausted and the session should stop.
    fn next_command(&mut self) -> io::Result<Option<Command>>;
}

/// Frontend-neutral key identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Esc,
    Char(char),
}

/// Map a key to a command.
///
/// Arrows, `wasd` and `hjkl` move; `n`/`r` start a new game; `q`/Esc
/// quit. Letters are case-insensitive.
#[must_use]
pub fn key_command(key: Key) -> Option<Command> {
    let command = match key {
        Key::ArrowLeft => Command::Move(Direction::Left),
        Key::ArrowRight => Command::Move(Direction::Right),
        Key::ArrowUp => Command::Move(Direction::Up),
        Key::ArrowDown => Command::Move(Direction::Down),
        Key::Esc => Command::Quit,
        Key::Char(c) => match c.to_ascii_lowercase() {
            'a' | 'h' => Command::Move(Direction::Left),
            'd' | 'l' => Command::Move(Direction::Right),
            'w' | 'k' => Command::Move(Direction::Up),
            's' | 'j' => Command::Move(Direction::Down),
            'n' | 'r' => Command::NewGame,
            'q' => Command::Quit,
            _ => return None,
        },
    };
    Some(command)
}

/// Direction of a swipe from `start` to `end` in screen coordinates
/// (y grows downward).
///
/// The axis with the larger absolute delta wins; a tie counts as vertical.
/// A swipe that goes nowhere yields `None`.
///
/// ```
/// use rust_2048::core::Direction;
/// use rust_2048::input::swipe_direction;
///
/// assert_eq!(swipe_direction((10.0, 10.0), (60.0, 20.0)), Some(Direction::Right));
/// assert_eq!(swipe_direction((10.0, 10.0), (15.0, -40.0)), Some(Direction::Up));
/// ```
#[must_use]
pub fn swipe_direction(start: (f32, f32), end: (f32, f32)) -> Option<Direction> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Error for a script character that is not a command.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unexpected {found:?} at position {position} in move script")]
pub struct ParseCommandError {
    pub position: usize,
    pub found: char,
}

/// Replays a fixed list of commands, then reports exhaustion.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    commands: VecDeque<Command>,
}

impl ScriptedInput {
    /// Replay `commands` in order.
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Parse a compact script: `L R U D` move, `N` new game, `Q` quit.
    /// Case-insensitive; whitespace and commas are skipped.
    ///
    /// ```
    /// use rust_2048::input::ScriptedInput;
    ///
    /// let script = ScriptedInput::parse("llur, d").unwrap();
    /// assert_eq!(script.remaining(), 5);
    /// assert!(ScriptedInput::parse("lx").is_err());
    /// ```
    pub fn parse(script: &str) -> Result<Self, ParseCommandError> {
        let mut commands = VecDeque::new();
        for (position, c) in script.chars().enumerate() {
            if c.is_whitespace() || c == ',' {
                continue;
            }
            let command = match c.to_ascii_lowercase() {
                'l' => Command::Move(Direction::Left),
                'r' => Command::Move(Direction::Right),
                'u' => Command::Move(Direction::Up),
                'd' => Command::Move(Direction::Down),
                'n' => Command::NewGame,
                'q' => Command::Quit,
                _ => return Err(ParseCommandError { position, found: c }),
            };
            commands.push_back(command);
        }
        Ok(Self { commands })
    }

    /// Commands not yet replayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_command(&mut self) -> io::Result<Option<Command>> {
        Ok(self.commands.pop_front())
    }
}
