//! Terminal frontend plumbing on crossterm.
//!
//! [`RawModeGuard`] owns the terminal state for the length of a game and
//! puts it back on drop, including during unwinding. [`TerminalInput`]
//! turns key presses into [`Command`]s.

use crossterm::{
    cursor, execute,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use log::warn;
use std::io::{self, Write};

use crate::input::{key_command, Command, InputSource, Key};

/// Raw mode plus alternate screen, undone on drop.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = execute!(out, cursor::Show, terminal::LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to restore terminal mode: {e}");
        }
        let _ = out.flush();
    }
}

/// Frontend-neutral key for a crossterm event, if it is one we care about.
/// Ctrl-C reads as Esc since raw mode swallows the signal.
#[must_use]
pub fn map_key_event(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Key::Esc),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Blocking keyboard input. Never exhausts; the player quits explicitly.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn next_command(&mut self) -> io::Result<Option<Command>> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                if let Some(command) = map_key_event(&key_event).and_then(key_command) {
                    return Ok(Some(command));
                }
            }
        }
    }
}
