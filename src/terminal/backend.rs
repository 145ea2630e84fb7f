//! Crossterm-backed terminal device

use std::io::{self, IsTerminal, Stderr, Write};

use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

use super::device::KeyDevice;
use super::key::Key;

/// The controlling terminal, read through crossterm's event queue.
///
/// Prompts and mask glyphs go to `out` (stderr by default) so that stdout
/// stays free for whatever the caller does with the PIN.
pub struct CrosstermTerminal<W: Write = Stderr> {
    out: W,
    /// Raw mode was already on before we entered it; leave it on afterwards.
    /// On Unix crossterm only reports raw mode it switched on itself in this
    /// process, so raw mode set up by a parent (e.g. `stty raw`) reads as off
    /// and is turned off again on release.
    was_raw: bool,
}

impl CrosstermTerminal<Stderr> {
    pub fn new() -> Self {
        Self::with_output(io::stderr())
    }
}

impl Default for CrosstermTerminal<Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            out,
            was_raw: false,
        }
    }
}

impl<W: Write> KeyDevice for CrosstermTerminal<W> {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if !io::stdin().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin is not an interactive terminal",
            ));
        }
        self.was_raw = is_raw_mode_enabled()?;
        if !self.was_raw {
            enable_raw_mode()?;
        }
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        if self.was_raw {
            return Ok(());
        }
        disable_raw_mode()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            // Resize, focus and mouse events carry no input
            if let Event::Key(key_event) = event::read()? {
                match Key::from_event(key_event) {
                    Key::Ignored => continue,
                    key => return Ok(key),
                }
            }
        }
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}
