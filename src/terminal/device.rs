//! Key device capability
//!
//! The masked reader never talks to a terminal directly. It drives a
//! [`KeyDevice`], which real terminals and scripted test input both implement.

use std::io;

use super::key::Key;

/// Minimal capability set needed to read a secret from a character device
pub trait KeyDevice {
    /// Save the current input mode and switch to raw, no-echo input
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Restore the input mode saved by the matching `enter_raw_mode`
    fn leave_raw_mode(&mut self) -> io::Result<()>;

    /// Block until the next key arrives
    fn read_key(&mut self) -> io::Result<Key>;

    /// Write display text and flush it immediately
    fn write_str(&mut self, text: &str) -> io::Result<()>;
}

impl<D: KeyDevice + ?Sized> KeyDevice for &mut D {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        (**self).enter_raw_mode()
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        (**self).leave_raw_mode()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        (**self).read_key()
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }
}
