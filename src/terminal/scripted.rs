//! Simulated key device
//!
//! [`ScriptedTerminal`] replays a queue of synthetic keys and records
//! everything written to it, along with every raw-mode transition. It lets
//! the reader and the confirmation protocol run end to end without a tty.

use std::collections::VecDeque;
use std::io;

use super::device::KeyDevice;
use super::key::Key;

#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    output: String,
    raw: bool,
    raw_enters: usize,
    raw_leaves: usize,
    refuse_raw: bool,
    refuse_restore: bool,
    /// Writes accepted before output starts failing
    write_budget: Option<usize>,
    /// Output length at the moment of each `read_key` call
    read_marks: Vec<usize>,
}

impl ScriptedTerminal {
    /// Queue `input` as typed text: control bytes decode the same way a
    /// terminal in raw mode delivers them (`\r` enter, `\x7f` backspace,
    /// `\x03` Ctrl+C, `\x15` Ctrl+U).
    pub fn new(input: &str) -> Self {
        let mut term = Self::default();
        term.push_input(input);
        term
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A device that refuses raw mode, like a pipe or a redirected file
    pub fn not_a_terminal() -> Self {
        Self {
            refuse_raw: true,
            ..Self::default()
        }
    }

    /// Fail every attempt to leave raw mode, leaving the device raw
    pub fn with_failing_restore(mut self) -> Self {
        self.refuse_restore = true;
        self
    }

    /// Accept `writes` calls to `write_str`, then fail the rest
    pub fn with_write_budget(mut self, writes: usize) -> Self {
        self.write_budget = Some(writes);
        self
    }

    pub fn push_input(&mut self, input: &str) {
        self.keys.extend(input.chars().map(Key::from_char));
    }

    /// Everything written so far, escape sequences included
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn raw_enters(&self) -> usize {
        self.raw_enters
    }

    pub fn raw_leaves(&self) -> usize {
        self.raw_leaves
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    /// Visible screen lines after interpreting CR, LF and backspace
    pub fn screen(&self) -> Vec<String> {
        render(&self.output)
    }

    /// The current line as it looked each time a key was requested,
    /// i.e. after every processed keystroke
    pub fn lines_at_reads(&self) -> Vec<String> {
        self.read_marks
            .iter()
            .map(|&mark| render(&self.output[..mark]).pop().unwrap_or_default())
            .collect()
    }
}

impl KeyDevice for ScriptedTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.refuse_raw {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "not an interactive terminal",
            ));
        }
        if self.raw {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "raw mode entered twice without release",
            ));
        }
        self.raw = true;
        self.raw_enters += 1;
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        if !self.raw {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "raw mode released without being entered",
            ));
        }
        if self.refuse_restore {
            return Err(io::Error::new(io::ErrorKind::Other, "terminal went away"));
        }
        self.raw = false;
        self.raw_leaves += 1;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        if !self.raw {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "key read outside raw mode",
            ));
        }
        self.read_marks.push(self.output.len());
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if let Some(budget) = self.write_budget.as_mut() {
            if *budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"));
            }
            *budget -= 1;
        }
        self.output.push_str(text);
        Ok(())
    }
}

/// Minimal line-discipline model: CR returns to column 0, LF opens a new
/// line, backspace steps left, anything else overwrites the cell under the
/// cursor. Escape sequences are not interpreted.
fn render(text: &str) -> Vec<String> {
    let mut lines: Vec<Vec<char>> = vec![Vec::new()];
    let mut col = 0usize;

    for c in text.chars() {
        match c {
            '\r' => col = 0,
            '\n' => lines.push(Vec::new()),
            '\x08' => col = col.saturating_sub(1),
            _ => {
                let Some(line) = lines.last_mut() else { continue };
                if line.len() < col {
                    line.resize(col, ' ');
                }
                if col < line.len() {
                    line[col] = c;
                } else {
                    line.push(c);
                }
                col += 1;
            }
        }
    }

    lines
        .into_iter()
        .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}
