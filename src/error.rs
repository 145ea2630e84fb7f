//! Error types for PIN entry

use std::io;

use thiserror::Error;

use crate::validate::Charset;

/// Everything that can go wrong while collecting a PIN
#[derive(Debug, Error)]
pub enum PinError {
    /// The device could not be switched into (or out of) raw mode,
    /// typically because it is not an interactive terminal.
    #[error("terminal mode could not be changed: {0}")]
    TerminalMode(#[source] io::Error),

    /// Reading a key or writing the prompt failed after raw mode was entered
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The operator aborted entry (Ctrl+C / Esc)
    #[error("PIN entry cancelled")]
    Cancelled,

    /// `index` is 0-based; the message reports it 1-based
    #[error("character {} is not allowed: {}", .index + 1, .allowed.describe())]
    InvalidCharacter { index: usize, allowed: Charset },

    #[error("PIN must be between {min} and {max} characters (got {actual})")]
    InvalidLength { actual: usize, min: usize, max: usize },

    #[error("PINs did not match after {attempts} attempt(s)")]
    MismatchExceededRetries { attempts: u32 },

    /// Bounds or retry limits that can never be satisfied
    #[error("invalid PIN policy: {0}")]
    InvalidPolicy(String),
}

impl PinError {
    /// True for failures the operator caused deliberately
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PinError::Cancelled)
    }

    /// Process exit code for a command-line front end (130 mirrors SIGINT)
    pub fn exit_code(&self) -> i32 {
        match self {
            PinError::Cancelled => 130,
            _ => 1,
        }
    }
}
