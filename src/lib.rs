//! Masked PIN entry for interactive terminals
//!
//! Reads a short secret without echoing it, showing one mask glyph per
//! keystroke, and optionally asks for it twice before trusting it.
//!
//! ```no_run
//! use maskpin::{Charset, PinPolicy, PinPrompt};
//!
//! # fn main() -> Result<(), maskpin::PinError> {
//! let policy = PinPolicy::new(4, 8, Charset::Digits)?;
//! let mut prompt = PinPrompt::on_terminal(policy);
//! let confirmed = prompt.get_pin_with_confirmation("Enter PIN: ", "Confirm PIN: ", 3)?;
//! println!("{} digits", confirmed.pin.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod confirm;
pub mod error;
pub mod pin;
pub mod prompt;
pub mod reader;
pub mod terminal;
pub mod validate;

pub use config::Config;
pub use confirm::{Confirmation, ConfirmationOutcome};
pub use error::PinError;
pub use pin::{InputBuffer, PinCandidate, MAX_PIN_LENGTH};
pub use prompt::PinPrompt;
pub use reader::MaskedLineReader;
pub use terminal::{CrosstermTerminal, Key, KeyDevice, RawModeGuard, ScriptedTerminal};
pub use validate::{Charset, PinPolicy};
