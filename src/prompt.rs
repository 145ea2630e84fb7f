//! Single masked PIN entry
//!
//! [`PinPrompt`] ties a key device to a validation policy and a reader.
//! `prompt_pin` is the one-shot entry point; the confirmation protocol in
//! `confirm.rs` builds on the same `read_candidate` step.

use std::io::Stderr;

use tracing::{debug, warn};

use crate::error::PinError;
use crate::pin::PinCandidate;
use crate::reader::MaskedLineReader;
use crate::terminal::{CrosstermTerminal, KeyDevice, RawModeGuard};
use crate::validate::PinPolicy;

/// Line shown between rounds when the two entries differ
pub const DEFAULT_MISMATCH_NOTICE: &str = "PINs do not match, please try again.";

/// PIN entry session over one key device
pub struct PinPrompt<D: KeyDevice> {
    device: D,
    policy: PinPolicy,
    reader: MaskedLineReader,
    mismatch_notice: Option<String>,
}

impl PinPrompt<CrosstermTerminal<Stderr>> {
    /// Prompt on the controlling terminal, drawing on stderr
    pub fn on_terminal(policy: PinPolicy) -> Self {
        Self::new(CrosstermTerminal::new(), policy)
    }
}

impl<D: KeyDevice> PinPrompt<D> {
    pub fn new(device: D, policy: PinPolicy) -> Self {
        let reader = MaskedLineReader::new(policy.max_length());
        Self {
            device,
            policy,
            reader,
            mismatch_notice: Some(DEFAULT_MISMATCH_NOTICE.to_string()),
        }
    }

    pub fn with_mask(mut self, mask: char) -> Self {
        self.reader = self.reader.with_mask(mask);
        self
    }

    /// `None` silences the notice; the fresh prompts still appear
    pub fn with_mismatch_notice(mut self, notice: Option<String>) -> Self {
        self.mismatch_notice = notice;
        self
    }

    pub fn policy(&self) -> &PinPolicy {
        &self.policy
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub(crate) fn mismatch_notice(&self) -> Option<&str> {
        self.mismatch_notice.as_deref()
    }

    pub(crate) fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Ask once for a PIN, masked, and validate it
    pub fn prompt_pin(&mut self, prompt: &str) -> Result<PinCandidate, PinError> {
        self.read_candidate(prompt)
    }

    /// One scoped raw-mode read followed by validation.
    ///
    /// Raw mode covers the read only; the guard is released before the
    /// buffer is validated. A read error wins over a restore error.
    pub(crate) fn read_candidate(&mut self, prompt: &str) -> Result<PinCandidate, PinError> {
        let mut guard = RawModeGuard::acquire(&mut self.device)?;
        let read = self.reader.read(&mut guard, prompt);
        let released = guard.release();
        let buffer = match (read, released) {
            (Ok(buffer), Ok(())) => buffer,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), released) => {
                if let Err(restore) = released {
                    warn!(error = %restore, "failed to restore terminal mode after read error");
                }
                return Err(e);
            }
        };

        debug!(chars = buffer.len(), "line read, validating");
        self.policy.validate(&buffer)
    }
}
