//! Confirmation protocol
//!
//! Asks for the PIN twice and only trusts it when both entries agree. A
//! mismatch restarts the whole round with fresh first and second prompts,
//! so the operator re-derives the PIN instead of copying their first guess.
//!
//! ```text
//! Start -> ReadFirst -> ReadSecond -> Matched    => Done(confirmed)
//!                                  -> Mismatched => Start, or Done(exhausted)
//! ReadFirst / ReadSecond -> Done(cancelled | invalid | terminal error)
//! ```

use tracing::{debug, warn};

use crate::error::PinError;
use crate::pin::PinCandidate;
use crate::prompt::PinPrompt;
use crate::terminal::escape::CRLF;
use crate::terminal::KeyDevice;

/// A PIN both entries agreed on
#[derive(Debug)]
pub struct Confirmation {
    pub pin: PinCandidate,
    /// Mismatched rounds consumed before the matching one
    pub mismatches: u32,
}

/// Result of `get_pin_with_confirmation`. Exhausting the round budget is
/// reported as `PinError::MismatchExceededRetries`.
pub type ConfirmationOutcome = Result<Confirmation, PinError>;

impl<D: KeyDevice> PinPrompt<D> {
    /// Run up to `max_attempts` rounds of enter + confirm.
    ///
    /// Cancellation and validation failures end the protocol immediately;
    /// they are never counted as mismatches.
    pub fn get_pin_with_confirmation(
        &mut self,
        prompt: &str,
        confirm_prompt: &str,
        max_attempts: u32,
    ) -> ConfirmationOutcome {
        if max_attempts == 0 {
            return Err(PinError::InvalidPolicy(
                "confirmation needs at least one attempt".to_string(),
            ));
        }

        let mut mismatches = 0u32;
        loop {
            let first = self.read_candidate(prompt)?;
            let second = self.read_candidate(confirm_prompt)?;

            if first == second {
                debug!(mismatches, "PIN confirmed");
                return Ok(Confirmation {
                    pin: first,
                    mismatches,
                });
            }

            mismatches += 1;
            warn!(attempt = mismatches, max_attempts, "PIN entries did not match");
            if mismatches >= max_attempts {
                return Err(PinError::MismatchExceededRetries {
                    attempts: mismatches,
                });
            }

            if let Some(notice) = self.mismatch_notice().map(str::to_owned) {
                let device = self.device_mut();
                device.write_str(&notice)?;
                device.write_str(CRLF)?;
            }
        }
    }
}
