//! Scoped raw-mode acquisition
//!
//! A [`RawModeGuard`] is the only way to get at a device in raw mode. It is
//! released either explicitly via [`RawModeGuard::release`] (which reports
//! restore failures) or implicitly on drop, so cancellation, validation
//! failures and panics all leave the terminal in its original mode.

use tracing::{debug, warn};

use super::device::KeyDevice;
use crate::error::PinError;

/// Exclusive handle on a device whose input mode has been switched to raw
pub struct RawModeGuard<'a, D: KeyDevice + ?Sized> {
    device: &'a mut D,
    active: bool,
}

impl<'a, D: KeyDevice + ?Sized> RawModeGuard<'a, D> {
    /// Switch `device` to raw mode for the lifetime of the guard
    pub fn acquire(device: &'a mut D) -> Result<Self, PinError> {
        device.enter_raw_mode().map_err(PinError::TerminalMode)?;
        debug!("raw mode acquired");
        Ok(Self {
            device,
            active: true,
        })
    }

    /// The device, for reading keys and writing mask glyphs
    pub fn device(&mut self) -> &mut D {
        &mut *self.device
    }

    /// Restore the saved mode now, surfacing any failure
    pub fn release(mut self) -> Result<(), PinError> {
        self.active = false;
        self.device.leave_raw_mode().map_err(PinError::TerminalMode)?;
        debug!("raw mode released");
        Ok(())
    }
}

impl<D: KeyDevice + ?Sized> Drop for RawModeGuard<'_, D> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        match self.device.leave_raw_mode() {
            Ok(()) => debug!("raw mode released on unwind"),
            Err(e) => warn!(error = %e, "failed to restore terminal mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedTerminal;

    #[test]
    fn test_release_restores_once() {
        let mut term = ScriptedTerminal::new("");
        let guard = RawModeGuard::acquire(&mut term).unwrap();
        guard.release().unwrap();
        assert_eq!(term.raw_enters(), 1);
        assert_eq!(term.raw_leaves(), 1);
        assert!(!term.is_raw());
    }

    #[test]
    fn test_drop_restores_once() {
        let mut term = ScriptedTerminal::new("");
        {
            let mut guard = RawModeGuard::acquire(&mut term).unwrap();
            assert!(guard.device().is_raw());
        }
        assert_eq!(term.raw_leaves(), 1);
        assert!(!term.is_raw());
    }

    #[test]
    fn test_acquire_failure_has_nothing_to_release() {
        let mut term = ScriptedTerminal::not_a_terminal();
        let err = RawModeGuard::acquire(&mut term).err().unwrap();
        assert!(matches!(err, PinError::TerminalMode(_)));
        assert_eq!(term.raw_leaves(), 0);
    }

    #[test]
    fn test_panic_inside_scope_still_restores() {
        let mut term = ScriptedTerminal::new("");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RawModeGuard::acquire(&mut term).unwrap();
            panic!("reader blew up");
        }));
        assert!(result.is_err());
        assert!(!term.is_raw());
        assert_eq!(term.raw_leaves(), 1);
    }
}
