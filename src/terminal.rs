//! Terminal handling module
//!
//! Groups all terminal-related functionality:
//! - Control codes and erase sequences
//! - Key decoding
//! - The key device capability and its backends
//! - Scoped raw-mode acquisition

pub mod backend;
pub mod device;
pub mod escape;
pub mod key;
pub mod raw_mode;
pub mod scripted;

pub use backend::CrosstermTerminal;
pub use device::KeyDevice;
pub use key::Key;
pub use raw_mode::RawModeGuard;
pub use scripted::ScriptedTerminal;
