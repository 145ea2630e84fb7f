//! Secret-holding buffers
//!
//! Both types wipe their contents on drop and never print them through
//! `Debug`.

use std::fmt;

use zeroize::Zeroizing;

/// Longest line the reader will hold. The buffer is allocated at full
/// size up front so it never reallocates and leaves unwiped copies behind.
pub const MAX_PIN_LENGTH: usize = 256;

/// Characters accepted so far for the line being entered
pub struct InputBuffer {
    chars: Zeroizing<Vec<char>>,
    max_length: usize,
}

impl InputBuffer {
    /// `max_length` is capped at [`MAX_PIN_LENGTH`]
    pub fn with_max_length(max_length: usize) -> Self {
        let max_length = max_length.min(MAX_PIN_LENGTH);
        Self {
            chars: Zeroizing::new(Vec::with_capacity(max_length)),
            max_length,
        }
    }

    /// Append `c` unless the buffer is full. Returns whether it was accepted.
    pub fn push(&mut self, c: char) -> bool {
        if self.chars.len() >= self.max_length {
            return false;
        }
        self.chars.push(c);
        true
    }

    /// Drop the last character. Returns false on an empty buffer.
    pub fn pop(&mut self) -> bool {
        self.chars.pop().is_some()
    }

    /// Drop everything, returning how many characters were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.chars.len();
        self.chars.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBuffer")
            .field("len", &self.chars.len())
            .field("max_length", &self.max_length)
            .finish()
    }
}

/// A validated PIN. Immutable once built.
#[derive(Clone)]
pub struct PinCandidate(Zeroizing<String>);

impl PinCandidate {
    pub(crate) fn from_chars(chars: &[char]) -> Self {
        let mut value = Zeroizing::new(String::with_capacity(chars.len() * 4));
        value.extend(chars.iter());
        Self(value)
    }

    /// The secret itself. Callers own whatever copies they make of it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for PinCandidate {
    /// Compares every byte even after a difference is found
    fn eq(&self, other: &Self) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl Eq for PinCandidate {}

impl fmt::Debug for PinCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCandidate(<redacted>)")
    }
}
