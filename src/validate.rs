//! PIN acceptance rules
//!
//! Validation is pure: it inspects a finished [`InputBuffer`] and either
//! promotes it to a [`PinCandidate`] or says precisely which rule failed.

use serde::{Deserialize, Serialize};

use crate::error::PinError;
use crate::pin::{InputBuffer, PinCandidate, MAX_PIN_LENGTH};

/// Characters a PIN may contain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// ASCII 0-9
    Digits,
    /// ASCII letters and digits
    Alphanumeric,
    /// Any non-control character
    Printable,
    /// Exactly the characters listed
    Custom(String),
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Digits
    }
}

impl Charset {
    pub fn allows(&self, c: char) -> bool {
        match self {
            Charset::Digits => c.is_ascii_digit(),
            Charset::Alphanumeric => c.is_ascii_alphanumeric(),
            Charset::Printable => !c.is_control(),
            Charset::Custom(set) => set.contains(c),
        }
    }

    /// Human-readable rule, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Charset::Digits => "only digits are allowed".to_string(),
            Charset::Alphanumeric => "only letters and digits are allowed".to_string(),
            Charset::Printable => "control characters are not allowed".to_string(),
            Charset::Custom(set) => format!("only the characters \"{}\" are allowed", set),
        }
    }

    /// Parse a command-line value: a named set, or a literal list of characters
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "digits" | "numeric" => Some(Charset::Digits),
            "alnum" | "alphanumeric" => Some(Charset::Alphanumeric),
            "printable" | "any" => Some(Charset::Printable),
            _ if value.is_empty() => None,
            _ => Some(Charset::Custom(value.to_string())),
        }
    }
}

/// Length bounds and character set a PIN must satisfy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinPolicy {
    min_length: usize,
    max_length: usize,
    charset: Charset,
}

impl PinPolicy {
    /// Bounds are inclusive. `max_length` must lie in `1..=MAX_PIN_LENGTH`
    /// and not below `min_length`.
    pub fn new(min_length: usize, max_length: usize, charset: Charset) -> Result<Self, PinError> {
        if max_length == 0 {
            return Err(PinError::InvalidPolicy(
                "maximum length must be at least 1".to_string(),
            ));
        }
        if max_length > MAX_PIN_LENGTH {
            return Err(PinError::InvalidPolicy(format!(
                "maximum length {} exceeds the limit of {}",
                max_length, MAX_PIN_LENGTH
            )));
        }
        if min_length > max_length {
            return Err(PinError::InvalidPolicy(format!(
                "minimum length {} exceeds maximum length {}",
                min_length, max_length
            )));
        }
        if let Charset::Custom(set) = &charset {
            if set.is_empty() {
                return Err(PinError::InvalidPolicy(
                    "custom character set is empty".to_string(),
                ));
            }
        }
        Ok(Self {
            min_length,
            max_length,
            charset,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Check characters first, then length
    pub fn validate(&self, buffer: &InputBuffer) -> Result<PinCandidate, PinError> {
        let chars = buffer.chars();

        if let Some(index) = chars.iter().position(|&c| !self.charset.allows(c)) {
            return Err(PinError::InvalidCharacter {
                index,
                allowed: self.charset.clone(),
            });
        }

        if chars.len() < self.min_length || chars.len() > self.max_length {
            return Err(PinError::InvalidLength {
                actual: chars.len(),
                min: self.min_length,
                max: self.max_length,
            });
        }

        Ok(PinCandidate::from_chars(chars))
    }
}
