//! Control codes and erase sequences
//!
//! This module centralizes the raw bytes the masked reader recognizes on
//! input and the sequences it writes back, providing readable names for
//! raw control codes.

use unicode_width::UnicodeWidthChar;

// === Line Control ===

/// Carriage return + line feed. Raw mode disables output post-processing,
/// so a bare `\n` would not return the cursor to column 1.
pub const CRLF: &str = "\r\n";

/// Move cursor one column left without erasing
pub const BACKSPACE: &str = "\x08";

// === Style ===

/// Bold text
pub const BOLD: &str = "\x1b[1m";

/// Dim/faint text
pub const DIM: &str = "\x1b[2m";

/// Reset all text attributes
pub const RESET: &str = "\x1b[0m";

/// Set foreground color using 256-color palette
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

pub mod color {
    /// Green (83) - Success
    pub const GREEN: u8 = 83;

    /// Red (203) - Errors
    pub const RED: u8 = 203;

    /// Cyan (45) - Headers
    pub const CYAN: u8 = 45;
}

// === Mask Glyph Helpers ===

/// Number of terminal columns a mask glyph occupies.
///
/// Zero-width and control glyphs are treated as one column so that every
/// accepted keystroke still produces visible feedback.
#[inline]
pub fn glyph_width(glyph: char) -> usize {
    match glyph.width() {
        Some(0) | None => 1,
        Some(w) => w,
    }
}

/// Sequence that erases one mask glyph ending at the cursor:
/// step back over it, blank it, step back again.
pub fn erase_glyph(glyph: char) -> String {
    let width = glyph_width(glyph);
    let back = BACKSPACE.repeat(width);
    format!("{back}{}{back}", " ".repeat(width))
}

// === Key Bytes ===

pub mod key {
    /// End of text, sent by Ctrl+C in raw mode (0x03)
    pub const ETX: u8 = 0x03;

    /// Backspace byte, sent by Ctrl+H (0x08)
    pub const BS: u8 = 0x08;

    /// Line feed
    pub const LF: u8 = b'\n';

    /// Carriage return
    pub const CR: u8 = b'\r';

    /// Negative acknowledge, sent by Ctrl+U: kill the whole line (0x15)
    pub const NAK: u8 = 0x15;

    /// Escape byte (0x1b / 27)
    pub const ESC: u8 = 0x1b;

    /// Delete/backspace byte most terminals send for the Backspace key (0x7f)
    pub const DEL: u8 = 0x7f;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_narrow_glyph() {
        assert_eq!(erase_glyph('*'), "\x08 \x08");
    }

    #[test]
    fn test_erase_wide_glyph() {
        // Fullwidth asterisk spans two columns
        assert_eq!(erase_glyph('＊'), "\x08\x08  \x08\x08");
    }

    #[test]
    fn test_glyph_width_never_zero() {
        assert_eq!(glyph_width('\u{200b}'), 1);
        assert_eq!(glyph_width('•'), 1);
    }
}
