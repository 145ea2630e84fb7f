//! Masked line reader
//!
//! Reads one line from a device in raw mode, echoing a mask glyph for each
//! accepted character. The literal characters are never written back.

use tracing::{info, warn};

use crate::error::PinError;
use crate::pin::{InputBuffer, MAX_PIN_LENGTH};
use crate::terminal::escape::{erase_glyph, CRLF};
use crate::terminal::{Key, KeyDevice, RawModeGuard};

/// Glyph shown in place of each typed character
pub const DEFAULT_MASK: char = '*';

/// Line editor for secrets: append, backspace, kill-line, enter, cancel
#[derive(Clone, Debug)]
pub struct MaskedLineReader {
    mask: char,
    max_length: usize,
}

impl MaskedLineReader {
    /// `max_length` is capped at [`MAX_PIN_LENGTH`]
    pub fn new(max_length: usize) -> Self {
        Self {
            mask: DEFAULT_MASK,
            max_length: max_length.min(MAX_PIN_LENGTH),
        }
    }

    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    pub fn mask(&self) -> char {
        self.mask
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Write `prompt` and collect keys until Enter or cancellation.
    ///
    /// Keys past `max_length` are dropped without echo. On cancellation the
    /// partial buffer is wiped before `PinError::Cancelled` is returned.
    pub fn read<D: KeyDevice + ?Sized>(
        &self,
        guard: &mut RawModeGuard<'_, D>,
        prompt: &str,
    ) -> Result<InputBuffer, PinError> {
        let device = guard.device();
        let mut buffer = InputBuffer::with_max_length(self.max_length);
        let mask = self.mask.to_string();
        let erase = erase_glyph(self.mask);

        device.write_str(prompt)?;

        loop {
            match device.read_key()? {
                Key::Enter => {
                    device.write_str(CRLF)?;
                    return Ok(buffer);
                }
                Key::Backspace => {
                    if buffer.pop() {
                        device.write_str(&erase)?;
                    }
                }
                Key::ClearLine => {
                    let removed = buffer.clear();
                    if removed > 0 {
                        device.write_str(&erase.repeat(removed))?;
                    }
                }
                Key::Interrupt => {
                    drop(buffer);
                    // A broken output must not turn the cancel into an I/O error
                    if let Err(e) = device.write_str(CRLF) {
                        warn!(error = %e, "failed to end the line after cancel");
                    }
                    info!("PIN entry cancelled by operator");
                    return Err(PinError::Cancelled);
                }
                Key::Char(c) if !c.is_control() => {
                    if buffer.push(c) {
                        device.write_str(&mask)?;
                    }
                }
                Key::Char(_) | Key::Ignored => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedTerminal;

    fn read_with(
        reader: &MaskedLineReader,
        term: &mut ScriptedTerminal,
        prompt: &str,
    ) -> Result<String, PinError> {
        let mut guard = RawModeGuard::acquire(term)?;
        let result = reader.read(&mut guard, prompt);
        guard.release()?;
        result.map(|buf| buf.chars().iter().collect())
    }

    #[test]
    fn test_basic_line() {
        let mut term = ScriptedTerminal::new("1234\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "Enter test PIN: ").unwrap();
        assert_eq!(line, "1234");
        assert_eq!(term.output(), "Enter test PIN: ****\r\n");
    }

    #[test]
    fn test_literal_secret_never_echoed() {
        let mut term = ScriptedTerminal::new("8675\x7f309\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "867309");
        for digit in "0356789".chars() {
            assert!(!term.output().contains(digit));
        }
    }

    #[test]
    fn test_empty_line_is_returned() {
        let mut term = ScriptedTerminal::new("\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "");
    }

    #[test]
    fn test_backspace_removes_one_glyph() {
        let mut term = ScriptedTerminal::new("123\x7f\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "12");
        assert_eq!(term.output(), "PIN: ***\x08 \x08\r\n");
        assert_eq!(term.screen()[0], "PIN: **");
    }

    #[test]
    fn test_backspace_on_empty_buffer_writes_nothing() {
        let mut term = ScriptedTerminal::new("\x7f\x7f1\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "1");
        assert_eq!(term.output(), "PIN: *\r\n");
    }

    #[test]
    fn test_input_beyond_max_length_is_dropped_silently() {
        let mut term = ScriptedTerminal::new("123456\r");
        let line = read_with(&MaskedLineReader::new(4), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "1234");
        assert_eq!(term.output(), "PIN: ****\r\n");
    }

    #[test]
    fn test_clear_line_erases_every_glyph() {
        let mut term = ScriptedTerminal::new("999\x1512\r");
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "12");
        assert_eq!(term.screen()[0], "PIN: **");
    }

    #[test]
    fn test_interrupt_cancels() {
        let mut term = ScriptedTerminal::new("12\x0334\r");
        let err = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap_err();
        assert!(err.is_cancelled());
        assert!(!term.is_raw());
        // Keys after the interrupt stay queued for the next read
        assert_eq!(term.remaining_keys(), 3);
    }

    #[test]
    fn test_ignored_keys_do_not_echo() {
        let mut term = ScriptedTerminal::from_keys([
            Key::Ignored,
            Key::Char('5'),
            Key::Char('\u{7}'),
            Key::Enter,
        ]);
        let line = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap();
        assert_eq!(line, "5");
        assert_eq!(term.output(), "PIN: *\r\n");
    }

    #[test]
    fn test_custom_mask_glyph() {
        let mut term = ScriptedTerminal::new("12\x7f\r");
        let reader = MaskedLineReader::new(8).with_mask('•');
        assert_eq!(reader.mask(), '•');
        read_with(&reader, &mut term, "PIN: ").unwrap();
        assert_eq!(term.output(), "PIN: ••\x08 \x08\r\n");
    }

    #[test]
    fn test_glyph_count_tracks_buffer_after_every_key() {
        let input = "12\x7f\x7f\x7f345\x15678901\x7f2\r";
        let mut term = ScriptedTerminal::new(input);
        let reader = MaskedLineReader::new(5);
        read_with(&reader, &mut term, "PIN: ").unwrap();

        // Expected buffer length before each key is read
        let mut expected = Vec::new();
        let mut len = 0usize;
        for c in input.chars() {
            expected.push(len);
            match c {
                '\x7f' => len = len.saturating_sub(1),
                '\x15' => len = 0,
                '\r' => {}
                _ => len = (len + 1).min(5),
            }
        }

        let glyphs: Vec<usize> = term
            .lines_at_reads()
            .iter()
            .map(|line| line.trim_start_matches("PIN: ").matches('*').count())
            .collect();
        assert_eq!(glyphs, expected);
    }

    #[test]
    fn test_interrupt_with_broken_output_still_cancels() {
        // Prompt and two glyphs get through, the newline after Ctrl+C does not
        let mut term = ScriptedTerminal::new("12\x03").with_write_budget(3);
        let err = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap_err();
        assert!(matches!(err, PinError::Cancelled));
        assert_eq!(term.output(), "PIN: **");
        assert!(!term.is_raw());
    }

    #[test]
    fn test_unbounded_reader_is_capped() {
        let reader = MaskedLineReader::new(usize::MAX);
        assert_eq!(reader.max_length(), MAX_PIN_LENGTH);

        let mut term = ScriptedTerminal::new("12\r");
        let line = read_with(&reader, &mut term, "PIN: ").unwrap();
        assert_eq!(line, "12");
        assert_eq!(term.raw_enters(), 1);
        assert_eq!(term.raw_leaves(), 1);
    }

    #[test]
    fn test_io_failure_propagates_and_restores() {
        let mut term = ScriptedTerminal::new("12");
        let err = read_with(&MaskedLineReader::new(8), &mut term, "PIN: ").unwrap_err();
        assert!(matches!(err, PinError::Io(_)));
        assert!(!term.is_raw());
        assert_eq!(term.raw_enters(), term.raw_leaves());
    }
}
