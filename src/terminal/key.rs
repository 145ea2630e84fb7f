//! Key decoding
//!
//! Turns crossterm key events (and raw control bytes, for scripted input)
//! into the handful of keys a masked line editor cares about.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::escape::key;

/// A key as seen by the masked line reader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A character that may be appended to the buffer
    Char(char),
    /// Line end: accept the current buffer
    Enter,
    /// Remove the last character
    Backspace,
    /// Remove every character (Ctrl+U)
    ClearLine,
    /// Abort the read (Ctrl+C or Esc)
    Interrupt,
    /// Anything else: arrows, function keys, releases, modified chars
    Ignored,
}

impl Key {
    /// Decode a crossterm key event
    pub fn from_event(event: KeyEvent) -> Key {
        if event.kind == KeyEventKind::Release {
            return Key::Ignored;
        }

        let has_ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = event.modifiers.contains(KeyModifiers::ALT);

        match event.code {
            KeyCode::Char(c) if has_ctrl => decode_ctrl_char(c),
            // Alt+char arrives as a meta sequence, never as PIN content
            KeyCode::Char(_) if has_alt => Key::Ignored,
            KeyCode::Char(c) => Key::from_char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Interrupt,
            _ => Key::Ignored,
        }
    }

    /// Decode a single character of an unprocessed input stream
    pub fn from_char(c: char) -> Key {
        if !c.is_ascii() {
            return if c.is_control() { Key::Ignored } else { Key::Char(c) };
        }
        match c as u8 {
            key::CR | key::LF => Key::Enter,
            key::DEL | key::BS => Key::Backspace,
            key::NAK => Key::ClearLine,
            key::ETX | key::ESC => Key::Interrupt,
            b if b.is_ascii_control() => Key::Ignored,
            _ => Key::Char(c),
        }
    }
}

/// Ctrl+letter combinations that terminals map onto editing keys
fn decode_ctrl_char(c: char) -> Key {
    match c.to_ascii_lowercase() {
        'c' => Key::Interrupt,
        'u' => Key::ClearLine,
        'h' => Key::Backspace,
        'j' | 'm' => Key::Enter,
        _ => Key::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_plain_digit() {
        let key = Key::from_event(press(KeyCode::Char('7'), KeyModifiers::NONE));
        assert_eq!(key, Key::Char('7'));
    }

    #[test]
    fn test_shifted_letter_is_a_char() {
        let key = Key::from_event(press(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(key, Key::Char('A'));
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let key = Key::from_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(key, Key::Interrupt);
    }

    #[test]
    fn test_ctrl_u_clears_line() {
        let key = Key::from_event(press(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(key, Key::ClearLine);
    }

    #[test]
    fn test_alt_char_is_ignored() {
        let key = Key::from_event(press(KeyCode::Char('1'), KeyModifiers::ALT));
        assert_eq!(key, Key::Ignored);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = press(KeyCode::Char('1'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(Key::from_event(event), Key::Ignored);
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(Key::from_event(press(KeyCode::Enter, KeyModifiers::NONE)), Key::Enter);
        assert_eq!(
            Key::from_event(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Key::Backspace
        );
        assert_eq!(Key::from_event(press(KeyCode::Esc, KeyModifiers::NONE)), Key::Interrupt);
        assert_eq!(Key::from_event(press(KeyCode::Left, KeyModifiers::NONE)), Key::Ignored);
    }

    #[test]
    fn test_from_char_control_bytes() {
        assert_eq!(Key::from_char('\r'), Key::Enter);
        assert_eq!(Key::from_char('\n'), Key::Enter);
        assert_eq!(Key::from_char('\x7f'), Key::Backspace);
        assert_eq!(Key::from_char('\x08'), Key::Backspace);
        assert_eq!(Key::from_char('\x15'), Key::ClearLine);
        assert_eq!(Key::from_char('\x03'), Key::Interrupt);
        assert_eq!(Key::from_char('\t'), Key::Ignored);
        assert_eq!(Key::from_char('5'), Key::Char('5'));
        assert_eq!(Key::from_char('é'), Key::Char('é'));
    }
}
