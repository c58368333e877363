//! Key mapping for terminal input
//!
//! Converts key events to the bytes a VT100 terminal would put on the
//! serial line, so the interactive console exercises the same byte path
//! as a real link.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Key mapper for converting key events to bytes
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to line bytes.
    ///
    /// Keys with no VT100 encoding the line editor understands (function
    /// keys, media keys) map to `None`.
    pub fn map(event: &KeyEvent) -> Option<Vec<u8>> {
        let mods = Modifiers::from(event.modifiers);

        match event.code {
            // Character keys
            KeyCode::Char(ch) => Some(Self::map_char(ch, mods)),

            KeyCode::Enter => Some(vec![0x0D]),

            KeyCode::Backspace => Some(vec![0x7F]),

            KeyCode::Tab => Some(vec![0x09]),

            KeyCode::Esc => Some(vec![0x1B]),

            // Arrow keys: modifiers are dropped, the editor only reads the plain form
            KeyCode::Up => Some(Self::arrow_key(b'A')),
            KeyCode::Down => Some(Self::arrow_key(b'B')),
            KeyCode::Right => Some(Self::arrow_key(b'C')),
            KeyCode::Left => Some(Self::arrow_key(b'D')),

            // Navigation keys, VT220 style
            KeyCode::Home => Some(Self::tilde_key(1)),
            KeyCode::Insert => Some(Self::tilde_key(2)),
            KeyCode::Delete => Some(Self::tilde_key(3)),
            KeyCode::End => Some(Self::tilde_key(4)),
            KeyCode::PageUp => Some(Self::tilde_key(5)),
            KeyCode::PageDown => Some(Self::tilde_key(6)),

            _ => None,
        }
    }

    /// Map a character with modifiers
    fn map_char(ch: char, mods: Modifiers) -> Vec<u8> {
        // Ctrl + letter = control character
        if mods.contains(Modifiers::CTRL) && !mods.contains(Modifiers::ALT) {
            if ch.is_ascii_lowercase() {
                return vec![(ch as u8) - b'a' + 1];
            } else if ch.is_ascii_uppercase() {
                return vec![(ch as u8) - b'A' + 1];
            }
            match ch {
                '@' | '`' | ' ' => return vec![0x00], // Ctrl+@ = NUL
                '[' => return vec![0x1B],             // Ctrl+[ = ESC
                '\\' => return vec![0x1C],            // Ctrl+\ = FS
                ']' => return vec![0x1D],             // Ctrl+] = GS
                '^' | '~' => return vec![0x1E],       // Ctrl+^ = RS
                '_' | '?' => return vec![0x1F],       // Ctrl+_ = US
                _ => {}
            }
        }

        // Alt + key = ESC + key
        if mods.contains(Modifiers::ALT) && !mods.contains(Modifiers::CTRL) {
            let mut bytes = vec![0x1B];
            bytes.extend(ch.to_string().as_bytes());
            return bytes;
        }

        // Normal character
        ch.to_string().into_bytes()
    }

    /// Arrow key sequence: ESC [ <key>
    fn arrow_key(key: u8) -> Vec<u8> {
        vec![0x1B, b'[', key]
    }

    /// Tilde key sequence: ESC [ <code> ~
    fn tilde_key(code: u8) -> Vec<u8> {
        format!("\x1b[{}~", code).into_bytes()
    }
}
