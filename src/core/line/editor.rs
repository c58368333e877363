//! Input state machine
//!
//! Turns a raw byte stream from a serial link into edited lines, reading
//! the handful of VT100 editing keys a terminal sends:
//!
//! | sequence | effect |
//! |---|---|
//! | printable byte | insert at cursor |
//! | `BS` / `DEL` | delete before cursor |
//! | `CR` / `LF` | finish the line (a CRLF or LFCR pair counts once) |
//! | `ETX` (Ctrl+C) | discard the line |
//! | `ESC [ C` / `ESC [ D` | cursor right / left |
//! | `ESC [ A` / `ESC [ B` | accepted, no effect (no history) |
//! | `ESC [ 1 ~` / `ESC [ 4 ~` | home / end |
//! | `ESC [ 3 ~` | delete under cursor |
//!
//! Any other byte after `ESC`, or any other CSI final byte, ends the
//! sequence and is dropped.

use super::buffer::EditBuffer;
use super::echo::{Echo, EchoSink, BS};

const ETX: u8 = 0x03;
const ESC: u8 = 0x1B;
const DEL: u8 = 0x7F;

/// Escape parser position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Normal,
    /// `ESC` received
    Escape,
    /// `ESC [` received, collecting a decimal parameter
    Csi { param: u32 },
}

/// Per-session editor state.
///
/// One editor drives one [`EditBuffer`]. Calls must not overlap: finish
/// [`LineEditor::process_byte`] before feeding the next byte, and leave the
/// buffer alone while a call is running.
#[derive(Debug, Clone)]
pub struct LineEditor {
    mode: Mode,
    /// Last byte seen, for CR/LF pairing
    prev_byte: u8,
    /// Set after swallowing the second half of a CRLF/LFCR pair
    pair_latch: bool,
    echo_enabled: bool,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            prev_byte: 0,
            pair_latch: false,
            echo_enabled: true,
        }
    }

    pub fn echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    /// Switch echo on or off. Editing continues either way.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    /// Feed one byte.
    ///
    /// Returns true when the byte finished a line, either normally or by
    /// Ctrl+C. Check [`EditBuffer::is_ready`] to tell a line worth handling
    /// from a discarded or empty one.
    pub fn process_byte<S: EchoSink + ?Sized>(
        &mut self,
        byte: u8,
        buf: &mut EditBuffer,
        out: &mut S,
    ) -> bool {
        buf.clamp();

        let mut echo = Echo::new(out, self.echo_enabled);
        let done = match self.mode {
            Mode::Normal => self.normal(byte, buf, &mut echo),
            Mode::Escape => {
                self.escape(byte);
                false
            }
            Mode::Csi { param } => {
                self.csi(param, byte, buf, &mut echo);
                false
            }
        };

        self.prev_byte = byte;
        done
    }

    /// Feed a run of bytes, returning how many lines they completed
    #[allow(dead_code)]
    pub fn feed<S: EchoSink + ?Sized>(&mut self, bytes: &[u8], buf: &mut EditBuffer, out: &mut S) -> usize {
        let mut done = 0;
        for &byte in bytes {
            if self.process_byte(byte, buf, out) {
                done += 1;
            }
        }
        done
    }

    fn normal<S: EchoSink + ?Sized>(&mut self, byte: u8, buf: &mut EditBuffer, echo: &mut Echo<'_, S>) -> bool {
        match byte {
            ETX => {
                buf.discard();
                echo.newline();
                true
            }
            b'\r' | b'\n' => self.line_end(byte, buf, echo),
            DEL | BS => {
                buf.backspace(echo);
                false
            }
            ESC => {
                self.mode = Mode::Escape;
                false
            }
            0x00..=0x1F => false,
            _ => {
                buf.insert(byte, echo);
                false
            }
        }
    }

    /// CR or LF. The second byte of a CRLF or LFCR pair is swallowed once.
    fn line_end<S: EchoSink + ?Sized>(&mut self, byte: u8, buf: &mut EditBuffer, echo: &mut Echo<'_, S>) -> bool {
        let pairs_with_prev = (byte == b'\n' && self.prev_byte == b'\r')
            || (byte == b'\r' && self.prev_byte == b'\n');

        if self.pair_latch || !pairs_with_prev {
            buf.terminate();
            echo.newline();
            self.pair_latch = false;
            true
        } else {
            tracing::trace!(byte, "second half of line-end pair");
            self.pair_latch = true;
            false
        }
    }

    fn escape(&mut self, byte: u8) {
        if byte == b'[' {
            self.mode = Mode::Csi { param: 0 };
        } else {
            tracing::debug!("Aborted escape sequence: ESC {:?}", byte as char);
            self.leave_escape();
        }
    }

    fn csi<S: EchoSink + ?Sized>(&mut self, param: u32, byte: u8, buf: &mut EditBuffer, echo: &mut Echo<'_, S>) {
        match byte {
            b'0'..=b'9' => {
                let digit = u32::from(byte - b'0');
                self.mode = Mode::Csi {
                    param: param.saturating_mul(10).saturating_add(digit),
                };
                return;
            }
            // Up and down are accepted but there is no history to walk
            b'A' | b'B' => {}
            b'C' => buf.move_right(echo),
            b'D' => buf.move_left(echo),
            b'~' => match param {
                1 => buf.move_home(echo),
                3 => buf.delete(echo),
                4 => buf.move_end(echo),
                _ => tracing::debug!(param, "Ignoring CSI {}~", param),
            },
            _ => {
                tracing::debug!(param, "Unknown CSI final byte: {:?}", byte as char);
            }
        }
        self.leave_escape();
    }

    fn leave_escape(&mut self) {
        self.mode = Mode::Normal;
    }
}
