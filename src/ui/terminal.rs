//! Interactive terminal link
//!
//! Puts the local terminal into raw mode and presents it as a
//! [`Transport`]: key presses come in as VT100 bytes, echo goes to stdout.

use std::io::{self, Stdout, Write};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

use super::keymapper::KeyMapper;
use crate::core::transport::{write_translated, Result, Transport, TransportError};

/// Restores cooked mode when dropped
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Keyboard in, stdout out
pub struct KeyTransport {
    stdout: Stdout,
    translate_newline: bool,
    /// Mapped bytes that did not fit the caller's buffer
    pending: Vec<u8>,
}

impl KeyTransport {
    pub fn new(translate_newline: bool) -> Self {
        Self {
            stdout: io::stdout(),
            translate_newline,
            pending: Vec::new(),
        }
    }

    /// Copy as much of `pending` as fits into `buf`
    fn drain_pending(&mut self, buf: &mut [u8]) -> usize {
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        n
    }
}

impl Transport for KeyTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.pending.is_empty() {
            return Ok(self.drain_pending(buf));
        }

        loop {
            match event::read().map_err(TransportError::Read)? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(bytes) = KeyMapper::map(&key) {
                        self.pending = bytes;
                        return Ok(self.drain_pending(buf));
                    }
                }
                _ => {}
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        write_translated(&mut self.stdout, data, self.translate_newline).map_err(TransportError::Write)
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().map_err(TransportError::Write)
    }
}
