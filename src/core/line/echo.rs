//! Echo output
//!
//! Everything the editor sends back to the terminal goes through an
//! [`Echo`], which drops the bytes when echo is switched off. Buffer edits
//! happen either way.

/// Backspace control byte
pub const BS: u8 = 0x08;

/// Destination for echoed bytes
pub trait EchoSink {
    fn put(&mut self, byte: u8);

    fn put_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put(byte);
        }
    }
}

impl EchoSink for Vec<u8> {
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }

    fn put_all(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: EchoSink + ?Sized> EchoSink for &mut S {
    fn put(&mut self, byte: u8) {
        (**self).put(byte);
    }

    fn put_all(&mut self, bytes: &[u8]) {
        (**self).put_all(bytes);
    }
}

/// Sink that throws everything away
#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl EchoSink for Discard {
    fn put(&mut self, _byte: u8) {}
}

/// Echo gate around a sink
pub struct Echo<'a, S: ?Sized> {
    sink: &'a mut S,
    enabled: bool,
}

impl<'a, S: EchoSink + ?Sized> Echo<'a, S> {
    pub fn new(sink: &'a mut S, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub fn byte(&mut self, byte: u8) {
        if self.enabled {
            self.sink.put(byte);
        }
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        if self.enabled && !bytes.is_empty() {
            self.sink.put_all(bytes);
        }
    }

    /// Send `byte` `count` times
    pub fn repeat(&mut self, byte: u8, count: usize) {
        if self.enabled {
            for _ in 0..count {
                self.sink.put(byte);
            }
        }
    }

    pub fn backspace(&mut self) {
        self.byte(BS);
    }

    pub fn backspaces(&mut self, count: usize) {
        self.repeat(BS, count);
    }

    pub fn newline(&mut self) {
        self.byte(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_echo_writes() {
        let mut out: Vec<u8> = Vec::new();
        let mut echo = Echo::new(&mut out, true);
        echo.byte(b'x');
        echo.repeat(b' ', 2);
        echo.backspaces(3);
        echo.newline();
        assert_eq!(out, b"x  \x08\x08\x08\n");
    }

    #[test]
    fn test_disabled_echo_is_silent() {
        let mut out: Vec<u8> = Vec::new();
        let mut echo = Echo::new(&mut out, false);
        echo.byte(b'x');
        echo.bytes(b"abc");
        echo.backspaces(3);
        echo.newline();
        assert!(out.is_empty());
    }
}
