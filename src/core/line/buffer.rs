//! Fixed-capacity edit buffer
//!
//! Holds the line under construction together with its logical cursor.
//! The storage is allocated once by the owner; every edit operation works
//! in place and keeps the terminal's visible line in step with the logical
//! content through [`EditBuffer::reprint`].

use std::borrow::Cow;

use super::echo::{Echo, EchoSink};

/// Sentinel written after the last valid byte
const SENTINEL: u8 = 0;

/// Line storage shared between the editor and its owner.
///
/// `cursor <= len <= capacity - 1` holds between calls; the last slot is
/// reserved for the sentinel.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    pub(crate) storage: Box<[u8]>,
    pub(crate) length: usize,
    pub(crate) cursor: usize,
    pub(crate) ready: bool,
}

impl EditBuffer {
    /// Create a buffer with room for `capacity - 1` bytes plus the sentinel.
    ///
    /// A capacity of zero is raised to one (a buffer that only ever holds
    /// empty lines).
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![SENTINEL; capacity.max(1)].into_boxed_slice(),
            length: 0,
            cursor: 0,
            ready: false,
        }
    }

    /// Total capacity including the sentinel slot
    #[allow(dead_code)]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of valid bytes
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Logical edit position
    #[allow(dead_code)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once a terminated line with content is waiting to be consumed
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The valid bytes of the current line
    pub fn line(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.line())
    }

    /// Consume the line: empty the buffer and drop the ready flag
    pub fn clear(&mut self) {
        self.length = 0;
        self.cursor = 0;
        self.ready = false;
        self.storage[0] = SENTINEL;
    }

    /// Highest value `length` may take
    fn limit(&self) -> usize {
        self.storage.len() - 1
    }

    /// Pull `length` and `cursor` back into range.
    ///
    /// Runs on every byte before anything else touches the buffer.
    pub(crate) fn clamp(&mut self) {
        let limit = self.limit();
        if self.length > limit {
            tracing::warn!(length = self.length, limit, "edit buffer length out of range, clamping");
            self.length = limit;
            self.storage[limit] = SENTINEL;
        }
        if self.cursor > self.length {
            tracing::warn!(cursor = self.cursor, length = self.length, "cursor out of range, clamping");
            self.cursor = self.length;
        }
    }

    /// Insert a byte at the cursor. Dropped silently when full.
    pub(crate) fn insert<S: EchoSink + ?Sized>(&mut self, byte: u8, echo: &mut Echo<'_, S>) {
        if self.length >= self.limit() {
            tracing::trace!(byte, "edit buffer full, dropping byte");
            return;
        }

        self.storage.copy_within(self.cursor..self.length, self.cursor + 1);
        self.storage[self.cursor] = byte;
        self.cursor += 1;
        self.length += 1;
        self.storage[self.length] = SENTINEL;

        echo.byte(byte);
        if self.cursor != self.length {
            self.reprint(0, echo);
        }
    }

    /// Remove the byte before the cursor
    pub(crate) fn backspace<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        if self.cursor == 0 {
            return;
        }

        self.storage.copy_within(self.cursor..self.length, self.cursor - 1);
        self.cursor -= 1;
        self.length -= 1;
        self.storage[self.length] = SENTINEL;

        echo.backspace();
        self.reprint(1, echo);
    }

    /// Remove the byte under the cursor
    pub(crate) fn delete<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        if self.cursor >= self.length {
            return;
        }

        self.storage.copy_within(self.cursor + 1..self.length, self.cursor);
        self.length -= 1;
        self.storage[self.length] = SENTINEL;

        self.reprint(1, echo);
    }

    /// Redraw from the cursor to the end of the line.
    ///
    /// `padding` spaces blank out glyphs left behind by a shrinking line,
    /// then backspaces walk the terminal cursor back to the logical one.
    pub(crate) fn reprint<S: EchoSink + ?Sized>(&self, padding: usize, echo: &mut Echo<'_, S>) {
        echo.bytes(&self.storage[self.cursor..self.length]);
        echo.repeat(b' ', padding);
        echo.backspaces(self.length - self.cursor + padding);
    }

    pub(crate) fn move_left<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        if self.cursor > 0 {
            self.cursor -= 1;
            echo.backspace();
        }
    }

    pub(crate) fn move_right<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        if self.cursor < self.length {
            echo.byte(self.storage[self.cursor]);
            self.cursor += 1;
        }
    }

    pub(crate) fn move_home<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        echo.backspaces(self.cursor);
        self.cursor = 0;
    }

    pub(crate) fn move_end<S: EchoSink + ?Sized>(&mut self, echo: &mut Echo<'_, S>) {
        echo.bytes(&self.storage[self.cursor..self.length]);
        self.cursor = self.length;
    }

    /// Close the line. Content stays readable until [`EditBuffer::clear`].
    pub(crate) fn terminate(&mut self) {
        self.storage[self.length] = SENTINEL;
        self.ready = self.length > 0;
        self.cursor = 0;
    }

    /// Throw the line away (Ctrl+C)
    pub(crate) fn discard(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(content: &[u8], cursor: usize, capacity: usize) -> EditBuffer {
        let mut buf = EditBuffer::new(capacity);
        buf.storage[..content.len()].copy_from_slice(content);
        buf.length = content.len();
        buf.cursor = cursor;
        buf
    }

    #[test]
    fn test_insert_at_tail() {
        let mut buf = EditBuffer::new(8);
        let mut out: Vec<u8> = Vec::new();
        let mut echo = Echo::new(&mut out, true);

        buf.insert(b'a', &mut echo);
        buf.insert(b'b', &mut echo);

        assert_eq!(buf.line(), b"ab");
        assert_eq!(buf.cursor(), 2);
        assert_eq!(out, b"ab");
    }

    #[test]
    fn test_insert_mid_line_redraws_tail() {
        let mut buf = buffer_with(b"abc", 1, 16);
        let mut out: Vec<u8> = Vec::new();

        buf.insert(b'X', &mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"aXbc");
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.storage[4], SENTINEL);
        // Inserted byte, tail "bc", then back over the tail
        assert_eq!(out, b"Xbc\x08\x08");
    }

    #[test]
    fn test_insert_when_full_is_dropped() {
        let mut buf = buffer_with(b"abc", 3, 4);
        let mut out: Vec<u8> = Vec::new();

        buf.insert(b'd', &mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"abc");
        assert_eq!(buf.cursor(), 3);
        assert!(out.is_empty());
    }

    #[test]
    fn test_delete_mid_line() {
        let mut buf = buffer_with(b"abc", 1, 16);
        let mut out: Vec<u8> = Vec::new();

        buf.delete(&mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"ac");
        assert_eq!(buf.cursor(), 1);
        assert_eq!(out, b"c \x08\x08");
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut buf = buffer_with(b"abc", 3, 16);
        let mut out: Vec<u8> = Vec::new();

        buf.delete(&mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"abc");
        assert!(out.is_empty());
    }

    #[test]
    fn test_backspace_mid_line() {
        let mut buf = buffer_with(b"abcd", 2, 16);
        let mut out: Vec<u8> = Vec::new();

        buf.backspace(&mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"acd");
        assert_eq!(buf.cursor(), 1);
        assert_eq!(out, b"\x08cd \x08\x08\x08");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = buffer_with(b"ab", 0, 16);
        let mut out: Vec<u8> = Vec::new();

        buf.backspace(&mut Echo::new(&mut out, true));

        assert_eq!(buf.line(), b"ab");
        assert!(out.is_empty());
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = buffer_with(b"hello", 3, 16);
        let mut out: Vec<u8> = Vec::new();
        let mut echo = Echo::new(&mut out, true);

        buf.move_home(&mut echo);
        assert_eq!(buf.cursor(), 0);
        buf.move_end(&mut echo);
        assert_eq!(buf.cursor(), 5);

        assert_eq!(out, b"\x08\x08\x08hello");
    }

    #[test]
    fn test_clamp_repairs_corrupted_bounds() {
        let mut buf = EditBuffer::new(4);
        buf.length = 10;
        buf.cursor = 12;

        buf.clamp();

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.storage[3], SENTINEL);
    }

    #[test]
    fn test_terminate_keeps_content() {
        let mut buf = buffer_with(b"hi", 1, 8);

        buf.terminate();

        assert!(buf.is_ready());
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.as_str_lossy(), "hi");

        buf.clear();
        assert!(!buf.is_ready());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let buf = EditBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
    }
}
