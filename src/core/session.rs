//! Session management
//!
//! Wires a transport to a line editor, handling echo and turning finished
//! lines into [`SessionEvent`]s for whoever consumes them.

use std::collections::VecDeque;

use super::line::{EditBuffer, LineEditor};
use super::transport::{Result, Transport};

/// Bytes pulled from the transport per read
const READ_CHUNK: usize = 256;

/// Session events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A line with content was entered
    Line(String),
    /// The line was cancelled with Ctrl+C, or was empty
    Discarded,
    /// Input has ended
    Closed,
}

/// A line-input session
pub struct Session<T> {
    editor: LineEditor,
    buffer: EditBuffer,
    transport: T,
    /// Bytes read but not yet fed to the editor
    inbox: VecDeque<u8>,
    /// Echo produced by the byte being processed
    echo: Vec<u8>,
    prompt: String,
}

impl<T: Transport> Session<T> {
    /// Create a new session
    pub fn new(transport: T, capacity: usize, prompt: impl Into<String>) -> Self {
        Self {
            editor: LineEditor::new(),
            buffer: EditBuffer::new(capacity),
            transport,
            inbox: VecDeque::with_capacity(READ_CHUNK),
            echo: Vec::with_capacity(capacity * 2),
            prompt: prompt.into(),
        }
    }

    pub fn echo_enabled(&self) -> bool {
        self.editor.echo_enabled()
    }

    pub fn set_echo(&mut self, enabled: bool) {
        tracing::info!(enabled, "echo switched");
        self.editor.set_echo(enabled);
    }

    /// Current (unfinished) line
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Print the prompt
    pub fn prompt(&mut self) -> Result<()> {
        self.transport.write(self.prompt.as_bytes())?;
        self.transport.flush()
    }

    /// Print a line of consumer output
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.transport.write(text.as_bytes())?;
        self.transport.write(b"\n")?;
        self.transport.flush()
    }

    /// Block until the next line is finished or input ends
    pub fn poll(&mut self) -> Result<SessionEvent> {
        loop {
            while let Some(byte) = self.inbox.pop_front() {
                if let Some(event) = self.feed_byte(byte)? {
                    return Ok(event);
                }
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = self.transport.read(&mut chunk)?;
            if n == 0 {
                tracing::info!("input closed");
                return Ok(SessionEvent::Closed);
            }
            self.inbox.extend(&chunk[..n]);
        }
    }

    /// Run one byte through the editor and send its echo.
    ///
    /// A finished line is consumed here, leaving the buffer empty for the
    /// next one.
    pub fn feed_byte(&mut self, byte: u8) -> Result<Option<SessionEvent>> {
        self.echo.clear();
        let done = self.editor.process_byte(byte, &mut self.buffer, &mut self.echo);

        if !self.echo.is_empty() {
            self.transport.write(&self.echo)?;
            self.transport.flush()?;
        }

        if !done {
            return Ok(None);
        }

        let event = if self.buffer.is_ready() {
            SessionEvent::Line(self.buffer.as_str_lossy().into_owned())
        } else {
            SessionEvent::Discarded
        };
        self.buffer.clear();

        tracing::debug!(?event, "line finished");
        Ok(Some(event))
    }

    /// Feed a run of bytes, collecting the events they produce
    #[cfg(test)]
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Vec<SessionEvent>> {
        let mut events = Vec::new();
        for &byte in bytes {
            if let Some(event) = self.feed_byte(byte)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    #[cfg(test)]
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::StreamTransport;
    use std::io;

    fn session(input: &'static [u8]) -> Session<StreamTransport<&'static [u8], Vec<u8>>> {
        Session::new(StreamTransport::new(input, Vec::<u8>::new(), false), 64, "> ")
    }

    #[test]
    fn test_poll_lines() {
        let mut session = session(b"one\r\ntwo\n\x03\r");

        assert_eq!(session.poll().unwrap(), SessionEvent::Line("one".to_string()));
        assert_eq!(session.poll().unwrap(), SessionEvent::Line("two".to_string()));
        assert_eq!(session.poll().unwrap(), SessionEvent::Discarded);
        assert_eq!(session.poll().unwrap(), SessionEvent::Discarded);
        assert_eq!(session.poll().unwrap(), SessionEvent::Closed);
    }

    #[test]
    fn test_unfinished_line_stays_in_buffer() {
        let mut session = session(b"abc");

        assert_eq!(session.poll().unwrap(), SessionEvent::Closed);
        assert_eq!(session.buffer().line(), b"abc");
    }

    #[test]
    fn test_echo_and_output() {
        let mut session = session(b"");
        session.prompt().unwrap();
        let events = session.feed_bytes(b"hi\r").unwrap();
        session.write_line("=> hi").unwrap();

        assert_eq!(events, vec![SessionEvent::Line("hi".to_string())]);
        assert_eq!(session.into_transport().into_writer(), b"> hi\n=> hi\n");
    }

    #[test]
    fn test_echo_off() {
        let mut session = session(b"");
        session.set_echo(false);
        assert!(!session.echo_enabled());

        let events = session.feed_bytes(b"secret\r").unwrap();

        assert_eq!(events, vec![SessionEvent::Line("secret".to_string())]);
        assert!(session.into_transport().into_writer().is_empty());
    }

    #[test]
    fn test_buffer_cleared_after_line() {
        let mut session = session(b"");
        session.feed_bytes(b"first\r").unwrap();

        assert!(session.buffer().is_empty());
        assert!(!session.buffer().is_ready());

        let events = session.feed_bytes(b"second\n").unwrap();
        assert_eq!(events, vec![SessionEvent::Line("second".to_string())]);
    }

    #[test]
    fn test_read_error_propagates() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "link down"))
            }
        }

        let mut session = Session::new(StreamTransport::new(Broken, io::sink(), false), 16, "");
        assert!(session.poll().is_err());
    }
}
