//! Byte transport
//!
//! The editor neither knows nor cares where bytes come from: a UART, a
//! terminal in raw mode or a capture file. A [`Transport`] delivers raw
//! input and carries echo back out.

use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Raw byte link between the line editor and the terminal
pub trait Transport {
    /// Read whatever input is available. `Ok(0)` means the input has ended.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn write(&mut self, data: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Write `data`, turning each LF into CR LF when `translate_newline` is set.
///
/// Terminals in raw mode only move down on LF, so the carriage return has
/// to be supplied here.
pub fn write_translated<W: Write + ?Sized>(writer: &mut W, data: &[u8], translate_newline: bool) -> io::Result<()> {
    if !translate_newline {
        return writer.write_all(data);
    }

    for chunk in data.split_inclusive(|&b| b == b'\n') {
        match chunk.split_last() {
            Some((&b'\n', head)) => {
                writer.write_all(head)?;
                writer.write_all(b"\r\n")?;
            }
            _ => writer.write_all(chunk)?,
        }
    }
    Ok(())
}

/// Transport over any reader/writer pair (stdin/stdout, files, sockets)
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
    translate_newline: bool,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W, translate_newline: bool) -> Self {
        Self {
            reader,
            writer,
            translate_newline,
        }
    }

    /// Give back the writer, e.g. to inspect what was echoed
    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: Read, W: Write> Transport for StreamTransport<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.reader.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Read(e)),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        write_translated(&mut self.writer, data, self.translate_newline).map_err(TransportError::Write)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(TransportError::Write)
    }
}
