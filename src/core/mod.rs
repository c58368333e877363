//! Core line-input components.
//!
//! This module contains everything between the byte stream and a
//! finished line:
//!
//! - **line**: edit buffer, echo gate and the input state machine
//! - **transport**: byte source/sink the session reads from and echoes to
//! - **session**: High-level session combining transport + line editor
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── Transport (raw bytes in, echo out)
//! ├── LineEditor (escape parser + CR/LF pairing)
//! └── EditBuffer (fixed capacity line + cursor)
//! ```

pub mod line;
pub mod session;
pub mod transport;
