//! Local terminal input handling.
//!
//! - **keymapper**: Keyboard input to VT100 byte sequence mapping
//! - **terminal**: Raw mode guard and the keyboard/stdout transport
//!
//! The interactive console stands in for a serial terminal: keys are
//! encoded exactly as a VT100 would send them over the wire.

pub mod keymapper;
pub mod terminal;

pub use terminal::{KeyTransport, RawModeGuard};
