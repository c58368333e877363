//! Serial line editing: the edit buffer, its echo gate and the input
//! state machine that drives both.

pub mod buffer;
pub mod echo;
pub mod editor;

pub use buffer::EditBuffer;
pub use editor::LineEditor;
