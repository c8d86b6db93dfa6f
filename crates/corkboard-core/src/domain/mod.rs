//! Pure board domain: value types and the shared store.
//!
//! Nothing in this layer performs I/O or knows about the wire format; the
//! protocol module renders and parses these types.

pub mod board;
pub mod note;

pub use board::{Board, BoardConfig, BoardError, ConfigError, NoteFilter};
pub use note::{Note, Pin};
