//! The line-oriented wire protocol.
//!
//! Three message families cross the socket, all newline-delimited text:
//!
//! - [`handshake::Hello`] — sent once by the server on connect.
//! - [`command::Command`] — one per client line.
//! - [`response::Response`] — one block per non-empty command.

pub mod command;
pub mod handshake;
pub mod response;

pub use command::{parse_command, Command, CommandError, PinVerb};
pub use handshake::{HandshakeError, Hello};
pub use response::{parse_pin_line, ErrorCode, NoteEntry, ReplyHeader, Response, ResponseError};
