//! # corkboard-core
//!
//! Shared library for Corkboard containing the board domain model and the
//! line-oriented wire protocol.
//!
//! This crate is used by both the server and the terminal client. It has no
//! dependencies on sockets, the async runtime, or any OS API.
//!
//! # Architecture overview
//!
//! Corkboard is a networked bulletin board: many clients connect to one
//! server and share a single rectangular board. Clients post fixed-size
//! colored notes, pin them down, query them by filter, and shake the board
//! to drop everything that is not pinned.
//!
//! This crate defines the two layers everything else builds on:
//!
//! - **`domain`** – The board itself: [`Note`] and [`Pin`] value types with
//!   the half-open containment rule, and [`Board`], the insertion-ordered
//!   store whose operations are atomic once the caller serializes access
//!   behind a mutex.
//!
//! - **`protocol`** – How lines travel over the wire: [`parse_command`]
//!   turns a received line into a typed [`Command`], [`Response`] renders a
//!   result back into its `OK …`/`ERROR …` block, and [`Hello`] is the
//!   one-line handshake announcing board geometry and the color palette.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `corkboard_core::Board` instead of `corkboard_core::domain::board::Board`.
pub use domain::board::{Board, BoardConfig, BoardError, ConfigError, NoteFilter};
pub use domain::note::{Note, Pin};
pub use protocol::command::{parse_command, Command, CommandError, PinVerb};
pub use protocol::handshake::{HandshakeError, Hello};
pub use protocol::response::{
    parse_pin_line, ErrorCode, NoteEntry, ReplyHeader, Response, ResponseError,
};
