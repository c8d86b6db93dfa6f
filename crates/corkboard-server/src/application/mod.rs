//! Application layer for corkboard-server.
//!
//! The application layer owns the shared board and executes parsed
//! commands against it. It knows *what* each command does to the board,
//! but nothing about sockets or line framing — sessions hand it a
//! [`corkboard_core::Command`] and get a [`corkboard_core::Response`]
//! back.
//!
//! # What does NOT belong here?
//!
//! - Reading or writing sockets (that is infrastructure)
//! - Parsing command lines (that lives in `corkboard-core`)

pub mod dispatch;

pub use dispatch::{dispatch, shared_board, SharedBoard};
