//! corkboard-server library crate.
//!
//! This crate hosts one shared bulletin board behind a TCP listener. Any
//! number of line-oriented clients connect, receive a `HELLO` greeting
//! describing the board, and then issue commands that post, pin, query,
//! shake, and clear notes.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Clients (newline-delimited text over TCP)
//!         ↕
//! [corkboard-server]
//!   ├── domain/           Pure types: ServerConfig
//!   ├── application/      Command execution against the shared Board
//!   └── infrastructure/
//!         ├── tcp_server/  Accept loop (one Tokio task per client)
//!         ├── session/     HELLO handshake + read/reply loop
//!         └── storage/     TOML config file loading
//! ```
//!
//! Board rules and the line protocol itself live in `corkboard-core`; this
//! crate wires them to real sockets.
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain`, `corkboard-core`, and Tokio's sync
//!   primitives only — it guards the board but never touches a socket.
//! - `infrastructure` depends on all other layers plus the rest of `tokio`.
//!
//! # For beginners: why this structure?
//!
//! Clean architecture separates *what the program does* (domain +
//! application) from *how it does it* (infrastructure).  This keeps the
//! board behavior testable without a real network, and lets the transport
//! change (sockets, in-memory pipes in tests) without touching command
//! execution.

/// Domain layer: pure configuration types (no I/O).
pub mod domain;

/// Application layer: command execution against the shared board.
pub mod application;

/// Infrastructure layer: TCP listener, sessions, and config files.
pub mod infrastructure;
