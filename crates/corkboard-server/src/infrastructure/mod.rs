//! Infrastructure layer: everything that touches the outside world.
//!
//! - [`tcp_server`] — the TCP listener and accept loop
//! - [`session`] — the per-connection read/reply loop
//! - [`storage`] — TOML configuration file loading

pub mod session;
pub mod storage;
pub mod tcp_server;

pub use storage::{load_server_config, ConfigFileError};
pub use tcp_server::{run_server, serve};
