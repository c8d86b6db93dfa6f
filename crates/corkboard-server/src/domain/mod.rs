//! Domain layer: configuration for the server process.
//!
//! The board rules themselves live in `corkboard-core`; this layer only
//! holds what is specific to running a server around them.

pub mod config;

pub use config::{ServerConfig, ServerConfigError};
