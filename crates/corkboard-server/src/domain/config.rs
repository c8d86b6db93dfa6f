//! Server configuration.
//!
//! [`ServerConfig`] is the merged view of every knob the server honors:
//! listener address, port, and the board geometry/palette it hands to
//! [`corkboard_core::Board`]. Values come from (lowest to highest
//! precedence) built-in defaults, an optional TOML file, then explicit
//! command-line arguments.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use corkboard_core::{BoardConfig, ConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    7878
}

/// Errors produced by [`ServerConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerConfigError {
    /// Port 0 would ask the OS for an ephemeral port, which clients cannot
    /// predict.
    #[error("port must be between 1 and 65535")]
    ReservedPort,

    /// The board section failed its own validation.
    #[error("invalid board configuration: {0}")]
    Board(#[from] ConfigError),
}

/// Complete runtime settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the TCP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    /// Listening port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Board geometry and note palette announced to every client.
    #[serde(default)]
    pub board: BoardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            board: BoardConfig::default(),
        }
    }
}

impl ServerConfig {
    /// The full address the listener should bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Checks the settings for internal consistency.
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.port == 0 {
            return Err(ServerConfigError::ReservedPort);
        }
        self.board.validate()?;
        Ok(())
    }
}
