//! The `HELLO` line a server sends immediately after accepting a connection.
//!
//! Format: `HELLO <boardWidth> <boardHeight> <noteWidth> <noteHeight>
//! <color1> [<color2> ...]`. It is the only unsolicited message in the
//! protocol; everything a client needs to validate its own input locally
//! (geometry and palette) arrives here.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::board::BoardConfig;

/// Board geometry and palette announced to every client on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    pub board_width: u32,
    pub board_height: u32,
    pub note_width: u32,
    pub note_height: u32,
    /// At least one color; order matches the server configuration.
    pub colors: Vec<String>,
}

/// Failures when reading a handshake line on the client side.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    /// The line does not start with `HELLO `.
    #[error("expected a HELLO line, got: {0:?}")]
    NotHello(String),

    /// Fewer than four dimensions plus one color.
    #[error("handshake is missing fields: {0:?}")]
    MissingFields(String),

    /// A dimension token is not an unsigned integer.
    #[error("handshake dimension is not an integer: {0:?}")]
    InvalidDimension(String),
}

impl From<&BoardConfig> for Hello {
    fn from(config: &BoardConfig) -> Self {
        Self {
            board_width: config.width,
            board_height: config.height,
            note_width: config.note_width,
            note_height: config.note_height,
            colors: config.colors.clone(),
        }
    }
}

impl fmt::Display for Hello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HELLO {} {} {} {}",
            self.board_width, self.board_height, self.note_width, self.note_height
        )?;
        for color in &self.colors {
            write!(f, " {color}")?;
        }
        Ok(())
    }
}

impl FromStr for Hello {
    type Err = HandshakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let rest = line
            .strip_prefix("HELLO ")
            .ok_or_else(|| HandshakeError::NotHello(line.to_string()))?;

        let mut tokens = rest.split(' ');
        let mut dimension = || -> Result<u32, HandshakeError> {
            let token = tokens
                .next()
                .ok_or_else(|| HandshakeError::MissingFields(line.to_string()))?;
            token
                .parse()
                .map_err(|_| HandshakeError::InvalidDimension(token.to_string()))
        };

        let board_width = dimension()?;
        let board_height = dimension()?;
        let note_width = dimension()?;
        let note_height = dimension()?;

        let colors: Vec<String> = tokens.map(|t| t.to_string()).collect();
        if colors.is_empty() {
            return Err(HandshakeError::MissingFields(line.to_string()));
        }

        Ok(Self {
            board_width,
            board_height,
            note_width,
            note_height,
            colors,
        })
    }
}
