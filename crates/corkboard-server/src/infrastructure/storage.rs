//! TOML configuration file loading.
//!
//! The server takes an optional `--config <file>` argument. The file is
//! plain TOML mirroring [`ServerConfig`]:
//!
//! ```toml
//! bind = "0.0.0.0"
//! port = 7878
//!
//! [board]
//! width = 200
//! height = 100
//! note_width = 20
//! note_height = 10
//! colors = ["red", "white"]
//! ```
//!
//! Missing keys fall back to their serde defaults, so a file may set only
//! what it cares about. Unlike an implicit per-user config file, a path
//! given explicitly on the command line is expected to exist: a missing
//! file is an error, not a silent fallback to defaults.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads a [`ServerConfig`] from the given TOML file.
///
/// Validation is the caller's job; this only reads and deserializes.
///
/// # Errors
///
/// Returns [`ConfigFileError::Io`] when the file cannot be read and
/// [`ConfigFileError::Parse`] when the TOML is malformed.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServerConfig = toml::from_str(&content)?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}
