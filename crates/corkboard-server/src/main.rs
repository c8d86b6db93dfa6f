//! Corkboard bulletin-board server — entry point.
//!
//! This binary hosts one shared bulletin board over TCP. Clients connect
//! with any line-oriented tool (a dedicated client, netcat, telnet),
//! receive a `HELLO` greeting describing the board, and then issue plain
//! text commands: `POST`, `GET`, `PIN`, `UNPIN`, `SHAKE`, `CLEAR`,
//! `DISCONNECT`.
//!
//! # Usage
//!
//! ```text
//! corkboard-server [PORT] [BOARD_WIDTH] [BOARD_HEIGHT] [NOTE_WIDTH] [NOTE_HEIGHT] [COLORS]...
//!
//! Arguments:
//!   [PORT]          Listening port [default: 7878]
//!   [BOARD_WIDTH]   Board width in units [default: 200]
//!   [BOARD_HEIGHT]  Board height in units [default: 100]
//!   [NOTE_WIDTH]    Note width in units [default: 20]
//!   [NOTE_HEIGHT]   Note height in units [default: 10]
//!   [COLORS]...     Accepted note colors [default: red green blue yellow white]
//!
//! Options:
//!   --bind <ADDR>    IP address to bind the listener to [default: 0.0.0.0]
//!   --config <FILE>  TOML configuration file; explicit arguments override it
//! ```
//!
//! So `corkboard-server 7070 300 200 30 15 red white` serves a 300x200
//! board of 30x15 notes in two colors on port 7070.
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable           | Description                          |
//! |--------------------|--------------------------------------|
//! | `CORKBOARD_BIND`   | IP address to bind the listener to   |
//! | `CORKBOARD_CONFIG` | Path to the TOML configuration file  |
//! | `RUST_LOG`         | Log filter (e.g. `debug`)            |
//!
//! # Architecture overview
//!
//! ```text
//! Clients  (newline-delimited text over TCP)
//!       ↕
//! corkboard-server  ← this process
//!   domain/         ServerConfig
//!   application/    Command execution against the shared Board
//!   infrastructure/
//!     tcp_server/   Accept loop, one task per client
//!     session/      HELLO handshake + command loop
//!     storage/      TOML config loading
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use corkboard_core::Board;
use corkboard_server::application::shared_board;
use corkboard_server::domain::ServerConfig;
use corkboard_server::infrastructure::{load_server_config, run_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Corkboard bulletin-board server.
///
/// Hosts one shared board over TCP for any number of line-oriented
/// clients.
///
/// Every positional argument is optional: anything omitted falls back to
/// the `--config` file (when given) and then to built-in defaults, so
/// `corkboard-server` with no arguments serves a 200x100 board on port
/// 7878.
#[derive(Debug, Parser)]
#[command(
    name = "corkboard-server",
    about = "Shared bulletin-board server speaking a newline-delimited text protocol",
    version
)]
struct Cli {
    /// Listening port.
    #[arg(value_name = "PORT")]
    port: Option<u16>,

    /// Board width in units.
    #[arg(value_name = "BOARD_WIDTH")]
    board_width: Option<u32>,

    /// Board height in units.
    #[arg(value_name = "BOARD_HEIGHT")]
    board_height: Option<u32>,

    /// Width of every note in units.
    #[arg(value_name = "NOTE_WIDTH")]
    note_width: Option<u32>,

    /// Height of every note in units.
    #[arg(value_name = "NOTE_HEIGHT")]
    note_height: Option<u32>,

    /// Accepted note colors, announced to clients in this order.
    #[arg(value_name = "COLORS")]
    colors: Vec<String>,

    /// IP address to bind the listener to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local connections.
    #[arg(long, value_name = "ADDR", env = "CORKBOARD_BIND")]
    bind: Option<String>,

    /// TOML configuration file; explicit arguments override its values.
    #[arg(long, value_name = "FILE", env = "CORKBOARD_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Merges the configuration sources into one [`ServerConfig`].
    ///
    /// Precedence, lowest to highest: built-in defaults, the `--config`
    /// file, explicit CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, if
    /// `--bind` is not a valid IP address, or if the merged configuration
    /// fails validation (e.g. notes larger than the board).
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => load_server_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.bind = bind
                .parse::<IpAddr>()
                .with_context(|| format!("invalid bind address: '{bind}'"))?;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(width) = self.board_width {
            config.board.width = width;
        }
        if let Some(height) = self.board_height {
            config.board.height = height;
        }
        if let Some(note_width) = self.note_width {
            config.board.note_width = note_width;
        }
        if let Some(note_height) = self.note_height {
            config.board.note_height = note_height;
        }
        if !self.colors.is_empty() {
            config.board.colors = self.colors;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised to format log output.  The log
///    level is controlled by the `RUST_LOG` environment variable (e.g.,
///    `RUST_LOG=debug`).
/// 2. CLI arguments are parsed with `clap` into a [`Cli`] struct.
/// 3. A [`ServerConfig`] is merged from defaults, the optional config
///    file, and the CLI arguments, then validated.
/// 4. The shared board is created from the validated board settings.
/// 5. A Ctrl+C handler is spawned; it clears a shared `AtomicBool` when
///    the user interrupts the process.
/// 6. [`run_server`] binds the listener and accepts clients until the
///    shutdown flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `EnvFilter::try_from_default_env()` reads the `RUST_LOG` environment
    // variable.  If it is absent or invalid, we fall back to `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Parse CLI arguments ───────────────────────────────────────────────────
    let cli = Cli::parse();
    let config = cli.into_server_config()?;

    info!(
        "corkboard server starting — {}x{} board, {}x{} notes, colors: {}",
        config.board.width,
        config.board.height,
        config.board.note_width,
        config.board.note_height,
        config.board.colors.join(" ")
    );

    let board = shared_board(Board::new(config.board.clone()));

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    //
    // The accept loop checks this flag every 200 ms and exits cleanly once
    // it is cleared.  `Relaxed` ordering is enough: the value only needs to
    // eventually propagate.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Main server loop ──────────────────────────────────────────────────────
    run_server(&config, board, running).await?;

    info!("corkboard server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
