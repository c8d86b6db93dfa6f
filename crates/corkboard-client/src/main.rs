//! Corkboard terminal client — entry point.
//!
//! Connects to a board server, prints the announced board geometry, and
//! then reads protocol commands from stdin, one per line, echoing each
//! reply exactly as the server worded it.
//!
//! # Usage
//!
//! ```text
//! corkboard-client [OPTIONS]
//!
//! Options:
//!   --host <HOST>  Server hostname or IP address [default: 127.0.0.1]
//!   --port <PORT>  Server port [default: 7878]
//! ```
//!
//! # Example session
//!
//! ```text
//! connected to 127.0.0.1:7878 — 200x100 board, 20x10 notes
//! colors: red white
//! > POST 0 0 red hello world
//! OK NOTE_POSTED
//! > PIN 5 5
//! OK PIN_ADDED
//! > GET
//! OK 1
//! NOTE 0 0 red hello world PINNED=true
//! > DISCONNECT
//! OK GOODBYE
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable         | Default     | Description               |
//! |------------------|-------------|---------------------------|
//! | `CORKBOARD_HOST` | `127.0.0.1` | Server hostname or IP     |
//! | `CORKBOARD_PORT` | `7878`      | Server port               |
//! | `RUST_LOG`       | `info`      | Log filter (to stderr)    |

use std::io::Write as _;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use corkboard_client::BoardClient;
use corkboard_core::{parse_command, Command};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Interactive terminal client for a Corkboard bulletin-board server.
///
/// Commands are validated locally before being sent, so a typo earns the
/// same wording the server would use without a round trip.
#[derive(Debug, Parser)]
#[command(
    name = "corkboard-client",
    about = "Interactive terminal client for a Corkboard server",
    version
)]
struct Cli {
    /// Server hostname or IP address.
    #[arg(long, default_value = "127.0.0.1", env = "CORKBOARD_HOST")]
    host: String,

    /// Server port.
    #[arg(long, default_value_t = 7878, env = "CORKBOARD_PORT")]
    port: u16,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Replies belong on stdout; logs go to stderr so piping the session
    // transcript stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    let mut client = BoardClient::connect(&addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;

    let info = client.board_info();
    println!(
        "connected to {addr} — {}x{} board, {}x{} notes",
        info.board_width, info.board_height, info.note_width, info.note_height
    );
    println!("colors: {}", info.colors.join(" "));
    println!("commands: POST, GET, GET PINS, PIN, UNPIN, SHAKE, CLEAR, DISCONNECT");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut said_goodbye = false;

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            // stdin closed (Ctrl+D or end of a piped script).
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Validate locally; the shared parser produces the exact wording
        // the server would have sent back.
        let parsed = parse_command(trimmed);
        if let Err(error) = &parsed {
            println!("ERROR INVALID_FORMAT {error}");
            continue;
        }

        for reply_line in client.send_line(trimmed).await? {
            println!("{reply_line}");
        }

        if matches!(parsed, Ok(Command::Disconnect)) {
            said_goodbye = true;
            break;
        }
    }

    if !said_goodbye {
        // Part politely even when the user just closed stdin.
        let _ = client.disconnect().await;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
