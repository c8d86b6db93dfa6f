//! Per-connection session: the handshake and the command loop.
//!
//! Each accepted TCP connection gets one session task. The session
//! immediately announces the board with a `HELLO` line, then settles into
//! a read-parse-dispatch-reply loop that runs until the client sends
//! `DISCONNECT`, the peer closes the stream, or an I/O error occurs.
//!
//! Sessions never talk to each other. All cross-session effects flow
//! through the shared board, one dispatched command at a time.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use corkboard_core::{parse_command, Command, Hello, Response};

use crate::application::{dispatch, SharedBoard};

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for a single client connection.
///
/// Wraps [`run_session`] and logs the outcome. This function is the entry
/// point for each per-connection Tokio task spawned by the accept loop.
///
/// Using a separate outer/inner function pair lets us use `?` for clean
/// error propagation inside [`run_session`] while logging errors here.
pub async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, board: SharedBoard) {
    // A per-session id keeps interleaved log lines from concurrent clients
    // attributable even when several share one source address.
    let session_id = Uuid::new_v4();
    info!("session {session_id} opened for {peer_addr}");
    match run_session(stream, board).await {
        Ok(()) => info!("session {session_id} closed normally"),
        Err(e) => warn!("session {session_id} closed with error: {e:#}"),
    }
}

/// Drives one session over any byte stream.
///
/// Generic over the transport so unit tests can run a whole session over
/// an in-memory duplex pipe instead of a real TCP socket.
///
/// # Protocol
///
/// 1. Send `HELLO <dims> <colors>` before reading anything.
/// 2. For each received line: trim it, skip it if empty, otherwise parse
///    and dispatch it, then write the reply followed by `\n`.
/// 3. Stop after acknowledging `DISCONNECT`, or on EOF.
pub async fn run_session<S>(stream: S, board: SharedBoard) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    // The greeting is rendered while holding the lock, but written after
    // the guard is gone, so the handshake cannot stall other sessions.
    let greeting = {
        let guard = board.lock().await;
        Hello::from(guard.config()).to_string()
    };
    writer.write_all(format!("{greeting}\n").as_bytes()).await?;
    writer.flush().await?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            // Peer closed the stream without saying DISCONNECT.
            debug!("peer closed the connection");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Blank lines are ignored without a reply.
            continue;
        }
        debug!("received: {trimmed}");

        let parsed = parse_command(trimmed);
        let closing = matches!(parsed, Ok(Command::Disconnect));
        let response = match parsed {
            Ok(command) => dispatch(&board, command).await,
            Err(error) => Response::from(error),
        };

        debug!("sending: {response}");
        writer.write_all(format!("{response}\n").as_bytes()).await?;
        writer.flush().await?;

        if closing {
            return Ok(());
        }
    }
}
