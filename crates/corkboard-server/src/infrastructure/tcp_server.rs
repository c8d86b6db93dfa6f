//! TCP server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming client connections.
//! 3. Spawning a dedicated session task per connection (see
//!    [`crate::infrastructure::session`]).
//! 4. Gracefully shutting down when the `running` flag is cleared.
//!
//! # Scalability
//!
//! Each client session runs in its own Tokio task. The accept loop never
//! blocks on a session: it accepts a connection and immediately spawns a
//! task for it before accepting the next one, so the server handles many
//! simultaneous clients limited only by memory and the OS's TCP stack.
//! Contention happens only at the shared board lock, one command at a
//! time.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{error, info};

use crate::application::SharedBoard;
use crate::domain::ServerConfig;
use crate::infrastructure::session::handle_connection;

/// Binds the configured address and serves until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port
/// is already in use or the process lacks permission to bind).
pub async fn run_server(
    config: &ServerConfig,
    board: SharedBoard,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;

    info!("board server listening on {addr}");
    serve(listener, board, running).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
///
/// Split out from [`run_server`] so integration tests can bind port 0
/// themselves, learn the ephemeral port, and then hand the listener over.
pub async fn serve(listener: TcpListener, board: SharedBoard, running: Arc<AtomicBool>) {
    loop {
        // Check the shutdown flag before each accept attempt.
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on accept() lets the loop re-check the running
        // flag even when no clients are connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("new client connection from {peer_addr}");
                let board = Arc::clone(&board);

                // The session task owns the stream from here on; the accept
                // loop is never delayed by a client's I/O.
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, board).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file
                // descriptors). Log it and keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout — no new connection in the last 200 ms.
                // Loop back to check the running flag.
            }
        }
    }
}
