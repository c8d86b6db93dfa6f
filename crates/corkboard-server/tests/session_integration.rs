//! Integration tests for the server over real TCP sockets.
//!
//! # Purpose
//!
//! These tests exercise the full network path — listener, session task,
//! parser, board, response rendering — through nothing but byte streams,
//! asserting the exact wire strings a protocol-conformant client depends
//! on:
//!
//! - The `HELLO` greeting arrives first, before any client byte is sent.
//! - Every acknowledgement, listing, and error reply is worded exactly
//!   as specified, down to the letter.
//! - A session survives malformed commands and keeps serving.
//! - Sessions share one board: notes posted by one client are visible to
//!   the next.
//!
//! # The reference session
//!
//! `test_end_to_end_post_pin_shake_session` walks the canonical exchange:
//!
//! ```text
//! Server                        Client
//! ──────                        ──────
//! HELLO 200 100 20 10 red white
//!                               POST 0 0 red hello
//! OK NOTE_POSTED
//!                               PIN 5 5
//! OK PIN_ADDED
//!                               SHAKE        (note pinned → survives)
//!                               UNPIN 5 5
//!                               SHAKE        (note unpinned → dropped)
//!                               GET
//! OK 0
//! ```

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

use corkboard_core::{Board, BoardConfig};
use corkboard_server::application::shared_board;
use corkboard_server::infrastructure::serve;

// ── Test harness ──────────────────────────────────────────────────────────────

/// Starts a server with the reference 200x100 board on an ephemeral port.
async fn start_server() -> SocketAddr {
    let board = shared_board(Board::new(BoardConfig {
        width: 200,
        height: 100,
        note_width: 20,
        note_height: 10,
        colors: vec!["red".to_string(), "white".to_string()],
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    tokio::spawn(serve(listener, board, running));
    addr
}

/// A bare-bones protocol client that works in raw lines, so the tests
/// control and observe every byte on the wire.
struct WireClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl WireClient {
    /// Connects and returns the client together with the greeting line.
    async fn connect(addr: SocketAddr) -> (Self, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer,
        };
        let greeting = client.read_line().await;
        (client, greeting)
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.unwrap();
        assert!(n > 0, "server closed the stream unexpectedly");
        line.trim_end().to_string()
    }

    /// Sends one command and returns its single-line reply.
    async fn round_trip(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_line().await
    }

    /// Asserts the stream is at EOF.
    async fn expect_eof(mut self) {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.unwrap();
        assert_eq!(n, 0, "expected EOF, got: {line:?}");
    }
}

// ── Handshake and acknowledgements ────────────────────────────────────────────

/// The greeting must describe the exact board this server was started
/// with, colors in announcement order.
#[tokio::test]
async fn test_hello_greeting_is_sent_first() {
    let addr = start_server().await;

    let (_client, greeting) = WireClient::connect(addr).await;

    assert_eq!(greeting, "HELLO 200 100 20 10 red white");
}

/// Walks the canonical post → pin → shake → unpin → shake session and
/// asserts every reply byte-for-byte.
#[tokio::test]
async fn test_end_to_end_post_pin_shake_session() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;

    assert_eq!(client.round_trip("POST 0 0 red hello").await, "OK NOTE_POSTED");
    assert_eq!(client.round_trip("PIN 5 5").await, "OK PIN_ADDED");

    // Pinned: the note rides out the shake.
    assert_eq!(client.round_trip("SHAKE").await, "OK SHAKE_COMPLETE");
    client.send("GET").await;
    assert_eq!(client.read_line().await, "OK 1");
    assert_eq!(client.read_line().await, "NOTE 0 0 red hello PINNED=true");

    // Unpinned: the next shake drops it.
    assert_eq!(client.round_trip("UNPIN 5 5").await, "OK PIN_REMOVED");
    assert_eq!(client.round_trip("SHAKE").await, "OK SHAKE_COMPLETE");
    assert_eq!(client.round_trip("GET").await, "OK 0");
}

#[tokio::test]
async fn test_clear_acknowledgement_wording() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red soon gone").await;

    assert_eq!(client.round_trip("CLEAR").await, "OK CLEAR_COMPLETE");
    assert_eq!(client.round_trip("GET").await, "OK 0");
}

// ── Listings ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_pins_listing_format() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red hello").await;
    client.round_trip("PIN 1 2").await;
    client.round_trip("PIN 3 4").await;

    client.send("GET PINS").await;

    assert_eq!(client.read_line().await, "OK 2");
    assert_eq!(client.read_line().await, "PIN 1 2");
    assert_eq!(client.read_line().await, "PIN 3 4");
}

/// Note messages keep their internal spacing verbatim in listings.
#[tokio::test]
async fn test_note_listing_preserves_message_spacing() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red two  spaces kept").await;

    client.send("GET").await;

    assert_eq!(client.read_line().await, "OK 1");
    assert_eq!(
        client.read_line().await,
        "NOTE 0 0 red two  spaces kept PINNED=false"
    );
}

/// A trailing run of text after the last `GET` filter keyword belongs to
/// that filter's value, even across spaces.
#[tokio::test]
async fn test_get_filter_value_swallows_trailing_text() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red status update for today").await;

    client.send("GET refersTo=update for today").await;

    assert_eq!(client.read_line().await, "OK 1");
    assert_eq!(
        client.read_line().await,
        "NOTE 0 0 red status update for today PINNED=false"
    );
}

/// A filter keyword immediately after `=` is part of the value, not a
/// new clause: `refersTo=color=red` matches notes containing the literal
/// text `color=red`.
#[tokio::test]
async fn test_get_keyword_directly_after_equals_stays_in_value() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red pick color=red for walls").await;
    client.round_trip("POST 20 0 red plain note").await;

    client.send("GET refersTo=color=red").await;

    assert_eq!(client.read_line().await, "OK 1");
    assert_eq!(
        client.read_line().await,
        "NOTE 0 0 red pick color=red for walls PINNED=false"
    );
}

#[tokio::test]
async fn test_get_combined_filters_intersect() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 0 0 red deploy friday").await;
    client.round_trip("POST 0 20 white deploy friday").await;
    client.round_trip("POST 40 0 red standup monday").await;

    client.send("GET color=red refersTo=deploy").await;

    assert_eq!(client.read_line().await, "OK 1");
    assert_eq!(
        client.read_line().await,
        "NOTE 0 0 red deploy friday PINNED=false"
    );
}

// ── Error replies ─────────────────────────────────────────────────────────────

/// Every error reply is `ERROR <CODE> <description>` with fixed wording.
#[tokio::test]
async fn test_error_replies_use_exact_wording() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;

    assert_eq!(
        client.round_trip("NUDGE").await,
        "ERROR INVALID_FORMAT Unknown command"
    );
    assert_eq!(
        client.round_trip("POST 0 0 purple hello").await,
        "ERROR COLOR_NOT_SUPPORTED purple is not a valid color"
    );
    assert_eq!(
        client.round_trip("POST 190 95 red close to the edge").await,
        "ERROR OUT_OF_BOUNDS Note exceeds board boundaries"
    );
    assert_eq!(
        client.round_trip("PIN 5 5").await,
        "ERROR NO_NOTE_AT_COORDINATE No note contains the given point"
    );
    assert_eq!(
        client.round_trip("UNPIN 5 5").await,
        "ERROR PIN_NOT_FOUND No pin exists at the given coordinates"
    );
    assert_eq!(
        client.round_trip("POST 0 0").await,
        "ERROR INVALID_FORMAT POST requires coordinates, color, and message"
    );
    assert_eq!(
        client.round_trip("PIN 5").await,
        "ERROR INVALID_FORMAT PIN requires exactly two coordinates"
    );
}

#[tokio::test]
async fn test_identical_origin_post_is_a_complete_overlap() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;
    client.round_trip("POST 30 30 red first claim").await;

    assert_eq!(
        client.round_trip("POST 30 30 white second claim").await,
        "ERROR COMPLETE_OVERLAP Note overlaps an existing note entirely"
    );
}

/// Malformed input never ends the session.
#[tokio::test]
async fn test_session_continues_after_errors() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;

    client.round_trip("GARBAGE LINE").await;
    client.round_trip("POST -1 0 red negative").await;

    assert_eq!(client.round_trip("POST 0 0 red fine").await, "OK NOTE_POSTED");
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_blank_lines_receive_no_reply() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;

    client.send("").await;
    client.send("   ").await;
    client.send("SHAKE").await;

    // The first reply on the stream belongs to SHAKE.
    assert_eq!(client.read_line().await, "OK SHAKE_COMPLETE");
}

#[tokio::test]
async fn test_disconnect_says_goodbye_then_closes() {
    let addr = start_server().await;
    let (mut client, _) = WireClient::connect(addr).await;

    assert_eq!(client.round_trip("DISCONNECT").await, "OK GOODBYE");
    client.expect_eof().await;
}

/// The board is server state, not session state.
#[tokio::test]
async fn test_board_outlives_sessions() {
    let addr = start_server().await;

    let (mut first, _) = WireClient::connect(addr).await;
    first.round_trip("POST 100 50 white durable").await;
    first.round_trip("DISCONNECT").await;

    let (mut second, _) = WireClient::connect(addr).await;
    second.send("GET").await;
    assert_eq!(second.read_line().await, "OK 1");
    assert_eq!(
        second.read_line().await,
        "NOTE 100 50 white durable PINNED=false"
    );
}
