//! TCP connection management for a board server.
//!
//! [`BoardClient`] owns one connection and completes the `HELLO`
//! handshake on connect, so by the time a caller holds a client, the
//! board geometry and palette are already known via
//! [`BoardClient::board_info`].
//!
//! # Line protocol
//!
//! Every exchange is newline-delimited text. The client writes one
//! command line, then reads exactly one reply: a single `OK`/`ERROR`
//! header line, plus — for `OK <count>` listing headers — exactly
//! `count` data lines. Reading the right number of lines is what keeps
//! request and reply in lockstep over the stream.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use corkboard_core::{
    parse_pin_line, Command, ErrorCode, HandshakeError, Hello, NoteEntry, NoteFilter, Pin,
    ReplyHeader, ResponseError,
};

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors surfaced by [`BoardClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying TCP stream failed.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The server's greeting line was not a valid `HELLO`.
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    /// A reply line could not be parsed.
    #[error("malformed server reply: {0}")]
    Response(#[from] ResponseError),

    /// The server closed the connection mid-exchange.
    #[error("server closed the connection")]
    ConnectionClosed,

    /// The server answered with an `ERROR` reply.
    ///
    /// These are ordinary protocol rejections (bad color, out of bounds,
    /// no note at the point), kept distinct from transport failures so
    /// callers can match on [`ErrorCode`].
    #[error("server rejected the command: {code} {detail}")]
    Rejected { code: ErrorCode, detail: String },

    /// The server acknowledged with a token this client did not expect.
    #[error("unexpected server reply: {0}")]
    UnexpectedReply(String),
}

/// One complete reply block, already classified by its header.
enum Reply {
    /// `OK <token>` acknowledgement.
    Ack(String),
    /// `OK <count>` listing with its data lines.
    List(Vec<String>),
}

// ── Client ────────────────────────────────────────────────────────────────────

/// A connected board client.
///
/// Owns the read and write halves of the TCP stream. All methods take
/// `&mut self` because the protocol is strictly request-reply on one
/// stream; to issue commands concurrently, open more clients.
pub struct BoardClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    hello: Hello,
}

impl BoardClient {
    /// Connects to a board server and completes the handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the TCP connection cannot be
    /// established, [`ClientError::ConnectionClosed`] if the server hangs
    /// up before greeting, and [`ClientError::Handshake`] if the greeting
    /// is not a valid `HELLO` line.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        // The server speaks first.
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        let hello: Hello = line.trim().parse()?;
        debug!("connected, server announced: {hello}");

        Ok(Self {
            reader,
            writer,
            hello,
        })
    }

    /// The board geometry and palette the server announced on connect.
    pub fn board_info(&self) -> &Hello {
        &self.hello
    }

    // ── Typed commands ────────────────────────────────────────────────────────

    /// Posts a note with its upper-left corner at `(x, y)`.
    pub async fn post(
        &mut self,
        x: u32,
        y: u32,
        color: &str,
        message: &str,
    ) -> Result<(), ClientError> {
        let command = Command::Post {
            x,
            y,
            color: color.to_string(),
            message: message.to_string(),
        };
        self.expect_ack(command, "NOTE_POSTED").await
    }

    /// Fetches the notes matching `filter`, with their pin state.
    pub async fn notes(&mut self, filter: NoteFilter) -> Result<Vec<NoteEntry>, ClientError> {
        match self.exchange(Command::Get(filter)).await? {
            Reply::List(lines) => lines
                .iter()
                .map(|line| NoteEntry::parse(line).map_err(ClientError::from))
                .collect(),
            Reply::Ack(token) => Err(ClientError::UnexpectedReply(token)),
        }
    }

    /// Fetches every pin currently on the board.
    pub async fn pins(&mut self) -> Result<Vec<Pin>, ClientError> {
        match self.exchange(Command::GetPins).await? {
            Reply::List(lines) => lines
                .iter()
                .map(|line| parse_pin_line(line).map_err(ClientError::from))
                .collect(),
            Reply::Ack(token) => Err(ClientError::UnexpectedReply(token)),
        }
    }

    /// Places a pin at `(x, y)`.
    pub async fn pin(&mut self, x: u32, y: u32) -> Result<(), ClientError> {
        self.expect_ack(Command::Pin { x, y }, "PIN_ADDED").await
    }

    /// Removes one pin at `(x, y)`.
    pub async fn unpin(&mut self, x: u32, y: u32) -> Result<(), ClientError> {
        self.expect_ack(Command::Unpin { x, y }, "PIN_REMOVED").await
    }

    /// Shakes the board, dropping every unpinned note.
    pub async fn shake(&mut self) -> Result<(), ClientError> {
        self.expect_ack(Command::Shake, "SHAKE_COMPLETE").await
    }

    /// Clears all notes and pins from the board.
    pub async fn clear(&mut self) -> Result<(), ClientError> {
        self.expect_ack(Command::Clear, "CLEAR_COMPLETE").await
    }

    /// Says goodbye and consumes the client.
    ///
    /// The server acknowledges with `OK GOODBYE` and closes its end;
    /// dropping `self` closes ours.
    pub async fn disconnect(mut self) -> Result<(), ClientError> {
        self.expect_ack(Command::Disconnect, "GOODBYE").await
    }

    // ── Raw line interface ────────────────────────────────────────────────────

    /// Sends a raw command line and returns the raw reply block, header
    /// line first.
    ///
    /// This is what the interactive terminal uses to echo the server's
    /// exact wording; programmatic callers prefer the typed methods.
    ///
    /// The line must be a complete command: the server sends no reply at
    /// all for blank lines, so passing one here would block forever
    /// waiting for a header.
    pub async fn send_line(&mut self, line: &str) -> Result<Vec<String>, ClientError> {
        self.write_line(line).await?;
        let header = self.read_line().await?;
        let mut block = vec![header];
        if let Ok(ReplyHeader::List(count)) = ReplyHeader::parse(&block[0]) {
            for _ in 0..count {
                let data = self.read_line().await?;
                block.push(data);
            }
        }
        Ok(block)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// Writes one command and reads its complete reply block.
    async fn exchange(&mut self, command: Command) -> Result<Reply, ClientError> {
        self.write_line(&command.to_string()).await?;
        let header = self.read_line().await?;
        match ReplyHeader::parse(&header)? {
            ReplyHeader::Error { code, detail } => Err(ClientError::Rejected { code, detail }),
            ReplyHeader::Ack(token) => Ok(Reply::Ack(token)),
            ReplyHeader::List(count) => {
                let mut lines = Vec::with_capacity(count);
                for _ in 0..count {
                    lines.push(self.read_line().await?);
                }
                Ok(Reply::List(lines))
            }
        }
    }

    async fn expect_ack(&mut self, command: Command, token: &str) -> Result<(), ClientError> {
        match self.exchange(command).await? {
            Reply::Ack(received) if received == token => Ok(()),
            Reply::Ack(received) => Err(ClientError::UnexpectedReply(received)),
            Reply::List(lines) => Err(ClientError::UnexpectedReply(format!(
                "listing of {} lines",
                lines.len()
            ))),
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), ClientError> {
        debug!("sending: {line}");
        self.writer.write_all(format!("{line}\n").as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one reply line, without its trailing newline.
    async fn read_line(&mut self) -> Result<String, ClientError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        // Only the terminator goes; note messages never carry trailing
        // whitespace of their own.
        Ok(line.trim_end().to_string())
    }
}
