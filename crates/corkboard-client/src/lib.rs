//! corkboard-client library crate.
//!
//! A small programmatic client for a Corkboard bulletin-board server.
//! [`BoardClient`] gives typed access to every protocol command:
//!
//! ```no_run
//! use corkboard_client::BoardClient;
//! use corkboard_core::NoteFilter;
//!
//! # async fn example() -> Result<(), corkboard_client::ClientError> {
//! let mut client = BoardClient::connect("127.0.0.1:7878").await?;
//! client.post(10, 20, "red", "build log on the board").await?;
//! client.pin(12, 22).await?;
//! let notes = client.notes(NoteFilter::default()).await?;
//! assert!(notes.iter().any(|n| n.pinned));
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The interactive terminal in `main.rs` builds on the same type via
//! [`BoardClient::send_line`], which echoes the server's raw reply lines.

pub mod connection;

pub use connection::{BoardClient, ClientError};
