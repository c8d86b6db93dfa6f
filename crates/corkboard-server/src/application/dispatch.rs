//! Command execution against the shared board.
//!
//! Every connected session funnels its parsed commands through
//! [`dispatch`], which is the only place that touches the board state.
//! The board lives behind a single async [`Mutex`]: one command runs at a
//! time, so each command observes the board as it was left by the previous
//! one, regardless of which session sent it.
//!
//! The lock is scoped to the board operation alone. Replies are rendered
//! and written back to sockets after the guard is dropped, so a slow or
//! stalled client can never hold up another session's command.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use corkboard_core::{Board, Command, NoteEntry, Response};

/// The one board every session shares.
pub type SharedBoard = Arc<Mutex<Board>>;

/// Wraps a freshly created board for sharing across sessions.
pub fn shared_board(board: Board) -> SharedBoard {
    Arc::new(Mutex::new(board))
}

/// Executes one command and produces the reply to send back.
///
/// Commands that mutate the board return their acknowledgement token;
/// queries return a listing. Board-level rejections (out of bounds, bad
/// color, and so on) come back as [`Response::Error`] values rather than
/// `Err`, since they are ordinary protocol traffic, not failures of the
/// server itself.
pub async fn dispatch(board: &SharedBoard, command: Command) -> Response {
    match command {
        Command::Post { x, y, color, message } => {
            let result = board.lock().await.post_note(x, y, &color, &message);
            match result {
                Ok(()) => Response::NotePosted,
                Err(error) => Response::from(error),
            }
        }

        Command::Get(filter) => {
            let board = board.lock().await;
            let entries: Vec<NoteEntry> = board
                .notes(&filter)
                .into_iter()
                .map(|(note, pinned)| NoteEntry::new(note, pinned))
                .collect();
            debug!(matches = entries.len(), "note query");
            Response::Notes(entries)
        }

        Command::GetPins => {
            let pins = board.lock().await.pins().to_vec();
            Response::Pins(pins)
        }

        Command::Pin { x, y } => match board.lock().await.pin_at(x, y) {
            Ok(()) => Response::PinAdded,
            Err(error) => Response::from(error),
        },

        Command::Unpin { x, y } => match board.lock().await.unpin_at(x, y) {
            Ok(()) => Response::PinRemoved,
            Err(error) => Response::from(error),
        },

        Command::Shake => {
            board.lock().await.shake();
            Response::ShakeComplete
        }

        Command::Clear => {
            board.lock().await.clear();
            Response::ClearComplete
        }

        // The session loop closes the connection after this reply is sent.
        Command::Disconnect => Response::Goodbye,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::{BoardConfig, ErrorCode, NoteFilter};

    fn test_board() -> SharedBoard {
        shared_board(Board::new(BoardConfig {
            width: 200,
            height: 100,
            note_width: 20,
            note_height: 10,
            colors: vec!["red".to_string(), "white".to_string()],
        }))
    }

    async fn run(board: &SharedBoard, line: &str) -> Response {
        let command = corkboard_core::parse_command(line).expect("test command must parse");
        dispatch(board, command).await
    }

    #[tokio::test]
    async fn test_post_returns_note_posted() {
        let board = test_board();

        let response = run(&board, "POST 0 0 red hello").await;

        assert_eq!(response.to_string(), "OK NOTE_POSTED");
    }

    #[tokio::test]
    async fn test_post_rejection_becomes_error_response() {
        let board = test_board();

        let response = run(&board, "POST 0 0 purple hello").await;

        match response {
            Response::Error { code, detail } => {
                assert_eq!(code, ErrorCode::ColorNotSupported);
                assert_eq!(detail, "purple is not a valid color");
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_lists_posted_notes_with_pin_state() {
        let board = test_board();
        run(&board, "POST 0 0 red hello").await;
        run(&board, "PIN 5 5").await;

        let response = dispatch(&board, Command::Get(NoteFilter::default())).await;

        assert_eq!(response.to_string(), "OK 1\nNOTE 0 0 red hello PINNED=true");
    }

    #[tokio::test]
    async fn test_get_pins_lists_every_pin() {
        let board = test_board();
        run(&board, "POST 0 0 red hello").await;
        run(&board, "PIN 1 1").await;
        run(&board, "PIN 2 2").await;

        let response = dispatch(&board, Command::GetPins).await;

        assert_eq!(response.to_string(), "OK 2\nPIN 1 1\nPIN 2 2");
    }

    #[tokio::test]
    async fn test_shake_drops_unpinned_notes() {
        let board = test_board();
        run(&board, "POST 0 0 red doomed").await;
        run(&board, "POST 50 50 white saved").await;
        run(&board, "PIN 55 55").await;

        let response = run(&board, "SHAKE").await;

        assert_eq!(response.to_string(), "OK SHAKE_COMPLETE");
        assert_eq!(board.lock().await.notes(&NoteFilter::default()).len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_the_board() {
        let board = test_board();
        run(&board, "POST 0 0 red hello").await;
        run(&board, "PIN 5 5").await;

        let response = run(&board, "CLEAR").await;

        assert_eq!(response.to_string(), "OK CLEAR_COMPLETE");
        let guard = board.lock().await;
        assert!(guard.notes(&NoteFilter::default()).is_empty());
        assert!(guard.pins().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_acknowledges_with_goodbye() {
        let board = test_board();

        let response = run(&board, "DISCONNECT").await;

        assert_eq!(response.to_string(), "OK GOODBYE");
    }

    #[tokio::test]
    async fn test_commands_from_concurrent_tasks_all_apply() {
        // Posts from many tasks race for the one lock; every non-overlapping
        // note must land on the board.
        let board = test_board();
        let mut handles = Vec::new();
        for i in 0..8u32 {
            let board = Arc::clone(&board);
            handles.push(tokio::spawn(async move {
                dispatch(
                    &board,
                    Command::Post {
                        x: i * 20,
                        y: 0,
                        color: "red".to_string(),
                        message: format!("note-{i}"),
                    },
                )
                .await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().to_string(), "OK NOTE_POSTED");
        }

        assert_eq!(board.lock().await.notes(&NoteFilter::default()).len(), 8);
    }
}
