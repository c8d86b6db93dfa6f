//! Response side of the wire protocol.
//!
//! A reply is either a single line (`OK <TOKEN>` or `ERROR <CODE>
//! <description>`) or a list block: `OK <count>` followed by exactly
//! `<count>` data lines. [`Response`] renders the server side; the header
//! and line parsers serve clients reading the same bytes back.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::board::BoardError;
use crate::domain::note::{Note, Pin};
use crate::protocol::command::CommandError;

const PINNED_MARKER: &str = " PINNED=";

// ── Error codes ───────────────────────────────────────────────────────────────

/// Machine-readable error code, the first token after `ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidFormat,
    OutOfBounds,
    ColorNotSupported,
    CompleteOverlap,
    NoNoteAtCoordinate,
    PinNotFound,
}

impl ErrorCode {
    /// The token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::OutOfBounds => "OUT_OF_BOUNDS",
            ErrorCode::ColorNotSupported => "COLOR_NOT_SUPPORTED",
            ErrorCode::CompleteOverlap => "COMPLETE_OVERLAP",
            ErrorCode::NoNoteAtCoordinate => "NO_NOTE_AT_COORDINATE",
            ErrorCode::PinNotFound => "PIN_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INVALID_FORMAT" => Ok(ErrorCode::InvalidFormat),
            "OUT_OF_BOUNDS" => Ok(ErrorCode::OutOfBounds),
            "COLOR_NOT_SUPPORTED" => Ok(ErrorCode::ColorNotSupported),
            "COMPLETE_OVERLAP" => Ok(ErrorCode::CompleteOverlap),
            "NO_NOTE_AT_COORDINATE" => Ok(ErrorCode::NoNoteAtCoordinate),
            "PIN_NOT_FOUND" => Ok(ErrorCode::PinNotFound),
            other => Err(ResponseError::UnknownErrorCode(other.to_string())),
        }
    }
}

/// Parse failures on the client side of the protocol.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// The reply header is neither `OK …` nor `ERROR …`.
    #[error("malformed reply header: {0:?}")]
    MalformedHeader(String),

    /// An `ERROR` line carries a code this crate does not know.
    #[error("unknown error code: {0}")]
    UnknownErrorCode(String),

    /// A list line does not parse as `NOTE <x> <y> <color> <message>
    /// PINNED=<bool>`.
    #[error("malformed note line: {0:?}")]
    MalformedNoteLine(String),

    /// A list line does not parse as `PIN <x> <y>`.
    #[error("malformed pin line: {0:?}")]
    MalformedPinLine(String),
}

// ── Note entries ──────────────────────────────────────────────────────────────

/// One row of a note listing: position, color, message, and the derived
/// pinned flag. Note size never travels on the wire; both ends learn it
/// from the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub x: u32,
    pub y: u32,
    pub color: String,
    pub message: String,
    pub pinned: bool,
}

impl NoteEntry {
    /// Builds the wire row for `note` with its pinned status.
    pub fn new(note: &Note, pinned: bool) -> Self {
        Self {
            x: note.x,
            y: note.y,
            color: note.color.clone(),
            message: note.message.clone(),
            pinned,
        }
    }

    /// Parses a `NOTE …` list line.
    ///
    /// The pinned flag is found by searching for the *last* ` PINNED=`
    /// marker, so a message that itself ends in such text still round-trips.
    ///
    /// # Errors
    ///
    /// [`ResponseError::MalformedNoteLine`] carrying the offending line.
    pub fn parse(line: &str) -> Result<Self, ResponseError> {
        let malformed = || ResponseError::MalformedNoteLine(line.to_string());

        let body = line.strip_prefix("NOTE ").ok_or_else(malformed)?;
        let marker = body.rfind(PINNED_MARKER).ok_or_else(malformed)?;
        let pinned = match &body[marker + PINNED_MARKER.len()..] {
            "true" => true,
            "false" => false,
            _ => return Err(malformed()),
        };

        let mut parts = body[..marker].splitn(4, ' ');
        let x = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(malformed)?;
        let y = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(malformed)?;
        let color = parts.next().ok_or_else(malformed)?;
        let message = parts.next().ok_or_else(malformed)?;

        Ok(Self {
            x,
            y,
            color: color.to_string(),
            message: message.to_string(),
            pinned,
        })
    }
}

impl fmt::Display for NoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NOTE {} {} {} {}{}{}",
            self.x, self.y, self.color, self.message, PINNED_MARKER, self.pinned
        )
    }
}

/// Parses a `PIN <x> <y>` list line.
///
/// # Errors
///
/// [`ResponseError::MalformedPinLine`] carrying the offending line.
pub fn parse_pin_line(line: &str) -> Result<Pin, ResponseError> {
    let malformed = || ResponseError::MalformedPinLine(line.to_string());

    let body = line.strip_prefix("PIN ").ok_or_else(malformed)?;
    let mut parts = body.split(' ');
    let x = parts
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(malformed)?;
    let y = parts
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    Ok(Pin { x, y })
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// A complete server reply.
///
/// `Display` renders the full block with lines separated by `\n` and no
/// trailing newline; the session layer appends the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK NOTE_POSTED`
    NotePosted,
    /// `OK PIN_ADDED`
    PinAdded,
    /// `OK PIN_REMOVED`
    PinRemoved,
    /// `OK SHAKE_COMPLETE`
    ShakeComplete,
    /// `OK CLEAR_COMPLETE`
    ClearComplete,
    /// `OK GOODBYE`
    Goodbye,
    /// `OK <count>` plus one `PIN …` line per pin.
    Pins(Vec<Pin>),
    /// `OK <count>` plus one `NOTE …` line per note.
    Notes(Vec<NoteEntry>),
    /// `ERROR <CODE> <description>`
    Error { code: ErrorCode, detail: String },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::NotePosted => write!(f, "OK NOTE_POSTED"),
            Response::PinAdded => write!(f, "OK PIN_ADDED"),
            Response::PinRemoved => write!(f, "OK PIN_REMOVED"),
            Response::ShakeComplete => write!(f, "OK SHAKE_COMPLETE"),
            Response::ClearComplete => write!(f, "OK CLEAR_COMPLETE"),
            Response::Goodbye => write!(f, "OK GOODBYE"),
            Response::Pins(pins) => {
                write!(f, "OK {}", pins.len())?;
                for pin in pins {
                    write!(f, "\nPIN {} {}", pin.x, pin.y)?;
                }
                Ok(())
            }
            Response::Notes(entries) => {
                write!(f, "OK {}", entries.len())?;
                for entry in entries {
                    write!(f, "\n{entry}")?;
                }
                Ok(())
            }
            Response::Error { code, detail } => write!(f, "ERROR {code} {detail}"),
        }
    }
}

impl From<BoardError> for Response {
    /// Maps a rule violation onto its wire code, reusing the error's
    /// `Display` text as the description.
    fn from(error: BoardError) -> Self {
        let code = match error {
            BoardError::OutOfBounds => ErrorCode::OutOfBounds,
            BoardError::ColorNotSupported { .. } => ErrorCode::ColorNotSupported,
            BoardError::CompleteOverlap => ErrorCode::CompleteOverlap,
            BoardError::NoNoteAtCoordinate => ErrorCode::NoNoteAtCoordinate,
            BoardError::PinNotFound => ErrorCode::PinNotFound,
        };
        Response::Error {
            code,
            detail: error.to_string(),
        }
    }
}

impl From<CommandError> for Response {
    /// Every format error surfaces as `INVALID_FORMAT` with its clause
    /// description.
    fn from(error: CommandError) -> Self {
        Response::Error {
            code: ErrorCode::InvalidFormat,
            detail: error.to_string(),
        }
    }
}

// ── Reply headers ─────────────────────────────────────────────────────────────

/// The first line of a reply, classified for clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyHeader {
    /// `OK <TOKEN>` — a simple acknowledgement carrying its token.
    Ack(String),
    /// `OK <count>` — a list of `count` data lines follows.
    List(usize),
    /// `ERROR <CODE> <description>`.
    Error { code: ErrorCode, detail: String },
}

impl ReplyHeader {
    /// Classifies a reply header line.
    ///
    /// `OK` followed by an unsigned integer is a list header; `OK` followed
    /// by anything else is an acknowledgement token.
    ///
    /// # Errors
    ///
    /// [`ResponseError::MalformedHeader`] if the line starts with neither
    /// `OK ` nor `ERROR `, or [`ResponseError::UnknownErrorCode`] for an
    /// unrecognized error code.
    pub fn parse(line: &str) -> Result<Self, ResponseError> {
        if let Some(rest) = line.strip_prefix("OK ") {
            if let Ok(count) = rest.parse::<usize>() {
                return Ok(ReplyHeader::List(count));
            }
            return Ok(ReplyHeader::Ack(rest.to_string()));
        }
        if let Some(rest) = line.strip_prefix("ERROR ") {
            let (code_token, detail) = rest.split_once(' ').unwrap_or((rest, ""));
            let code = code_token.parse::<ErrorCode>()?;
            return Ok(ReplyHeader::Error {
                code,
                detail: detail.to_string(),
            });
        }
        Err(ResponseError::MalformedHeader(line.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn note(x: u32, y: u32, color: &str, message: &str) -> Note {
        Note {
            x,
            y,
            width: 20,
            height: 10,
            color: color.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_simple_responses_render_exact_tokens() {
        assert_eq!(Response::NotePosted.to_string(), "OK NOTE_POSTED");
        assert_eq!(Response::PinAdded.to_string(), "OK PIN_ADDED");
        assert_eq!(Response::PinRemoved.to_string(), "OK PIN_REMOVED");
        assert_eq!(Response::ShakeComplete.to_string(), "OK SHAKE_COMPLETE");
        assert_eq!(Response::ClearComplete.to_string(), "OK CLEAR_COMPLETE");
        assert_eq!(Response::Goodbye.to_string(), "OK GOODBYE");
    }

    #[test]
    fn test_pins_render_count_then_lines() {
        let response = Response::Pins(vec![Pin { x: 1, y: 2 }, Pin { x: 3, y: 4 }]);
        assert_eq!(response.to_string(), "OK 2\nPIN 1 2\nPIN 3 4");
    }

    #[test]
    fn test_empty_list_renders_count_only() {
        assert_eq!(Response::Pins(Vec::new()).to_string(), "OK 0");
        assert_eq!(Response::Notes(Vec::new()).to_string(), "OK 0");
    }

    #[test]
    fn test_notes_render_with_pinned_flag() {
        let entries = vec![
            NoteEntry::new(&note(0, 0, "red", "hello"), true),
            NoteEntry::new(&note(30, 0, "white", "buy milk"), false),
        ];
        assert_eq!(
            Response::Notes(entries).to_string(),
            "OK 2\nNOTE 0 0 red hello PINNED=true\nNOTE 30 0 white buy milk PINNED=false"
        );
    }

    #[test]
    fn test_board_errors_map_to_wire_codes() {
        assert_eq!(
            Response::from(BoardError::OutOfBounds).to_string(),
            "ERROR OUT_OF_BOUNDS Note exceeds board boundaries"
        );
        assert_eq!(
            Response::from(BoardError::ColorNotSupported {
                color: "purple".to_string()
            })
            .to_string(),
            "ERROR COLOR_NOT_SUPPORTED purple is not a valid color"
        );
        assert_eq!(
            Response::from(BoardError::CompleteOverlap).to_string(),
            "ERROR COMPLETE_OVERLAP Note overlaps an existing note entirely"
        );
        assert_eq!(
            Response::from(BoardError::NoNoteAtCoordinate).to_string(),
            "ERROR NO_NOTE_AT_COORDINATE No note contains the given point"
        );
        assert_eq!(
            Response::from(BoardError::PinNotFound).to_string(),
            "ERROR PIN_NOT_FOUND No pin exists at the given coordinates"
        );
    }

    #[test]
    fn test_command_errors_map_to_invalid_format() {
        let response = Response::from(CommandError::UnknownCommand);
        assert_eq!(response.to_string(), "ERROR INVALID_FORMAT Unknown command");
    }

    #[test]
    fn test_note_entry_parse_round_trip() {
        let entry = NoteEntry::new(&note(5, 7, "red", "buy milk today"), true);
        assert_eq!(NoteEntry::parse(&entry.to_string()), Ok(entry));
    }

    #[test]
    fn test_note_entry_parse_message_containing_pinned_marker() {
        // The last marker wins, so a message ending in " PINNED=false"
        // still survives the trip.
        let entry = NoteEntry::new(&note(0, 0, "red", "tricky PINNED=false"), true);
        let line = entry.to_string();
        assert_eq!(
            line,
            "NOTE 0 0 red tricky PINNED=false PINNED=true"
        );
        assert_eq!(NoteEntry::parse(&line), Ok(entry));
    }

    #[test]
    fn test_note_entry_parse_rejects_bad_flag() {
        assert!(NoteEntry::parse("NOTE 0 0 red hi PINNED=maybe").is_err());
    }

    #[test]
    fn test_note_entry_parse_rejects_missing_fields() {
        assert!(matches!(
            NoteEntry::parse("NOTE 0 0 PINNED=true"),
            Err(ResponseError::MalformedNoteLine(_))
        ));
    }

    #[test]
    fn test_parse_pin_line() {
        assert_eq!(parse_pin_line("PIN 3 9"), Ok(Pin { x: 3, y: 9 }));
    }

    #[test]
    fn test_parse_pin_line_rejects_extra_tokens() {
        assert!(parse_pin_line("PIN 3 9 1").is_err());
    }

    #[test]
    fn test_reply_header_classifies_ack() {
        assert_eq!(
            ReplyHeader::parse("OK NOTE_POSTED"),
            Ok(ReplyHeader::Ack("NOTE_POSTED".to_string()))
        );
    }

    #[test]
    fn test_reply_header_classifies_list_count() {
        assert_eq!(ReplyHeader::parse("OK 12"), Ok(ReplyHeader::List(12)));
        assert_eq!(ReplyHeader::parse("OK 0"), Ok(ReplyHeader::List(0)));
    }

    #[test]
    fn test_reply_header_classifies_error() {
        assert_eq!(
            ReplyHeader::parse("ERROR OUT_OF_BOUNDS Note exceeds board boundaries"),
            Ok(ReplyHeader::Error {
                code: ErrorCode::OutOfBounds,
                detail: "Note exceeds board boundaries".to_string(),
            })
        );
    }

    #[test]
    fn test_reply_header_rejects_unknown_error_code() {
        assert_eq!(
            ReplyHeader::parse("ERROR TEAPOT short and stout"),
            Err(ResponseError::UnknownErrorCode("TEAPOT".to_string()))
        );
    }

    #[test]
    fn test_reply_header_rejects_garbage() {
        assert!(matches!(
            ReplyHeader::parse("HELLO 1 2 3 4 red"),
            Err(ResponseError::MalformedHeader(_))
        ));
    }
}
