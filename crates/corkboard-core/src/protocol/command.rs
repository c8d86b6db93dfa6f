//! Command side of the wire protocol: one text line in, one [`Command`] out.
//!
//! Parsing is a pure function of the line. It never consults board state, so
//! every format error is caught before anything can mutate.
//!
//! The GET filter grammar is scanned by a small tokenizer that hunts for the
//! next recognized clause keyword inside the remaining text. Two scanning
//! behaviors are part of the protocol and must not be "fixed":
//!
//! - A keyword is only recognized at an index greater than zero of the
//!   remaining text, so a clause starting immediately after a previous `=`
//!   is absorbed into that clause's value (`refersTo=color=red` is a
//!   substring search for `color=red`).
//! - A `refersTo=` value may contain spaces; it is truncated at the next
//!   recognized keyword, wherever that is.

use std::fmt;

use thiserror::Error;

use crate::domain::board::NoteFilter;

const COLOR_KEYWORD: &str = "color=";
const CONTAINS_KEYWORD: &str = "contains=";
const REFERS_TO_KEYWORD: &str = "refersTo=";

// ── Command type ──────────────────────────────────────────────────────────────

/// A fully parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `POST <x> <y> <color> <message>` — post a fixed-size note.
    Post {
        x: u32,
        y: u32,
        color: String,
        message: String,
    },
    /// `GET [filters]` — list notes; an empty filter lists every note.
    Get(NoteFilter),
    /// `GET PINS` — list all pins.
    GetPins,
    /// `PIN <x> <y>` — add a pin.
    Pin { x: u32, y: u32 },
    /// `UNPIN <x> <y>` — remove the first matching pin.
    Unpin { x: u32, y: u32 },
    /// `SHAKE` — drop all unpinned notes.
    Shake,
    /// `CLEAR` — empty the board.
    Clear,
    /// `DISCONNECT` — close the session after an acknowledgement.
    Disconnect,
}

impl fmt::Display for Command {
    /// Renders the command as its canonical wire line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Post {
                x,
                y,
                color,
                message,
            } => write!(f, "POST {x} {y} {color} {message}"),
            Command::Get(filter) if filter.is_empty() => write!(f, "GET"),
            Command::Get(filter) => {
                write!(f, "GET")?;
                if let Some(color) = &filter.color {
                    write!(f, " {COLOR_KEYWORD}{color}")?;
                }
                if let Some((x, y)) = filter.contains {
                    write!(f, " {CONTAINS_KEYWORD}{x} {y}")?;
                }
                if let Some(substring) = &filter.refers_to {
                    write!(f, " {REFERS_TO_KEYWORD}{substring}")?;
                }
                Ok(())
            }
            Command::GetPins => write!(f, "GET PINS"),
            Command::Pin { x, y } => write!(f, "PIN {x} {y}"),
            Command::Unpin { x, y } => write!(f, "UNPIN {x} {y}"),
            Command::Shake => write!(f, "SHAKE"),
            Command::Clear => write!(f, "CLEAR"),
            Command::Disconnect => write!(f, "DISCONNECT"),
        }
    }
}

/// Distinguishes PIN from UNPIN in format errors, for exact wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinVerb {
    Pin,
    Unpin,
}

impl fmt::Display for PinVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinVerb::Pin => write!(f, "PIN"),
            PinVerb::Unpin => write!(f, "UNPIN"),
        }
    }
}

/// Format errors raised by [`parse_command`].
///
/// The `Display` strings are the descriptions the server sends after
/// `ERROR INVALID_FORMAT`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The line matches no recognized verb.
    #[error("Unknown command")]
    UnknownCommand,

    /// POST has fewer than four argument parts.
    #[error("POST requires coordinates, color, and message")]
    MissingPostArguments,

    /// A POST coordinate is not a non-negative integer.
    #[error("POST coordinates must be non-negative integers")]
    InvalidPostCoordinates,

    /// The POST message is blank.
    #[error("POST requires a non-empty message")]
    EmptyMessage,

    /// `contains=` was given a single coordinate.
    #[error("GET contains filter requires two coordinates")]
    MissingContainsCoordinate,

    /// A `contains=` coordinate is negative.
    #[error("GET contains coordinates must be non-negative")]
    NegativeContainsCoordinates,

    /// A filter coordinate is not an integer.
    #[error("GET filter coordinates must be integers")]
    InvalidFilterCoordinates,

    /// The remaining GET text starts with no recognized clause.
    #[error("Invalid GET filter: {0}")]
    UnknownFilter(String),

    /// PIN/UNPIN was given a number of tokens other than two.
    #[error("{verb} requires exactly two coordinates")]
    InvalidPinArguments { verb: PinVerb },

    /// A PIN/UNPIN coordinate is not a non-negative integer.
    #[error("{verb} coordinates must be non-negative integers")]
    InvalidPinCoordinates { verb: PinVerb },
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parses one trimmed command line.
///
/// Verbs are case-sensitive and must match exactly; `SHAKE`, `CLEAR`, and
/// `DISCONNECT` take no arguments, so any trailing text makes the whole line
/// an unknown command.
///
/// # Errors
///
/// A [`CommandError`] describing the first offending clause. The caller is
/// expected to skip empty lines; an empty line parses as
/// [`CommandError::UnknownCommand`].
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();

    if let Some(args) = line.strip_prefix("POST ") {
        return parse_post(args);
    }
    if line == "GET" {
        return Ok(Command::Get(NoteFilter::default()));
    }
    if let Some(args) = line.strip_prefix("GET ") {
        return parse_get(args);
    }
    if let Some(args) = line.strip_prefix("PIN ") {
        return parse_pin(args, PinVerb::Pin);
    }
    if let Some(args) = line.strip_prefix("UNPIN ") {
        return parse_pin(args, PinVerb::Unpin);
    }
    match line {
        "SHAKE" => Ok(Command::Shake),
        "CLEAR" => Ok(Command::Clear),
        "DISCONNECT" => Ok(Command::Disconnect),
        _ => Err(CommandError::UnknownCommand),
    }
}

fn parse_post(args: &str) -> Result<Command, CommandError> {
    // Single-space split, limited to four parts: the fourth is the whole
    // message and may itself contain spaces.
    let parts: Vec<&str> = args.trim().splitn(4, ' ').collect();
    if parts.len() < 4 {
        return Err(CommandError::MissingPostArguments);
    }

    let x = parse_coordinate(parts[0]).ok_or(CommandError::InvalidPostCoordinates)?;
    let y = parse_coordinate(parts[1]).ok_or(CommandError::InvalidPostCoordinates)?;
    let color = parts[2];
    let message = parts[3];
    if message.trim().is_empty() {
        return Err(CommandError::EmptyMessage);
    }

    Ok(Command::Post {
        x,
        y,
        color: color.to_string(),
        message: message.to_string(),
    })
}

fn parse_pin(args: &str, verb: PinVerb) -> Result<Command, CommandError> {
    let parts: Vec<&str> = args.trim().split(' ').collect();
    if parts.len() != 2 {
        return Err(CommandError::InvalidPinArguments { verb });
    }

    let x = parse_coordinate(parts[0]).ok_or(CommandError::InvalidPinCoordinates { verb })?;
    let y = parse_coordinate(parts[1]).ok_or(CommandError::InvalidPinCoordinates { verb })?;

    Ok(match verb {
        PinVerb::Pin => Command::Pin { x, y },
        PinVerb::Unpin => Command::Unpin { x, y },
    })
}

fn parse_get(args: &str) -> Result<Command, CommandError> {
    let args = args.trim();
    if args.is_empty() {
        return Ok(Command::Get(NoteFilter::default()));
    }
    if args == "PINS" {
        return Ok(Command::GetPins);
    }

    let mut filter = NoteFilter::default();
    let mut remaining = args;
    while !remaining.is_empty() {
        if let Some(rest) = remaining.strip_prefix(COLOR_KEYWORD) {
            let (value, tail) = split_at_next_keyword(rest);
            // Repeated clauses overwrite: last one wins.
            filter.color = Some(value.to_string());
            remaining = tail;
        } else if let Some(rest) = remaining.strip_prefix(CONTAINS_KEYWORD) {
            let space = rest
                .find(' ')
                .ok_or(CommandError::MissingContainsCoordinate)?;
            let x_token = &rest[..space];
            let after_x = rest[space + 1..].trim();
            let (y_token, tail) = split_at_next_keyword(after_x);

            let x = parse_filter_coordinate(x_token)?;
            let y = parse_filter_coordinate(y_token)?;
            if x < 0 || y < 0 {
                return Err(CommandError::NegativeContainsCoordinates);
            }
            filter.contains = Some((x as u32, y as u32));
            remaining = tail;
        } else if let Some(rest) = remaining.strip_prefix(REFERS_TO_KEYWORD) {
            let (value, tail) = split_at_next_keyword(rest);
            filter.refers_to = Some(value.to_string());
            remaining = tail;
        } else {
            return Err(CommandError::UnknownFilter(remaining.to_string()));
        }
    }

    Ok(Command::Get(filter))
}

/// Splits `rest` into the current clause's value and the tail starting at
/// the next recognized keyword.
///
/// Without a next keyword the whole of `rest` is the value, untrimmed; with
/// one, the value loses surrounding whitespace and the tail starts exactly
/// at the keyword.
fn split_at_next_keyword(rest: &str) -> (&str, &str) {
    match next_keyword_index(rest) {
        Some(index) => (rest[..index].trim(), rest[index..].trim()),
        None => (rest, ""),
    }
}

/// Index of the earliest clause keyword occurring in `s` at a position
/// greater than zero, or `None`.
///
/// The greater-than-zero bound means a keyword at the very start of the
/// remaining text is never treated as a clause boundary; it belongs to the
/// value being collected.
fn next_keyword_index(s: &str) -> Option<usize> {
    [COLOR_KEYWORD, CONTAINS_KEYWORD, REFERS_TO_KEYWORD]
        .iter()
        .filter_map(|keyword| s.find(keyword).filter(|&index| index > 0))
        .min()
}

/// Parses a token as a non-negative coordinate. The wire uses signed 32-bit
/// integer syntax, so negatives parse successfully and are then rejected.
fn parse_coordinate(token: &str) -> Option<u32> {
    let value: i32 = token.parse().ok()?;
    if value < 0 {
        None
    } else {
        Some(value as u32)
    }
}

fn parse_filter_coordinate(token: &str) -> Result<i32, CommandError> {
    token
        .parse::<i32>()
        .map_err(|_| CommandError::InvalidFilterCoordinates)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
