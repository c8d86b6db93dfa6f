//! The shared bulletin board: configuration, note and pin stores, and the
//! atomic operations the protocol exposes.
//!
//! The board itself is a plain synchronous structure. Callers serialize
//! access through a single mutex and hold the guard for the whole call, so
//! every operation observes a consistent snapshot and a rejected command
//! leaves the board exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::note::{Note, Pin};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Immutable board geometry and palette, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board width in units.
    #[serde(default = "default_board_width")]
    pub width: u32,
    /// Board height in units.
    #[serde(default = "default_board_height")]
    pub height: u32,
    /// Fixed width of every note.
    #[serde(default = "default_note_width")]
    pub note_width: u32,
    /// Fixed height of every note.
    #[serde(default = "default_note_height")]
    pub note_height: u32,
    /// Ordered, case-sensitive color tokens accepted by POST.
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
}

fn default_board_width() -> u32 {
    200
}

fn default_board_height() -> u32 {
    100
}

fn default_note_width() -> u32 {
    20
}

fn default_note_height() -> u32 {
    10
}

fn default_colors() -> Vec<String> {
    ["red", "green", "blue", "yellow", "white"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: default_board_width(),
            height: default_board_height(),
            note_width: default_note_width(),
            note_height: default_note_height(),
            colors: default_colors(),
        }
    }
}

impl BoardConfig {
    /// Checks the configuration invariants: positive dimensions, notes that
    /// fit the board, and a non-empty list of well-formed color tokens.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant. Color tokens travel on the wire
    /// as single space-delimited words, so a blank token or one containing
    /// whitespace is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::BoardDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.note_width == 0 || self.note_height == 0 {
            return Err(ConfigError::NoteDimensions {
                width: self.note_width,
                height: self.note_height,
            });
        }
        if self.note_width > self.width || self.note_height > self.height {
            return Err(ConfigError::NoteTooLarge {
                note_width: self.note_width,
                note_height: self.note_height,
                board_width: self.width,
                board_height: self.height,
            });
        }
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        for color in &self.colors {
            if color.is_empty() || color.contains(char::is_whitespace) {
                return Err(ConfigError::BadColorToken(color.clone()));
            }
        }
        Ok(())
    }
}

/// Errors raised by [`BoardConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A board dimension is zero.
    #[error("board dimensions must be positive, got {width}x{height}")]
    BoardDimensions { width: u32, height: u32 },

    /// A note dimension is zero.
    #[error("note dimensions must be positive, got {width}x{height}")]
    NoteDimensions { width: u32, height: u32 },

    /// Notes of the configured size cannot fit on the board at all.
    #[error(
        "note size {note_width}x{note_height} does not fit the {board_width}x{board_height} board"
    )]
    NoteTooLarge {
        note_width: u32,
        note_height: u32,
        board_width: u32,
        board_height: u32,
    },

    /// The color list is empty.
    #[error("at least one color is required")]
    NoColors,

    /// A color token is blank or contains whitespace.
    #[error("invalid color token: {0:?}")]
    BadColorToken(String),
}

// ── Filters ───────────────────────────────────────────────────────────────────

/// Criteria for listing notes. Absent clauses match every note; when several
/// are present a note must satisfy all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Exact, case-sensitive color match.
    pub color: Option<String>,
    /// Point the note's rectangle must contain.
    pub contains: Option<(u32, u32)>,
    /// Case-sensitive substring of the note's message.
    pub refers_to: Option<String>,
}

impl NoteFilter {
    /// Returns `true` when no clause is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.contains.is_none() && self.refers_to.is_none()
    }

    /// Returns `true` if `note` satisfies every clause that is set.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(color) = &self.color {
            if note.color != *color {
                return false;
            }
        }
        if let Some((px, py)) = self.contains {
            if !note.contains_point(px, py) {
                return false;
            }
        }
        if let Some(substring) = &self.refers_to {
            if !note.message.contains(substring.as_str()) {
                return false;
            }
        }
        true
    }
}

// ── Board store ───────────────────────────────────────────────────────────────

/// Rule violations raised by board operations.
///
/// The `Display` strings are exactly the descriptions the wire protocol
/// sends after the error code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// The note's rectangle would extend past a board edge.
    #[error("Note exceeds board boundaries")]
    OutOfBounds,

    /// POST named a color outside the configured palette.
    #[error("{color} is not a valid color")]
    ColorNotSupported { color: String },

    /// A note already sits at exactly the requested origin.
    #[error("Note overlaps an existing note entirely")]
    CompleteOverlap,

    /// PIN pointed at a spot no note covers.
    #[error("No note contains the given point")]
    NoNoteAtCoordinate,

    /// UNPIN named coordinates holding no pin.
    #[error("No pin exists at the given coordinates")]
    PinNotFound,
}

/// The authoritative board state: configuration plus insertion-ordered note
/// and pin lists.
///
/// Insertion order is load-bearing twice over: listings report notes and
/// pins in the order they were created, and [`Board::unpin_at`] removes the
/// first matching pin.
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    notes: Vec<Note>,
    pins: Vec<Pin>,
}

impl Board {
    /// Creates an empty board with the given configuration.
    ///
    /// The configuration is trusted here; run [`BoardConfig::validate`]
    /// before constructing the board.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            notes: Vec::new(),
            pins: Vec::new(),
        }
    }

    /// The immutable configuration this board was created with.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Posts a new fixed-size note with its upper-left corner at (`x`, `y`).
    ///
    /// Checks run in a fixed order so that a request violating several rules
    /// always reports the same error: bounds, then color, then overlap.
    ///
    /// # Errors
    ///
    /// [`BoardError::OutOfBounds`] if the rectangle would extend past the
    /// board, [`BoardError::ColorNotSupported`] if `color` is not in the
    /// palette, [`BoardError::CompleteOverlap`] if a note already has this
    /// exact origin.
    pub fn post_note(
        &mut self,
        x: u32,
        y: u32,
        color: &str,
        message: &str,
    ) -> Result<(), BoardError> {
        // Widened arithmetic: x + note_width cannot overflow in u64.
        if u64::from(x) + u64::from(self.config.note_width) > u64::from(self.config.width)
            || u64::from(y) + u64::from(self.config.note_height) > u64::from(self.config.height)
        {
            return Err(BoardError::OutOfBounds);
        }

        if !self.config.colors.iter().any(|c| c == color) {
            return Err(BoardError::ColorNotSupported {
                color: color.to_string(),
            });
        }

        let note = Note {
            x,
            y,
            width: self.config.note_width,
            height: self.config.note_height,
            color: color.to_string(),
            message: message.to_string(),
        };
        if self.notes.iter().any(|n| n.completely_overlaps(&note)) {
            return Err(BoardError::CompleteOverlap);
        }

        self.notes.push(note);
        debug!(x, y, color, total = self.notes.len(), "note posted");
        Ok(())
    }

    /// Adds a pin at (`x`, `y`).
    ///
    /// Always permitted when at least one note covers the point, even if a
    /// pin already sits there; each pin is a distinct entity.
    ///
    /// # Errors
    ///
    /// [`BoardError::NoNoteAtCoordinate`] if no note's rectangle contains
    /// the point.
    pub fn pin_at(&mut self, x: u32, y: u32) -> Result<(), BoardError> {
        if !self.notes.iter().any(|n| n.contains_point(x, y)) {
            return Err(BoardError::NoNoteAtCoordinate);
        }
        self.pins.push(Pin { x, y });
        debug!(x, y, total = self.pins.len(), "pin added");
        Ok(())
    }

    /// Removes the first pin, in insertion order, at exactly (`x`, `y`).
    ///
    /// # Errors
    ///
    /// [`BoardError::PinNotFound`] if no pin has these coordinates.
    pub fn unpin_at(&mut self, x: u32, y: u32) -> Result<(), BoardError> {
        match self.pins.iter().position(|p| p.x == x && p.y == y) {
            Some(index) => {
                self.pins.remove(index);
                debug!(x, y, remaining = self.pins.len(), "pin removed");
                Ok(())
            }
            None => Err(BoardError::PinNotFound),
        }
    }

    /// Removes every currently-unpinned note and returns how many fell off.
    ///
    /// The pin set is evaluated against the state before any removal, so
    /// the removals are simultaneous rather than interleaved. Shaking an
    /// already-shaken board removes nothing and still succeeds.
    pub fn shake(&mut self) -> usize {
        let before = self.notes.len();
        let pins = &self.pins;
        self.notes
            .retain(|note| pins.iter().any(|p| note.contains_point(p.x, p.y)));
        let removed = before - self.notes.len();
        debug!(removed, remaining = self.notes.len(), "board shaken");
        removed
    }

    /// Removes all notes and all pins, returning the removed counts.
    pub fn clear(&mut self) -> (usize, usize) {
        let removed = (self.notes.len(), self.pins.len());
        self.notes.clear();
        self.pins.clear();
        debug!(notes = removed.0, pins = removed.1, "board cleared");
        removed
    }

    /// All current pins in insertion order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Notes satisfying `filter`, in insertion order, each paired with its
    /// pinned status derived at call time.
    pub fn notes(&self, filter: &NoteFilter) -> Vec<(&Note, bool)> {
        self.notes
            .iter()
            .filter(|note| filter.matches(note))
            .map(|note| (note, self.is_pinned(note)))
            .collect()
    }

    /// A note is pinned iff at least one live pin falls inside its
    /// rectangle. Never stored, always derived.
    fn is_pinned(&self, note: &Note) -> bool {
        self.pins.iter().any(|p| note.contains_point(p.x, p.y))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
