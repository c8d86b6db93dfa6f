//! Note and pin value types.
//!
//! A note is a fixed-size rectangle identified by its upper-left corner; a pin
//! is a bare point. Containment uses the half-open rule (upper-left edge
//! inclusive, lower-right edge exclusive), so horizontally or vertically
//! adjacent notes never share a covered point.

/// A rectangular note on the board.
///
/// Width and height are copied from the board configuration at creation time;
/// every note on a given board has the same size. Notes are never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// X coordinate of the upper-left corner.
    pub x: u32,
    /// Y coordinate of the upper-left corner.
    pub y: u32,
    /// Width in board units.
    pub width: u32,
    /// Height in board units.
    pub height: u32,
    /// Color token; always a member of the board's configured colors.
    pub color: String,
    /// Message text; non-empty, may contain spaces.
    pub message: String,
}

impl Note {
    /// Returns `true` if the point (`px`, `py`) lies inside this note's
    /// rectangle: `x <= px < x + width` and `y <= py < y + height`.
    pub fn contains_point(&self, px: u32, py: u32) -> bool {
        px >= self.x && px - self.x < self.width && py >= self.y && py - self.y < self.height
    }

    /// Returns `true` if `other` has exactly the same upper-left corner.
    ///
    /// All notes share one fixed size, so an identical origin means the
    /// rectangles coincide completely. Partial overlap is permitted and
    /// deliberately not detected.
    pub fn completely_overlaps(&self, other: &Note) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// A pin anchoring every note whose rectangle contains its point.
///
/// Pins are distinct entities: several pins may sit at the same coordinates,
/// and an unpin removes only the first of them in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    /// X coordinate of the pin point.
    pub x: u32,
    /// Y coordinate of the pin point.
    pub y: u32,
}
