//! Shared annotation data model for scrubbed text.
//!
//! An annotation tags a half-open `[start, end)` byte interval of the
//! *current* buffer with a payload: a raw style bundle, a semantic role, or
//! an origin-offset record that maps post-edit offsets back to the original
//! text. The list is insertion-ordered; a run that is still in effect has
//! `end == None` until a later event closes it.

use serde::Serialize;

/// Raw display attributes decoded from an SGR (`ESC [ ... m`) sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
    pub reverse: bool,
    pub standout: bool,
    /// Base foreground color index (0-7), if any.
    pub fg: Option<u8>,
    /// Base background color index (0-7), if any.
    pub bg: Option<u8>,
}

impl TextStyle {
    /// A style that sets no attribute and no color.
    pub fn is_empty(&self) -> bool {
        !self.bold
            && !self.dim
            && !self.underline
            && !self.reverse
            && !self.standout
            && self.fg.is_none()
            && self.bg.is_none()
    }

    /// Shorthand used by the overstrike decoder.
    pub fn bold() -> Self {
        TextStyle {
            bold: true,
            ..TextStyle::default()
        }
    }

    /// Shorthand used by the overstrike decoder.
    pub fn underline() -> Self {
        TextStyle {
            underline: true,
            ..TextStyle::default()
        }
    }
}

/// Semantic display tag, independent of raw color/attribute bits.
///
/// Discriminants are the wire codes carried by the private `ESC [ <code> O`
/// sequence; code `-1` is the "no role" sentinel and is never a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum Role {
    Text = 0,
    Identifier,
    SearchHit,
    Ok,
    Error,
    Warning,
    Status,
    AlertStatus,
    ActiveStatus,
}

impl Role {
    const ALL: [Role; 9] = [
        Role::Text,
        Role::Identifier,
        Role::SearchHit,
        Role::Ok,
        Role::Error,
        Role::Warning,
        Role::Status,
        Role::AlertStatus,
        Role::ActiveStatus,
    ];

    /// Map a raw wire code onto a role. Codes outside the valid range are
    /// "no role", not an error.
    pub fn from_code(code: i32) -> Option<Role> {
        if code < 0 {
            return None;
        }
        Role::ALL.get(code as usize).copied()
    }

    /// The wire code carried by the role-marker escape sequence.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Payload carried by one annotation range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Payload {
    Style(TextStyle),
    Role(Role),
    /// Cumulative number of bytes removed from the original text before the
    /// start of this range: `original_offset = current_offset + removed`.
    OriginOffset(usize),
}

/// One `[start, end)` range over the current buffer, tagged with a payload.
/// `end == None` marks a run that is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub start: usize,
    pub end: Option<usize>,
    pub payload: Payload,
}

impl Annotation {
    pub fn new(start: usize, end: Option<usize>, payload: Payload) -> Self {
        Annotation {
            start,
            end,
            payload,
        }
    }
}

/// Insertion-ordered list of annotations for one line.
pub type AnnotationList = Vec<Annotation>;

/// Shift every offset at or after `at` left by `removed` bytes, clamping at
/// the deletion point. Called after a sequence of `removed` bytes starting at
/// `at` has been deleted from the buffer.
pub fn shift_annotations(list: &mut [Annotation], at: usize, removed: usize) {
    for ann in list.iter_mut() {
        if ann.start >= at {
            ann.start = ann.start.saturating_sub(removed).max(at);
        }
        if let Some(end) = ann.end {
            if end >= at {
                ann.end = Some(end.saturating_sub(removed).max(at));
            }
        }
    }
}

/// Close every open run in the list by setting its `end` to the given offset.
/// Scans backward so the most recently opened runs are found first.
pub fn close_open_runs(list: &mut [Annotation], end: usize) {
    for ann in list.iter_mut().rev() {
        if ann.end.is_none() {
            ann.end = Some(end);
        }
    }
}
