use crate::traits::Document;
use crate::types::{Position, Range};

/// Caret motions a host may report.
///
/// Only `Right` and `NextGap` are acted on; the others are listed so hosts
/// can forward every motion without filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    /// Jump to the next gap in template order, wrapping at the end.
    NextGap,
    /// Any other host motion (word, page, document ends, ...).
    Other,
}

/// What the user asked the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    Navigate(Motion),
    /// A typed character. `'\n'` is the Enter key.
    InsertChar(char),
    /// Pasted text.
    InsertText(String),
    Backspace,
    ForwardDelete,
    Cut,
}

/// One edit-intent event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditIntent {
    pub kind: EditKind,
    pub caret: Position,
    /// Active selection, if any. An empty range counts as no selection.
    pub selection: Option<Range>,
}

impl EditIntent {
    pub fn new(kind: EditKind, caret: Position) -> Self {
        Self {
            kind,
            caret,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Range) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Builds an intent from the host's current caret and selection.
    pub fn from_document<D: Document + ?Sized>(kind: EditKind, doc: &D) -> Self {
        Self {
            kind,
            caret: doc.caret(),
            selection: doc.selection(),
        }
    }

    /// The selection with its ends ordered, or `None` when nothing is
    /// selected.
    pub fn active_selection(&self) -> Option<Range> {
        self.selection
            .map(Range::normalized)
            .filter(|range| !range.is_empty())
    }
}

/// Whether the host should still run its own handling of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The event was consumed; the host must suppress its default handling.
    Handled,
    /// The event does not concern any gap; the host handles it as usual.
    PassThrough,
}
