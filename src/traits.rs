use crate::error::DecorationError;
use crate::types::{GapId, Position, Range, Rect};

/// The host text surface. Positions use the same row/grapheme-column space
/// as [`Position`]; the interpreter never touches text any other way.
pub trait Document {
    // Basic queries
    fn line_count(&self) -> u32;
    fn line_len(&self, row: u32) -> u32; // grapheme columns, newline excluded

    // Primitive edits, applied immediately
    fn insert_text(&mut self, at: Position, text: &str);
    fn remove_range(&mut self, range: Range);
    fn read_range(&self, range: Range) -> String;

    // Caret and selection
    fn caret(&self) -> Position;
    fn selection(&self) -> Option<Range>;
    fn move_caret_to(&mut self, pos: Position);
    fn clear_selection(&mut self);

    fn clamp(&self, pos: Position) -> Position {
        let last_row = self.line_count().saturating_sub(1);
        let row = pos.row.min(last_row);
        let col = pos.col.min(self.line_len(row));
        Position { row, col }
    }
}

/// Receives gap outlines for on-screen highlighting. Purely cosmetic.
pub trait DecorationSink {
    fn annotate_region(&mut self, id: GapId, rect: Rect) -> Result<(), DecorationError>;
    fn clear_region(&mut self, id: GapId) -> Result<(), DecorationError>;
}

/// Destination of cut text. Pastes arrive as [`EditKind::InsertText`], so
/// the host reads its clipboard itself.
///
/// [`EditKind::InsertText`]: crate::intent::EditKind::InsertText
pub trait Clipboard {
    fn set(&mut self, text: String);
}

/// Clipboard backed by the operating system via `arboard`.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set(&mut self, text: String) {
        if let Err(err) = self.inner.set_text(text) {
            tracing::warn!(target: "gaps.clipboard", error = %err, "clipboard_set_failed");
        }
    }
}
