#![allow(dead_code)] // Each test binary uses a subset of the helpers.

pub mod mock_clipboard;
pub mod mock_document;
pub mod recording_sink;

use gap_fill::{Config, EditIntent, EditKind, Interpreter, Outcome, Position, Range};

use mock_clipboard::MockClipboard;
use mock_document::MockDocument;

/// An interpreter loaded from a template, the host document holding its
/// rendered text, and a clipboard.
pub struct Session {
    pub interp: Interpreter,
    pub doc: MockDocument,
    pub clipboard: MockClipboard,
}

impl Session {
    pub fn load(template: &str) -> Self {
        Self::load_with(template, Config::default())
    }

    pub fn load_with(template: &str, config: Config) -> Self {
        let (interp, text) = Interpreter::from_template(template, config).expect("template parses");
        Self {
            interp,
            doc: MockDocument::new(&text),
            clipboard: MockClipboard::new(),
        }
    }

    pub fn at(&mut self, row: u32, col: u32) -> &mut Self {
        self.doc.set_caret(Position { row, col });
        self
    }

    pub fn select(&mut self, start: (u32, u32), end: (u32, u32)) -> &mut Self {
        self.doc.set_selection(Range {
            start: Position::new(start.0, start.1),
            end: Position::new(end.0, end.1),
        });
        self
    }

    pub fn send(&mut self, kind: EditKind) -> Outcome {
        let intent = EditIntent::from_document(kind, &self.doc);
        self.interp.handle_event(&mut self.doc, &mut self.clipboard, intent)
    }

    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            let _ = self.send(EditKind::InsertChar(c));
        }
    }

    pub fn text(&self) -> String {
        self.doc.text()
    }

    pub fn caret(&self) -> Position {
        self.doc.caret_pos()
    }

    pub fn width(&self, gap: usize) -> u32 {
        self.interp.snapshot().gaps[gap].rect.width
    }

    pub fn occupancy(&self, gap: usize) -> Vec<u32> {
        self.interp.snapshot().gaps[gap].occupancy.clone()
    }
}
