use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use gap_fill::traits::Document;
use gap_fill::types::{Position, Range};

/// Rope-backed host document. Columns are grapheme clusters.
pub struct MockDocument {
    rope: Rope,
    caret: Position,
    selection: Option<Range>,
}

impl MockDocument {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: Position::ZERO,
            selection: None,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line(&self, row: u32) -> String {
        self.line_str(row)
    }

    pub fn set_caret(&mut self, pos: Position) {
        self.caret = pos;
        self.selection = None;
    }

    pub fn set_selection(&mut self, range: Range) {
        self.caret = range.end;
        self.selection = Some(range);
    }

    pub fn caret_pos(&self) -> Position {
        self.caret
    }

    pub fn selection_range(&self) -> Option<Range> {
        self.selection
    }

    fn line_str(&self, row: u32) -> String {
        if row as usize >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(row as usize).to_string();
        // Remove trailing newline if present
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn char_index(&self, pos: Position) -> usize {
        let line_start = self.rope.line_to_char(pos.row as usize);
        let offset: usize = self
            .line_str(pos.row)
            .graphemes(true)
            .take(pos.col as usize)
            .map(|g| g.chars().count())
            .sum();
        line_start + offset
    }

    fn char_range(&self, range: Range) -> std::ops::Range<usize> {
        let range = range.normalized();
        self.char_index(range.start)..self.char_index(range.end)
    }
}

impl Document for MockDocument {
    fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }

    fn line_len(&self, row: u32) -> u32 {
        self.line_str(row).graphemes(true).count() as u32
    }

    fn insert_text(&mut self, at: Position, text: &str) {
        let idx = self.char_index(at);
        self.rope.insert(idx, text);
    }

    fn remove_range(&mut self, range: Range) {
        let chars = self.char_range(range);
        self.rope.remove(chars);
    }

    fn read_range(&self, range: Range) -> String {
        let chars = self.char_range(range);
        self.rope.slice(chars).to_string()
    }

    fn caret(&self) -> Position {
        self.caret
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn move_caret_to(&mut self, pos: Position) {
        self.caret = pos;
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }
}
