/// A position within a text buffer.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. Positions order row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based row (line) number.
    pub row: u32,
    /// Zero-based column position in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { row: 0, col: 0 };

    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A range of text defined by start and end positions.
///
/// Ranges are half-open intervals [start, end), meaning the start position
/// is included but the end position is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// The start position (inclusive).
    pub start: Position,
    /// The end position (exclusive).
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering `len` cells of a single row starting at `col`.
    pub const fn on_row(row: u32, col: u32, len: u32) -> Self {
        Self {
            start: Position { row, col },
            end: Position {
                row,
                col: col + len,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The same range with `start <= end`. Hosts report selections
    /// anchor-first, so a backwards selection arrives reversed.
    pub fn normalized(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

/// The materialised extent of a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top-left cell.
    pub origin: Position,
    /// Width in cells.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Rect {
    /// Column one past the rightmost cell.
    pub fn end_col(&self) -> u32 {
        self.origin.col + self.width
    }

    /// Last row covered; equals the origin row for a single-line rect.
    pub fn last_row(&self) -> u32 {
        self.origin.row + self.height.saturating_sub(1)
    }

    pub fn spans_row(&self, row: u32) -> bool {
        row >= self.origin.row && row <= self.last_row()
    }

    /// Whether two rects share at least one cell.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let rows = self.origin.row <= other.last_row() && other.origin.row <= self.last_row();
        let cols = self.origin.col < other.end_col() && other.origin.col < self.end_col();
        rows && cols
    }
}

/// Stable handle to a gap: its index in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GapId(pub usize);

impl std::fmt::Display for GapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gap#{}", self.0)
    }
}
