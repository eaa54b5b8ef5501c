use crate::error::Dimension;
use crate::types::{GapId, Position, Rect};

bitflags::bitflags! {
    /// Geometry changes a gap has gone through since its decoration was
    /// last refreshed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Geometry: u8 {
        const WIDTH  = 0b0001;
        const HEIGHT = 0b0010;
        const ORIGIN = 0b0100;
    }
}

/// Size bounds of a gap as written in its template specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapSpec {
    pub min_width: u32,
    /// `None` means the gap may grow without limit.
    pub max_width: Option<u32>,
    pub min_height: u32,
    pub max_height: u32,
}

impl GapSpec {
    /// Single-line gap with the given width bounds.
    pub const fn single_line(min_width: u32, max_width: Option<u32>) -> Self {
        Self {
            min_width,
            max_width,
            min_height: 1,
            max_height: 1,
        }
    }

    pub const fn is_multi_line(&self) -> bool {
        self.max_height > 1
    }

    /// Rejects bounds no gap can satisfy, and sizes past [`MAX_EXTENT`].
    pub(crate) fn check(&self) -> Result<(), SpecFault> {
        let bounds = [
            (Dimension::Width, Some(self.min_width)),
            (Dimension::Width, self.max_width),
            (Dimension::Height, Some(self.min_height)),
            (Dimension::Height, Some(self.max_height)),
        ];
        if let Some((dimension, value)) = bounds
            .into_iter()
            .find_map(|(dimension, value)| Some((dimension, value.filter(|v| *v > MAX_EXTENT)?)))
        {
            return Err(SpecFault::TooLarge { dimension, value });
        }
        if let Some(max) = self.max_width
            && max < self.min_width
        {
            return Err(SpecFault::InvertedBounds {
                dimension: Dimension::Width,
                min: self.min_width,
                max,
            });
        }
        if self.min_height == 0 {
            return Err(SpecFault::ZeroHeight);
        }
        if self.max_height < self.min_height {
            return Err(SpecFault::InvertedBounds {
                dimension: Dimension::Height,
                min: self.min_height,
                max: self.max_height,
            });
        }
        Ok(())
    }
}

/// Largest width or height a gap specifier may ask for, in cells or rows.
pub const MAX_EXTENT: u32 = 10_000;

/// Why a [`GapSpec`] was rejected. Callers attach their own location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecFault {
    TooLarge { dimension: Dimension, value: u32 },
    InvertedBounds { dimension: Dimension, min: u32, max: u32 },
    ZeroHeight,
}

/// A rectangular region of the document reserved for user-entered text.
///
/// `width` is the width currently materialised in the document. Every
/// completed operation leaves it equal to `max(min_width, max(occupancy))`;
/// it is stored rather than derived so a resize can compare against the
/// layout the document still holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    id: GapId,
    spec: GapSpec,
    origin: Position,
    occupancy: Vec<u32>,
    width: u32,
    dirty: Geometry,
}

impl Gap {
    pub(crate) fn new(id: GapId, spec: GapSpec, origin: Position) -> Self {
        Self {
            id,
            spec,
            origin,
            occupancy: vec![0; spec.min_height as usize],
            width: spec.min_width,
            dirty: Geometry::empty(),
        }
    }

    pub fn id(&self) -> GapId {
        self.id
    }

    pub fn spec(&self) -> GapSpec {
        self.spec
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.occupancy.len() as u32
    }

    pub fn min_width(&self) -> u32 {
        self.spec.min_width
    }

    pub fn max_width(&self) -> Option<u32> {
        self.spec.max_width
    }

    pub fn min_height(&self) -> u32 {
        self.spec.min_height
    }

    pub fn max_height(&self) -> u32 {
        self.spec.max_height
    }

    pub fn is_multi_line(&self) -> bool {
        self.spec.is_multi_line()
    }

    pub fn rect(&self) -> Rect {
        Rect {
            origin: self.origin,
            width: self.width,
            height: self.height(),
        }
    }

    pub fn occupancy(&self) -> &[u32] {
        &self.occupancy
    }

    /// User-entered characters on `row`, counted from the gap's first row.
    /// Rows outside the gap hold nothing.
    pub fn row_occupancy(&self, row: u32) -> u32 {
        self.occupancy.get(row as usize).copied().unwrap_or(0)
    }

    /// True when `pos` is on one of the gap's rows and on one of its cells.
    /// A zero-width gap covers its origin.
    pub fn covers(&self, pos: Position) -> bool {
        self.rect().spans_row(pos.row)
            && pos.col >= self.origin.col
            && (pos.col < self.rect().end_col() || pos.col == self.origin.col)
    }

    /// True when `pos` is on one of the gap's rows and no further right than
    /// one cell past the rectangle, which is where the caret sits after the
    /// last character of a full row.
    pub fn contains_caret(&self, pos: Position) -> bool {
        self.rect().spans_row(pos.row) && pos.col >= self.origin.col && pos.col <= self.rect().end_col()
    }

    /// Column just after the user text of a document row.
    pub fn text_end_col(&self, doc_row: u32) -> u32 {
        let row = doc_row.saturating_sub(self.origin.row);
        self.origin.col + self.row_occupancy(row)
    }

    pub fn can_grow_width(&self) -> bool {
        self.spec.max_width.is_none_or(|max| self.width < max)
    }

    pub fn can_grow_height(&self) -> bool {
        self.height() < self.spec.max_height
    }

    pub fn can_shrink_height(&self) -> bool {
        self.height() > self.spec.min_height
    }

    /// Width the occupancy vector calls for.
    pub fn required_width(&self) -> u32 {
        let widest = self.occupancy.iter().copied().max().unwrap_or(0);
        widest.max(self.spec.min_width)
    }

    /// Adjusts the occupancy of `row` by `delta` and returns the width the
    /// gap must be resized to, if it differs from the current one. The
    /// caller (the registry) applies the resize and shifts siblings.
    pub(crate) fn grow_width_if_needed(&mut self, row: u32, delta: i32) -> Option<u32> {
        let slot = &mut self.occupancy[row as usize];
        *slot = slot.saturating_add_signed(delta);
        let required = self.required_width();
        (required != self.width).then_some(required)
    }

    pub(crate) fn set_width(&mut self, width: u32) {
        if width != self.width {
            self.width = width;
            self.dirty |= Geometry::WIDTH;
        }
    }

    /// Inserts a row after `after_row` holding `moved` characters taken from
    /// the end of `after_row`.
    pub(crate) fn insert_row(&mut self, after_row: u32, moved: u32) -> bool {
        if !self.can_grow_height() {
            return false;
        }
        let src = after_row as usize;
        self.occupancy[src] -= moved;
        self.occupancy.insert(src + 1, moved);
        self.dirty |= Geometry::HEIGHT;
        true
    }

    /// Removes `row`, returning its occupancy so the caller can place it.
    pub(crate) fn remove_row(&mut self, row: u32) -> Option<u32> {
        if !self.can_shrink_height() || row as usize >= self.occupancy.len() {
            return None;
        }
        self.dirty |= Geometry::HEIGHT;
        Some(self.occupancy.remove(row as usize))
    }

    pub(crate) fn add_to_row(&mut self, row: u32, count: u32) {
        self.occupancy[row as usize] += count;
    }

    pub(crate) fn shift(&mut self, rows: i32, cols: i32) {
        self.origin.row = self.origin.row.saturating_add_signed(rows);
        self.origin.col = self.origin.col.saturating_add_signed(cols);
        self.dirty |= Geometry::ORIGIN;
    }

    pub(crate) fn take_dirty(&mut self) -> Geometry {
        std::mem::take(&mut self.dirty)
    }
}
