use tracing::debug;

use crate::error::LayoutError;
use crate::gap::{Gap, GapSpec, Geometry, MAX_EXTENT, SpecFault};
use crate::types::{GapId, Position};

/// Width of a gap before and after an occupancy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub old: u32,
    pub new: u32,
}

impl Resize {
    pub fn unchanged(width: u32) -> Self {
        Self {
            old: width,
            new: width,
        }
    }
}

/// All gaps of one document, in navigation order. Gap geometry only
/// changes through the operations here, so every resize carries its
/// sibling shifts with it.
#[derive(Debug, Clone, Default)]
pub struct GapRegistry {
    gaps: Vec<Gap>,
}

impl GapRegistry {
    /// Builds a registry from specs and origins in navigation order.
    ///
    /// Every spec must be satisfiable, no two gaps may overlap at their
    /// initial size, and a multi-line gap may not share a row with another
    /// gap.
    pub fn new(specs: impl IntoIterator<Item = (GapSpec, Position)>) -> Result<Self, LayoutError> {
        let specs: Vec<(GapSpec, Position)> = specs.into_iter().collect();
        for (i, (spec, _)) in specs.iter().enumerate() {
            spec.check().map_err(|fault| layout_fault(GapId(i), fault))?;
        }
        let registry = Self::from_checked(specs);
        registry.check_layout()?;
        Ok(registry)
    }

    /// Registry over specs the caller has already validated.
    pub(crate) fn from_checked(specs: impl IntoIterator<Item = (GapSpec, Position)>) -> Self {
        let gaps = specs
            .into_iter()
            .enumerate()
            .map(|(i, (spec, origin))| Gap::new(GapId(i), spec, origin))
            .collect();
        Self { gaps }
    }

    fn check_layout(&self) -> Result<(), LayoutError> {
        for (i, a) in self.gaps.iter().enumerate() {
            for b in &self.gaps[i + 1..] {
                if a.rect().overlaps(&b.rect()) {
                    return Err(LayoutError::Overlap {
                        first: a.id(),
                        second: b.id(),
                    });
                }
                for (multi, other) in [(a, b), (b, a)] {
                    if multi.is_multi_line() && multi.rect().spans_row(other.origin().row) {
                        return Err(LayoutError::SharedRows {
                            gap: multi.id(),
                            other: other.id(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn get(&self, id: GapId) -> Option<&Gap> {
        self.gaps.get(id.0)
    }

    /// Gap lookup for ids handed out by this registry.
    pub(crate) fn gap(&self, id: GapId) -> &Gap {
        &self.gaps[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gap> {
        self.gaps.iter()
    }

    /// The gap with a cell at `pos`, else the gap `pos` sits one past the
    /// end of. Where two gaps touch, the shared column belongs to the right
    /// one. Linear scan; gap counts per document are small.
    pub fn find_gap_at(&self, pos: Position) -> Option<GapId> {
        self.gaps
            .iter()
            .find(|gap| gap.covers(pos))
            .or_else(|| self.gaps.iter().find(|gap| gap.contains_caret(pos)))
            .map(Gap::id)
    }

    /// The gap after the one holding `pos`, or the first gap starting after
    /// `pos` when it is in none. Wraps to the first gap.
    pub fn next_gap(&self, pos: Position) -> Option<GapId> {
        if self.gaps.is_empty() {
            return None;
        }
        let next = match self.find_gap_at(pos) {
            Some(id) => (id.0 + 1) % self.gaps.len(),
            None => self
                .gaps
                .iter()
                .position(|gap| gap.origin() > pos)
                .unwrap_or(0),
        };
        Some(GapId(next))
    }

    /// Changes the occupancy of one gap row by `delta` and resizes the gap
    /// to match, shifting siblings on its rows.
    pub fn adjust_occupancy(&mut self, id: GapId, row: u32, delta: i32) -> Resize {
        let gap = &mut self.gaps[id.0];
        let old = gap.width();
        match gap.grow_width_if_needed(row, delta) {
            Some(new) => {
                self.resize(id, new);
                Resize { old, new }
            }
            None => Resize::unchanged(old),
        }
    }

    /// Splits `row` at offset `at`: the occupancy past `at` moves onto a new
    /// row inserted beneath it, and every gap below moves down one row.
    /// `None` when the gap is already at its maximum height.
    pub fn split_row(&mut self, id: GapId, row: u32, at: u32) -> Option<Resize> {
        let gap = &mut self.gaps[id.0];
        let moved = gap.row_occupancy(row).saturating_sub(at);
        if !gap.insert_row(row, moved) {
            return None;
        }
        let boundary = gap.origin().row + row + 1;
        debug!(target: "gaps.registry", gap = id.0, row, moved, height = gap.height(), "row_inserted");
        self.shift_rows_below(boundary, 1, id);
        Some(self.fit_width(id))
    }

    /// Removes `row` (never the first), appending its occupancy to the row
    /// above, and moves every gap below up one row. `None` when that would
    /// break the height floor or overflow the row above.
    pub fn merge_row_up(&mut self, id: GapId, row: u32) -> Option<Resize> {
        let gap = &mut self.gaps[id.0];
        if row == 0 || !gap.can_shrink_height() {
            return None;
        }
        let merged = gap.row_occupancy(row - 1) + gap.row_occupancy(row);
        if gap.max_width().is_some_and(|max| merged > max) {
            return None;
        }
        let moved = gap.remove_row(row)?;
        gap.add_to_row(row - 1, moved);
        let boundary = gap.origin().row + row + 1;
        debug!(target: "gaps.registry", gap = id.0, row, moved, height = gap.height(), "row_removed");
        self.shift_rows_below(boundary, -1, id);
        Some(self.fit_width(id))
    }

    /// Moves every gap other than `except` whose origin row is at or below
    /// `from_row` by `delta` rows.
    pub fn shift_rows_below(&mut self, from_row: u32, delta: i32, except: GapId) {
        for gap in self.gaps.iter_mut() {
            if gap.id() != except && gap.origin().row >= from_row {
                gap.shift(delta, 0);
            }
        }
    }

    /// Moves the siblings to the right of `id` by `delta` columns after `id`
    /// changed width by `delta`. Only gaps starting at or past the old right
    /// edge on one of `id`'s rows move, so left-to-right order is kept.
    pub fn shift_width(&mut self, id: GapId, delta: i32) {
        let rect = self.gaps[id.0].rect();
        let old_end = (rect.end_col() as i64 - delta as i64).max(0) as u32;
        for gap in self.gaps.iter_mut() {
            if gap.id() != id && rect.spans_row(gap.origin().row) && gap.origin().col >= old_end {
                gap.shift(0, delta);
            }
        }
    }

    /// Collects and resets the geometry changes of every gap.
    pub fn take_dirty(&mut self) -> Vec<(GapId, Geometry)> {
        self.gaps
            .iter_mut()
            .filter_map(|gap| {
                let dirty = gap.take_dirty();
                (!dirty.is_empty()).then(|| (gap.id(), dirty))
            })
            .collect()
    }

    fn fit_width(&mut self, id: GapId) -> Resize {
        let gap = &self.gaps[id.0];
        let old = gap.width();
        let new = gap.required_width();
        if new != old {
            self.resize(id, new);
        }
        Resize { old, new }
    }

    fn resize(&mut self, id: GapId, new: u32) {
        let gap = &mut self.gaps[id.0];
        let old = gap.width();
        gap.set_width(new);
        debug!(target: "gaps.registry", gap = id.0, old, new, "width_resized");
        self.shift_width(id, new as i32 - old as i32);
    }
}

fn layout_fault(gap: GapId, fault: SpecFault) -> LayoutError {
    match fault {
        SpecFault::TooLarge { dimension, value } => LayoutError::TooLarge {
            gap,
            dimension,
            value,
            limit: MAX_EXTENT,
        },
        SpecFault::InvertedBounds { dimension, min, max } => LayoutError::InvertedBounds {
            gap,
            dimension,
            min,
            max,
        },
        SpecFault::ZeroHeight => LayoutError::ZeroHeight { gap },
    }
}
