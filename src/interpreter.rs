use tracing::{trace, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::Config;
use crate::error::TemplateError;
use crate::gap::Gap;
use crate::intent::{EditIntent, EditKind, Motion, Outcome};
use crate::registry::{GapRegistry, Resize};
use crate::template;
use crate::traits::{Clipboard, DecorationSink, Document};
use crate::types::{GapId, Position, Range, Rect};

/// Turns host edit intents into gap-preserving document edits.
///
/// Each event runs to completion: registry updates first, then the
/// document calls they imply, then the decoration refresh.
pub struct Interpreter {
    registry: GapRegistry,
    config: Config,
    decorations: Option<Box<dyn DecorationSink>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapSnapshot {
    pub id: GapId,
    pub rect: Rect,
    pub occupancy: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterSnapshot {
    pub gaps: Vec<GapSnapshot>,
}

#[derive(Default)]
pub struct InterpreterBuilder {
    config: Config,
    registry: GapRegistry,
    decorations: Option<Box<dyn DecorationSink>>,
}

impl InterpreterBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: GapRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn decorations(mut self, sink: impl DecorationSink + 'static) -> Self {
        self.decorations = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            registry: self.registry,
            config: self.config,
            decorations: self.decorations,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        InterpreterBuilder::default().build()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("decorations", &self.decorations.is_some())
            .finish()
    }
}

fn is_line_break(cell: &str) -> bool {
    matches!(cell, "\n" | "\r\n" | "\r")
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::default()
    }

    /// Parses `source` and returns an interpreter over its gaps together with
    /// the rendered text the host should load.
    pub fn from_template(source: &str, config: Config) -> Result<(Self, String), TemplateError> {
        let parsed = template::parse(source, &config.template)?;
        let interpreter = Self::builder()
            .config(config)
            .registry(parsed.registry)
            .build();
        Ok((interpreter, parsed.text))
    }

    pub fn set_decorations(&mut self, sink: impl DecorationSink + 'static) {
        self.decorations = Some(Box::new(sink));
    }

    pub fn registry(&self) -> &GapRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> InterpreterSnapshot {
        InterpreterSnapshot {
            gaps: self
                .registry
                .iter()
                .map(|gap| GapSnapshot {
                    id: gap.id(),
                    rect: gap.rect(),
                    occupancy: gap.occupancy().to_vec(),
                })
                .collect(),
        }
    }

    /// Annotates every gap. Call once after the rendered text is loaded.
    pub fn decorate_all(&mut self) {
        self.registry.take_dirty();
        let Some(sink) = self.decorations.as_mut() else {
            return;
        };
        for gap in self.registry.iter() {
            if let Err(err) = sink.annotate_region(gap.id(), gap.rect()) {
                warn!(target: "gaps.interpreter", gap = gap.id().0, error = %err, "decoration_failed");
            }
        }
    }

    /// Where the caret belongs after the host moved it to `caret`: a caret
    /// dropped into the unfilled remainder of a gap row is pulled back to
    /// the end of the row's text. `None` when no correction is needed.
    pub fn settle_caret(&self, caret: Position) -> Option<Position> {
        let id = self.registry.find_gap_at(caret)?;
        let end = self.registry.gap(id).text_end_col(caret.row);
        (caret.col > end).then_some(Position {
            row: caret.row,
            col: end,
        })
    }

    pub fn handle_event<D: Document, C: Clipboard>(
        &mut self,
        doc: &mut D,
        clipboard: &mut C,
        intent: EditIntent,
    ) -> Outcome {
        trace!(
            target: "gaps.interpreter",
            kind = ?intent.kind,
            row = intent.caret.row,
            col = intent.caret.col,
            selection = ?intent.selection,
            "edit_intent"
        );
        let outcome = match intent.kind {
            EditKind::Navigate(motion) => self.navigate(doc, motion, &intent),
            _ => self.edit(doc, clipboard, &intent),
        };
        self.refresh_decorations();
        outcome
    }

    fn navigate<D: Document>(&mut self, doc: &mut D, motion: Motion, intent: &EditIntent) -> Outcome {
        let caret = intent.caret;
        match motion {
            Motion::Right if intent.active_selection().is_none() => {
                let Some(id) = self.registry.find_gap_at(caret) else {
                    return Outcome::PassThrough;
                };
                let gap = self.registry.gap(id);
                if caret.col != gap.text_end_col(caret.row) {
                    return Outcome::PassThrough;
                }
                // Hop over the unfilled remainder and the cell after the gap.
                let target = doc.clamp(Position {
                    row: caret.row,
                    col: gap.rect().end_col() + 1,
                });
                trace!(target: "gaps.interpreter", gap = id.0, col = target.col, "skip_unfilled");
                doc.move_caret_to(target);
                Outcome::Handled
            }
            Motion::NextGap => {
                let Some(id) = self.registry.next_gap(caret) else {
                    return Outcome::PassThrough;
                };
                let gap = self.registry.gap(id);
                let target = Position {
                    row: gap.origin().row,
                    col: gap.text_end_col(gap.origin().row),
                };
                doc.clear_selection();
                doc.move_caret_to(target);
                Outcome::Handled
            }
            _ => Outcome::PassThrough,
        }
    }

    fn edit<D: Document, C: Clipboard>(
        &mut self,
        doc: &mut D,
        clipboard: &mut C,
        intent: &EditIntent,
    ) -> Outcome {
        let caret = match intent.active_selection() {
            Some(selection) => {
                // Gap rules only cover selections inside a single gap.
                let Some(id) = self.gap_holding(selection) else {
                    return Outcome::PassThrough;
                };
                self.edit_selection(doc, clipboard, id, selection, &intent.kind)
            }
            None => {
                let Some(id) = self.registry.find_gap_at(intent.caret) else {
                    return Outcome::PassThrough;
                };
                let caret = self.clamp_to_text(id, intent.caret);
                self.edit_at_caret(doc, id, caret, &intent.kind)
            }
        };
        doc.clear_selection();
        doc.move_caret_to(caret);
        Outcome::Handled
    }

    fn edit_at_caret<D: Document>(
        &mut self,
        doc: &mut D,
        id: GapId,
        caret: Position,
        kind: &EditKind,
    ) -> Position {
        match kind {
            EditKind::InsertChar(c) => self.insert_str(doc, id, caret, c.encode_utf8(&mut [0; 4])),
            EditKind::InsertText(text) => self.insert_str(doc, id, caret, text),
            EditKind::Backspace => self.backspace(doc, id, caret),
            EditKind::ForwardDelete => self.forward_delete(doc, id, caret),
            // Nothing selected, nothing to cut; the host must still not cut
            // the line out from under the gap.
            EditKind::Cut | EditKind::Navigate(_) => caret,
        }
    }

    fn edit_selection<D: Document, C: Clipboard>(
        &mut self,
        doc: &mut D,
        clipboard: &mut C,
        id: GapId,
        selection: Range,
        kind: &EditKind,
    ) -> Position {
        let removed = self.delete_selection(doc, id, selection);
        let caret = self.clamp_to_text(id, selection.start);
        match kind {
            EditKind::Cut => {
                if !removed.is_empty() {
                    clipboard.set(removed);
                }
                caret
            }
            EditKind::InsertChar(c) => self.insert_str(doc, id, caret, c.encode_utf8(&mut [0; 4])),
            EditKind::InsertText(text) => self.insert_str(doc, id, caret, text),
            EditKind::Backspace | EditKind::ForwardDelete | EditKind::Navigate(_) => caret,
        }
    }

    fn gap_holding(&self, selection: Range) -> Option<GapId> {
        let id = self.registry.find_gap_at(selection.start)?;
        self.registry
            .gap(id)
            .contains_caret(selection.end)
            .then_some(id)
    }

    fn clamp_to_text(&self, id: GapId, caret: Position) -> Position {
        let end = self.registry.gap(id).text_end_col(caret.row);
        Position {
            row: caret.row,
            col: caret.col.min(end),
        }
    }

    fn filler(&self, cells: u32) -> String {
        std::iter::repeat_n(self.config.template.filler, cells as usize).collect()
    }

    /// Types `text` one grapheme at a time. Rejected graphemes are skipped;
    /// the first capacity refusal ends the insertion.
    fn insert_str<D: Document>(
        &mut self,
        doc: &mut D,
        id: GapId,
        mut caret: Position,
        text: &str,
    ) -> Position {
        for cell in text.graphemes(true) {
            let next = if is_line_break(cell) {
                if !self.registry.gap(id).is_multi_line() {
                    continue;
                }
                self.split_row(doc, id, caret)
            } else if self.config.input.accepts(cell) {
                self.insert_cell(doc, id, caret, cell)
            } else {
                trace!(target: "gaps.interpreter", gap = id.0, ?cell, "rejected_char");
                continue;
            };
            match next {
                Some(pos) => caret = pos,
                None => {
                    trace!(target: "gaps.interpreter", gap = id.0, "gap_full");
                    break;
                }
            }
        }
        caret
    }

    fn insert_cell<D: Document>(
        &mut self,
        doc: &mut D,
        id: GapId,
        caret: Position,
        cell: &str,
    ) -> Option<Position> {
        let gap = self.registry.gap(id);
        let origin = gap.origin();
        let row = caret.row - origin.row;
        let width = gap.width();
        if gap.row_occupancy(row) == width {
            if !gap.can_grow_width() {
                return None;
            }
            // The new cell itself widens this row; the others get filler.
            let resize = self.registry.adjust_occupancy(id, row, 1);
            self.repad_rows(doc, id, resize, Some(row));
        } else {
            self.registry.adjust_occupancy(id, row, 1);
            doc.remove_range(Range::on_row(caret.row, origin.col + width - 1, 1));
        }
        doc.insert_text(caret, cell);
        Some(Position {
            row: caret.row,
            col: caret.col + 1,
        })
    }

    /// Removes the user character at `offset` of a gap row, then either
    /// narrows the gap or refills the row to keep its width.
    fn delete_cell<D: Document>(&mut self, doc: &mut D, id: GapId, doc_row: u32, offset: u32) {
        let origin = self.registry.gap(id).origin();
        let row = doc_row - origin.row;
        let resize = self.registry.adjust_occupancy(id, row, -1);
        doc.remove_range(Range::on_row(doc_row, origin.col + offset, 1));
        if resize.new < resize.old {
            self.repad_rows(doc, id, resize, Some(row));
        } else {
            let at = Position {
                row: doc_row,
                col: origin.col + resize.old - 1,
            };
            doc.insert_text(at, &self.filler(1));
        }
    }

    fn backspace<D: Document>(&mut self, doc: &mut D, id: GapId, caret: Position) -> Position {
        let gap = self.registry.gap(id);
        let origin = gap.origin();
        let row = caret.row - origin.row;
        let offset = caret.col - origin.col;
        if offset > 0 && gap.row_occupancy(row) > 0 {
            self.delete_cell(doc, id, caret.row, offset - 1);
            return Position {
                row: caret.row,
                col: caret.col - 1,
            };
        }
        if offset == 0 && row > 0 {
            return self.merge_row_up(doc, id, caret).unwrap_or(caret);
        }
        caret
    }

    fn forward_delete<D: Document>(&mut self, doc: &mut D, id: GapId, caret: Position) -> Position {
        let gap = self.registry.gap(id);
        let origin = gap.origin();
        let offset = caret.col - origin.col;
        if offset < gap.row_occupancy(caret.row - origin.row) {
            self.delete_cell(doc, id, caret.row, offset);
        }
        caret
    }

    /// Enter inside a multi-line gap: the text after the caret moves to a
    /// new row beneath it.
    fn split_row<D: Document>(&mut self, doc: &mut D, id: GapId, caret: Position) -> Option<Position> {
        let gap = self.registry.gap(id);
        let origin = gap.origin();
        let row = caret.row - origin.row;
        let at = caret.col - origin.col;
        let moved = gap.row_occupancy(row) - at;
        let tail = doc.read_range(Range::on_row(caret.row, caret.col, moved));

        let resize = self.registry.split_row(id, row, at)?;

        // Both rows keep the old width until the final repad.
        doc.remove_range(Range::on_row(caret.row, caret.col, moved));
        let refill = Position {
            row: caret.row,
            col: origin.col + resize.old - moved,
        };
        doc.insert_text(refill, &self.filler(moved));

        let mut line = String::from("\n");
        line.push_str(&" ".repeat(origin.col as usize));
        line.push_str(&tail);
        line.push_str(&self.filler(resize.old - moved));
        let line_end = Position {
            row: caret.row,
            col: doc.line_len(caret.row),
        };
        doc.insert_text(line_end, &line);

        self.repad_rows(doc, id, resize, None);
        Some(Position {
            row: caret.row + 1,
            col: origin.col,
        })
    }

    /// Backspace at the start of a lower gap row: the row's text joins the
    /// row above and the row's line is deleted.
    fn merge_row_up<D: Document>(&mut self, doc: &mut D, id: GapId, caret: Position) -> Option<Position> {
        let gap = self.registry.gap(id);
        let origin = gap.origin();
        let row = caret.row - origin.row;
        let moved = gap.row_occupancy(row);
        let above = gap.row_occupancy(row - 1);
        let text = doc.read_range(Range::on_row(caret.row, origin.col, moved));

        let resize = self.registry.merge_row_up(id, row)?;

        let above_row = caret.row - 1;
        doc.remove_range(Range {
            start: Position {
                row: above_row,
                col: doc.line_len(above_row),
            },
            end: Position {
                row: caret.row,
                col: doc.line_len(caret.row),
            },
        });
        let joined = Position {
            row: above_row,
            col: origin.col + above,
        };
        doc.insert_text(joined, &text);
        let surplus = resize.old + moved - resize.new;
        if surplus > 0 {
            doc.remove_range(Range::on_row(above_row, origin.col + resize.new, surplus));
        }
        self.repad_rows(doc, id, resize, Some(row - 1));
        Some(joined)
    }

    /// Deletes the user text inside `selection`, bottom row first, and
    /// returns it with rows joined by newlines. Filler cells are skipped.
    fn delete_selection<D: Document>(&mut self, doc: &mut D, id: GapId, selection: Range) -> String {
        let mut rows = Vec::new();
        for doc_row in (selection.start.row..=selection.end.row).rev() {
            let gap = self.registry.gap(id);
            let origin = gap.origin();
            let occupied = gap.row_occupancy(doc_row - origin.row);
            let from = if doc_row == selection.start.row {
                selection.start.col - origin.col
            } else {
                0
            }
            .min(occupied);
            let to = if doc_row == selection.end.row {
                selection.end.col - origin.col
            } else {
                occupied
            }
            .min(occupied);

            if to <= from {
                rows.push(String::new());
                continue;
            }
            rows.push(doc.read_range(Range::on_row(doc_row, origin.col + from, to - from)));
            for _ in from..to {
                self.delete_cell(doc, id, doc_row, from);
            }
        }
        if rows.iter().all(String::is_empty) {
            return String::new();
        }
        rows.reverse();
        rows.join("\n")
    }

    /// Brings every row of a resized gap (except `skip`, which the caller
    /// fixes itself) to the new width by adding or dropping trailing filler.
    fn repad_rows<D: Document>(&self, doc: &mut D, id: GapId, resize: Resize, skip: Option<u32>) {
        if resize.new == resize.old {
            return;
        }
        let gap: &Gap = self.registry.gap(id);
        let origin = gap.origin();
        for row in (0..gap.height()).filter(|row| Some(*row) != skip) {
            let doc_row = origin.row + row;
            if resize.new > resize.old {
                let at = Position {
                    row: doc_row,
                    col: origin.col + resize.old,
                };
                doc.insert_text(at, &self.filler(resize.new - resize.old));
            } else {
                doc.remove_range(Range::on_row(
                    doc_row,
                    origin.col + resize.new,
                    resize.old - resize.new,
                ));
            }
        }
    }

    fn refresh_decorations(&mut self) {
        let dirty = self.registry.take_dirty();
        let Some(sink) = self.decorations.as_mut() else {
            return;
        };
        for (id, changes) in dirty {
            let Some(gap) = self.registry.get(id) else {
                continue;
            };
            trace!(target: "gaps.interpreter", gap = id.0, ?changes, "decoration_refresh");
            let refreshed = sink
                .clear_region(id)
                .and_then(|()| sink.annotate_region(id, gap.rect()));
            if let Err(err) = refreshed {
                warn!(target: "gaps.interpreter", gap = id.0, error = %err, "decoration_failed");
            }
        }
    }
}
