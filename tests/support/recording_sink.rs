use std::cell::RefCell;
use std::rc::Rc;

use gap_fill::traits::DecorationSink;
use gap_fill::{DecorationError, GapId, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Annotate(GapId, Rect),
    Clear(GapId),
}

/// Decoration sink that logs every call into a shared buffer, optionally
/// failing each one.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn result(&self) -> Result<(), DecorationError> {
        if self.fail {
            Err(DecorationError("sink offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DecorationSink for RecordingSink {
    fn annotate_region(&mut self, id: GapId, rect: Rect) -> Result<(), DecorationError> {
        self.calls.borrow_mut().push(Call::Annotate(id, rect));
        self.result()
    }

    fn clear_region(&mut self, id: GapId) -> Result<(), DecorationError> {
        self.calls.borrow_mut().push(Call::Clear(id));
        self.result()
    }
}
