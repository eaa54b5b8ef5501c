pub mod config;
pub mod error;
pub mod gap;
pub mod intent;
pub mod interpreter;
pub mod registry;
pub mod template;
pub mod traits;
pub mod types;

pub use crate::config::{Config, InputConfig, TemplateConfig};
pub use crate::error::{ConfigError, DecorationError, Dimension, LayoutError, TemplateError};
pub use crate::gap::{Gap, GapSpec, Geometry, MAX_EXTENT};
pub use crate::intent::{EditIntent, EditKind, Motion, Outcome};
pub use crate::interpreter::{GapSnapshot, Interpreter, InterpreterBuilder, InterpreterSnapshot};
pub use crate::registry::{GapRegistry, Resize};
pub use crate::template::{ParsedTemplate, escape, parse};
#[cfg(feature = "clipboard")]
pub use crate::traits::SystemClipboard;
pub use crate::traits::{Clipboard, DecorationSink, Document};
pub use crate::types::{GapId, Position, Range, Rect};
