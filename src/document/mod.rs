//! Document engine for Sorcerer
//!
//! This module provides the rich-text document behind the editor:
//! - Block model with per-character inline styles
//! - Immutable editor state with undo/redo history
//! - Keystroke-level editing operations
//! - Raw JSON conversion for persistence
//! - The `RichTextEngine` capability trait and its block-backed implementation

pub mod editing;
mod editor_state;
mod engine;
mod model;
mod modifier;
mod raw;

pub use editor_state::EditorState;
pub use engine::{BlockEngine, RichTextEngine};
pub use model::{BlockType, ChangeType, ContentBlock, InlineStyle, Position, StyleSet};
#[cfg(test)]
pub use model::{ContentState, SelectionState};
#[cfg(test)]
pub use raw::RawContent;
