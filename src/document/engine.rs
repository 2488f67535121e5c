//! Rich-text engine capability
//!
//! The shortcut handling and persistence code only talk to a document engine
//! through [`RichTextEngine`]. [`BlockEngine`] is the implementation backed
//! by this crate's block model.

use serde::{de::DeserializeOwned, Serialize};

use super::editor_state::EditorState;
use super::model::{BlockType, ChangeType, ContentState, InlineStyle, SelectionState, StyleSet};
use super::modifier;
use super::raw::{self, RawContent};

/// Operations a rich-text document engine provides.
///
/// States are values: every operation returns a new state.
pub trait RichTextEngine {
    type State: Clone;
    type Content: Clone;
    type Selection: Clone;
    /// Serializable form of `Content`.
    type Raw: Serialize + DeserializeOwned;

    /// State holding one empty unstyled block.
    fn create_empty(&self) -> Self::State;

    /// State over `content`, caret collapsed at the start and unfocused.
    fn create_with_content(&self, content: Self::Content) -> Self::State;

    fn current_content<'a>(&self, state: &'a Self::State) -> &'a Self::Content;

    fn selection<'a>(&self, state: &'a Self::State) -> &'a Self::Selection;

    /// Full text of the block holding the selection start.
    fn start_block_text(&self, content: &Self::Content, selection: &Self::Selection) -> Option<String>;

    fn anchor_offset(&self, selection: &Self::Selection) -> usize;

    /// Selection over `[start, end)` of the block holding the selection start.
    fn select_in_start_block(&self, selection: &Self::Selection, start: usize, end: usize) -> Self::Selection;

    /// Replace the range with `text`; the caret collapses after the inserted text.
    fn replace_text(&self, content: &Self::Content, range: &Self::Selection, text: &str) -> Self::Content;

    /// New state committing `content` as an edit of kind `change_type`.
    fn push(&self, state: &Self::State, content: Self::Content, change_type: ChangeType) -> Self::State;

    fn toggle_inline_style(&self, state: &Self::State, style: InlineStyle) -> Self::State;

    fn toggle_block_type(&self, state: &Self::State, block_type: BlockType) -> Self::State;

    fn convert_to_raw(&self, content: &Self::Content) -> Self::Raw;

    fn convert_from_raw(&self, raw: &Self::Raw) -> Self::Content;

    /// Collapse the caret at the end of the last block, focused.
    fn move_focus_to_end(&self, state: &Self::State) -> Self::State;
}

/// Engine backed by [`EditorState`] and the block model.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockEngine;

impl RichTextEngine for BlockEngine {
    type State = EditorState;
    type Content = ContentState;
    type Selection = SelectionState;
    type Raw = RawContent;

    fn create_empty(&self) -> EditorState {
        EditorState::create_empty()
    }

    fn create_with_content(&self, content: ContentState) -> EditorState {
        EditorState::create_with_content(content)
    }

    fn current_content<'a>(&self, state: &'a EditorState) -> &'a ContentState {
        state.current_content()
    }

    fn selection<'a>(&self, state: &'a EditorState) -> &'a SelectionState {
        state.selection()
    }

    fn start_block_text(&self, content: &ContentState, selection: &SelectionState) -> Option<String> {
        content
            .block_for_key(selection.start_key())
            .map(|block| block.text().to_string())
    }

    fn anchor_offset(&self, selection: &SelectionState) -> usize {
        selection.anchor_offset()
    }

    fn select_in_start_block(&self, selection: &SelectionState, start: usize, end: usize) -> SelectionState {
        SelectionState::within_block(selection.start_key(), start, end)
            .with_focus(selection.has_focus())
    }

    fn replace_text(&self, content: &ContentState, range: &SelectionState, text: &str) -> ContentState {
        modifier::replace_text(content, range, text, &StyleSet::new())
    }

    fn push(&self, state: &EditorState, content: ContentState, change_type: ChangeType) -> EditorState {
        state.push(content, change_type)
    }

    fn toggle_inline_style(&self, state: &EditorState, style: InlineStyle) -> EditorState {
        state.toggle_inline_style(style)
    }

    fn toggle_block_type(&self, state: &EditorState, block_type: BlockType) -> EditorState {
        state.toggle_block_type(block_type)
    }

    fn convert_to_raw(&self, content: &ContentState) -> RawContent {
        raw::convert_to_raw(content)
    }

    fn convert_from_raw(&self, raw: &RawContent) -> ContentState {
        raw::convert_from_raw(raw)
    }

    fn move_focus_to_end(&self, state: &EditorState) -> EditorState {
        state.move_focus_to_end()
    }
}
