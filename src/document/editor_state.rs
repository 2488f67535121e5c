//! Editor state: content, selection, pending style and undo history
//!
//! `EditorState` is a value. Every operation returns a new state and leaves
//! the old one untouched, so the application can hold exactly one current
//! state and replace it once per input event.

use super::model::{
    BlockType, ChangeType, ContentState, InlineStyle, Position, SelectionState, StyleSet,
};
use super::modifier;

/// Maximum number of undo steps kept.
const MAX_UNDO_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct EditorState {
    current_content: ContentState,
    selection: SelectionState,
    /// Style for the next inserted characters, set by toggling a style at a collapsed caret
    inline_style_override: Option<StyleSet>,
    undo_stack: Vec<ContentState>,
    redo_stack: Vec<ContentState>,
    last_change_type: Option<ChangeType>,
}

impl EditorState {
    /// State over an empty document.
    pub fn create_empty() -> Self {
        Self::create_with_content(ContentState::new_empty())
    }

    /// State over `content` with an unfocused caret at the document start.
    pub fn create_with_content(content: ContentState) -> Self {
        let selection = SelectionState::collapsed(content.start_position());
        Self {
            current_content: content,
            selection,
            inline_style_override: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_change_type: None,
        }
    }

    pub fn current_content(&self) -> &ContentState {
        &self.current_content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Commit `content` as the result of an edit of kind `change_type`.
    ///
    /// The caret moves to the content's "selection after". A new undo step
    /// starts unless this continues a run of the same character-level edit
    /// with the caret where the previous edit left it. Undoing a step puts
    /// the caret back where it was when the step started.
    #[must_use]
    pub fn push(&self, mut content: ContentState, change_type: ChangeType) -> Self {
        let continues_run = self.last_change_type == Some(change_type)
            && change_type.is_character_edit()
            && self
                .selection
                .same_range(self.current_content.selection_after());

        let mut undo_stack = self.undo_stack.clone();
        let selection_before = if continues_run {
            self.current_content.selection_before().clone()
        } else {
            undo_stack.push(self.current_content.clone());
            if undo_stack.len() > MAX_UNDO_SIZE {
                undo_stack.remove(0);
            }
            self.selection.clone()
        };
        let selection_after = content.selection_after().clone();
        content.set_selections(selection_before, selection_after);

        let selection = content
            .selection_after()
            .clone()
            .with_focus(self.selection.has_focus());
        let inline_style_override = if change_type.preserves_style_override() {
            self.inline_style_override.clone()
        } else {
            None
        };

        Self {
            current_content: content,
            selection,
            inline_style_override,
            undo_stack,
            redo_stack: Vec::new(),
            last_change_type: Some(change_type),
        }
    }

    /// Step back one undo step. Returns an identical state when there is none.
    #[must_use]
    pub fn undo(&self) -> Self {
        let mut next = self.clone();
        if let Some(previous) = next.undo_stack.pop() {
            next.selection = self
                .current_content
                .selection_before()
                .clone()
                .with_focus(self.selection.has_focus());
            next.redo_stack.push(std::mem::replace(
                &mut next.current_content,
                previous,
            ));
            next.selection = next.current_content.clamp_selection(&next.selection);
            next.inline_style_override = None;
            next.last_change_type = None;
        }
        next
    }

    /// Re-apply the last undone step.
    #[must_use]
    pub fn redo(&self) -> Self {
        let mut next = self.clone();
        if let Some(following) = next.redo_stack.pop() {
            next.undo_stack
                .push(std::mem::replace(&mut next.current_content, following));
            next.selection = next
                .current_content
                .selection_after()
                .clone()
                .with_focus(self.selection.has_focus());
            next.selection = next.current_content.clamp_selection(&next.selection);
            next.inline_style_override = None;
            next.last_change_type = None;
        }
        next
    }

    /// Replace the selection (caret moves, clicks). Clears any pending style.
    #[must_use]
    pub fn force_selection(&self, selection: SelectionState) -> Self {
        let mut next = self.clone();
        next.selection = self
            .current_content
            .clamp_selection(&selection)
            .with_focus(true);
        next.inline_style_override = None;
        next
    }

    /// Collapse the caret at the end of the document and focus it.
    #[must_use]
    pub fn move_focus_to_end(&self) -> Self {
        self.force_selection(SelectionState::collapsed(
            self.current_content.end_position(),
        ))
    }

    #[must_use]
    pub fn set_inline_style_override(&self, style: StyleSet) -> Self {
        let mut next = self.clone();
        next.inline_style_override = Some(style);
        next
    }

    /// Inline style that the next typed character would get.
    ///
    /// A pending override wins. Otherwise a collapsed caret takes the style of
    /// the character before it, or the first character of its block, or the
    /// last character of the nearest earlier non-empty block. A range takes the
    /// style of its first character.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }

        let content = &self.current_content;
        let start = content.clamp_position(self.selection.start());
        let Some(block) = content.block_for_key(&start.key) else {
            return StyleSet::new();
        };

        if !self.selection.is_collapsed() {
            return if start.offset < block.len() {
                block.style_at(start.offset)
            } else {
                content
                    .block_after(&start.key)
                    .filter(|b| !b.is_empty())
                    .map(|b| b.style_at(0))
                    .unwrap_or_default()
            };
        }

        if start.offset > 0 {
            return block.style_at(start.offset - 1);
        }
        if !block.is_empty() {
            return block.style_at(0);
        }
        self.look_upward_for_inline_style(&start.key)
    }

    fn look_upward_for_inline_style(&self, key: &str) -> StyleSet {
        let content = &self.current_content;
        let Some(index) = content.index_of(key) else {
            return StyleSet::new();
        };
        content.blocks()[..index]
            .iter()
            .rev()
            .find(|b| !b.is_empty())
            .map(|b| b.style_at(b.len() - 1))
            .unwrap_or_default()
    }

    /// Type of the block holding the selection start.
    pub fn current_block_type(&self) -> BlockType {
        self.current_content
            .block_for_key(self.selection.start_key())
            .map(|b| b.block_type())
            .unwrap_or_default()
    }

    /// Toggle an inline style.
    ///
    /// At a collapsed caret this only changes the pending style for the next
    /// characters. Over a range it adds the style to the whole range, or
    /// removes it when the range already starts with it.
    #[must_use]
    pub fn toggle_inline_style(&self, style: InlineStyle) -> Self {
        let mut current = self.current_inline_style();

        if self.selection.is_collapsed() {
            if !current.remove(&style) {
                current.insert(style);
            }
            return self.set_inline_style_override(current);
        }

        let on = !current.contains(&style);
        let content =
            modifier::set_inline_style(&self.current_content, &self.selection, style, on);
        self.push(content, ChangeType::ChangeInlineStyle)
    }

    /// Set `block_type` on the selected blocks, or revert them to unstyled
    /// when the start block already has it.
    #[must_use]
    pub fn toggle_block_type(&self, block_type: BlockType) -> Self {
        let mut target = self.selection.clone();

        // A selection ending at offset 0 of a later block does not touch that block
        let start = self.selection.start();
        let end = self.selection.end();
        if start.key != end.key && end.offset == 0 {
            if let Some(before) = self.current_content.block_before(&end.key) {
                target = SelectionState::new(
                    start.clone(),
                    Position::new(before.key(), before.len()),
                    &self.current_content,
                );
            }
        }

        let type_to_set = if self.current_block_type() == block_type {
            BlockType::Unstyled
        } else {
            block_type
        };
        let content = modifier::set_block_type(&self.current_content, &target, type_to_set);
        self.push(content, ChangeType::ChangeBlockType)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::ContentBlock;

    fn bold() -> StyleSet {
        [InlineStyle::Bold].into_iter().collect()
    }

    fn with_text(text: &str) -> EditorState {
        EditorState::create_with_content(ContentState::from_blocks(vec![
            ContentBlock::with_text("a", text, BlockType::Unstyled),
        ]))
    }

    fn type_at_caret(state: &EditorState, text: &str) -> EditorState {
        let content = modifier::replace_text(
            state.current_content(),
            state.selection(),
            text,
            &state.current_inline_style(),
        );
        state.push(content, ChangeType::InsertCharacters)
    }

    #[test]
    fn test_create_empty() {
        let state = EditorState::create_empty();
        assert!(state.current_content().is_blank());
        assert!(state.selection().is_collapsed());
        assert!(!state.selection().has_focus());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_push_moves_caret_and_records_undo() {
        let state = EditorState::create_empty();
        let next = type_at_caret(&state, "hi");
        assert_eq!(next.current_content().plain_text(), "hi");
        assert_eq!(next.selection().anchor_offset(), 2);
        assert!(next.can_undo());
        assert_eq!(next.last_change_type(), Some(ChangeType::InsertCharacters));
    }

    #[test]
    fn test_consecutive_typing_merges_into_one_undo_step() {
        let mut state = EditorState::create_empty();
        for ch in ["a", "b", "c"] {
            state = type_at_caret(&state, ch);
        }
        assert_eq!(state.undo_count(), 1);

        let undone = state.undo();
        assert_eq!(undone.current_content().plain_text(), "");
        assert!(undone.can_redo());

        let redone = undone.redo();
        assert_eq!(redone.current_content().plain_text(), "abc");
        assert_eq!(redone.selection().anchor_offset(), 3);
    }

    #[test]
    fn test_caret_move_breaks_undo_run() {
        let state = type_at_caret(&EditorState::create_empty(), "ab");
        let moved = state.force_selection(SelectionState::collapsed(Position::new(
            state.current_content().first_block().key(),
            1,
        )));
        let next = type_at_caret(&moved, "x");
        assert_eq!(next.current_content().plain_text(), "axb");
        assert_eq!(next.undo_count(), 2);
    }

    #[test]
    fn test_undo_puts_caret_where_the_step_started() {
        let state = type_at_caret(&EditorState::create_empty(), "ab");
        let moved = state.force_selection(SelectionState::collapsed(Position::new(
            state.current_content().first_block().key(),
            1,
        )));
        let next = type_at_caret(&type_at_caret(&moved, "x"), "y");
        let undone = next.undo();
        assert_eq!(undone.current_content().plain_text(), "ab");
        assert!(undone.selection().is_collapsed());
        assert_eq!(undone.selection().anchor_offset(), 1);
    }

    #[test]
    fn test_undo_ignores_range_recorded_by_the_edit() {
        let state = type_at_caret(&EditorState::create_empty(), "* ");
        let range = SelectionState::within_block(state.current_content().first_block().key(), 0, 2);
        let stripped =
            modifier::replace_text(state.current_content(), &range, "", &StyleSet::new());
        let next = state.push(stripped, ChangeType::ChangeInlineStyle);
        assert_eq!(next.selection().anchor_offset(), 0);

        let undone = next.undo();
        assert_eq!(undone.current_content().plain_text(), "* ");
        assert!(undone.selection().is_collapsed());
        assert_eq!(undone.selection().anchor_offset(), 2);
    }

    #[test]
    fn test_push_clears_redo() {
        let state = type_at_caret(&EditorState::create_empty(), "a");
        let undone = state.undo();
        assert!(undone.can_redo());
        let edited = type_at_caret(&undone, "b");
        assert!(!edited.can_redo());
    }

    #[test]
    fn test_undo_without_history_is_noop() {
        let state = with_text("same");
        let undone = state.undo();
        assert_eq!(undone.current_content(), state.current_content());
    }

    #[test]
    fn test_undo_history_is_capped() {
        let mut state = EditorState::create_empty();
        for _ in 0..(MAX_UNDO_SIZE + 20) {
            state = state.toggle_block_type(BlockType::HeaderOne);
        }
        assert_eq!(state.undo_count(), MAX_UNDO_SIZE);
    }

    #[test]
    fn test_toggle_inline_style_collapsed_sets_override() {
        let state = EditorState::create_empty().toggle_inline_style(InlineStyle::Bold);
        assert_eq!(state.inline_style_override(), Some(&bold()));
        assert_eq!(state.current_inline_style(), bold());

        let typed = type_at_caret(&state, "h");
        assert!(typed.inline_style_override().is_none());
        assert!(typed
            .current_content()
            .first_block()
            .style_at(0)
            .contains(&InlineStyle::Bold));
        // Next character inherits from the previous one
        assert_eq!(typed.current_inline_style(), bold());
    }

    #[test]
    fn test_toggle_inline_style_twice_turns_it_off() {
        let state = EditorState::create_empty()
            .toggle_inline_style(InlineStyle::Bold)
            .toggle_inline_style(InlineStyle::Bold);
        assert_eq!(state.current_inline_style(), StyleSet::new());
    }

    #[test]
    fn test_toggle_inline_style_over_range() {
        let state = with_text("hello");
        let selected = state.force_selection(SelectionState::new(
            Position::new("a", 0),
            Position::new("a", 5),
            state.current_content(),
        ));
        let on = selected.toggle_inline_style(InlineStyle::Red);
        let block = on.current_content().first_block();
        assert!(block
            .styles()
            .iter()
            .all(|s| s.contains(&InlineStyle::Red)));
        assert_eq!(on.last_change_type(), Some(ChangeType::ChangeInlineStyle));

        let off = on.toggle_inline_style(InlineStyle::Red);
        assert!(off
            .current_content()
            .first_block()
            .styles()
            .iter()
            .all(|s| s.is_empty()));
    }

    #[test]
    fn test_style_looks_upward_into_earlier_blocks() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::with_text("a", "bold", BlockType::Unstyled),
            ContentBlock::new("b", BlockType::Unstyled),
        ]);
        let bolded = modifier::set_inline_style(
            &content,
            &SelectionState::new(Position::new("a", 0), Position::new("a", 4), &content),
            InlineStyle::Bold,
            true,
        );
        let state = EditorState::create_with_content(bolded)
            .force_selection(SelectionState::collapsed(Position::new("b", 0)));
        assert_eq!(state.current_inline_style(), bold());
    }

    #[test]
    fn test_toggle_block_type() {
        let state = with_text("title");
        let heading = state.toggle_block_type(BlockType::HeaderOne);
        assert_eq!(heading.current_block_type(), BlockType::HeaderOne);

        let back = heading.toggle_block_type(BlockType::HeaderOne);
        assert_eq!(back.current_block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_block_type_push_preserves_override() {
        let state = EditorState::create_empty()
            .toggle_inline_style(InlineStyle::Underline)
            .toggle_block_type(BlockType::HeaderOne);
        assert!(state.inline_style_override().is_some());
    }

    #[test]
    fn test_move_focus_to_end() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::with_text("a", "one", BlockType::Unstyled),
            ContentBlock::with_text("b", "three", BlockType::Unstyled),
        ]);
        let state = EditorState::create_with_content(content).move_focus_to_end();
        assert_eq!(state.selection().anchor(), &Position::new("b", 5));
        assert!(state.selection().is_collapsed());
        assert!(state.selection().has_focus());
    }
}
