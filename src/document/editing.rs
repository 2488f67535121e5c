//! Keystroke-level edits
//!
//! These turn one raw user action (a typed character, Backspace, an arrow
//! key, a click) into the proposed next `EditorState`. They never look at
//! the text for formatting shortcuts; that happens afterwards on the
//! proposed state.

use super::editor_state::EditorState;
use super::model::{ChangeType, Position, SelectionState};
use super::modifier;

/// Caret motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    BlockStart,
    BlockEnd,
    DocumentStart,
    DocumentEnd,
}

/// Insert typed or pasted text at the selection.
///
/// Single-line text is a character insertion; text with line breaks is
/// inserted as a fragment spanning several blocks.
pub fn insert_text(state: &EditorState, text: &str) -> EditorState {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.is_empty() {
        return state.clone();
    }

    let style = state.current_inline_style();
    let selection = state.selection();

    if !text.contains('\n') {
        let content =
            modifier::replace_text(state.current_content(), selection, &text, &style);
        return state.push(content, ChangeType::InsertCharacters);
    }

    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    let mut content = modifier::replace_text(state.current_content(), selection, first, &style);
    for line in lines {
        let caret = content.selection_after().clone();
        content = modifier::split_block(&content, &caret);
        let caret = content.selection_after().clone();
        content = modifier::replace_text(&content, &caret, line, &style);
    }
    state.push(content, ChangeType::InsertFragment)
}

/// Backspace: delete the selection, the character before the caret, or
/// join with the previous block.
///
/// At the very start of the document nothing happens, even in a heading.
pub fn backspace(state: &EditorState) -> EditorState {
    let content = state.current_content();
    let selection = state.selection();

    if !selection.is_collapsed() {
        return state.push(
            modifier::remove_range(content, selection),
            ChangeType::RemoveRange,
        );
    }

    let caret = content.clamp_position(selection.focus());
    let target = if caret.offset > 0 {
        Position::new(caret.key.clone(), caret.offset - 1)
    } else if let Some(previous) = content.block_before(&caret.key) {
        Position::new(previous.key(), previous.len())
    } else {
        return state.clone();
    };

    let range = SelectionState::new(target, caret, content).with_focus(selection.has_focus());
    state.push(
        modifier::remove_range(content, &range),
        ChangeType::BackspaceCharacter,
    )
}

/// Forward delete: delete the selection, the character after the caret,
/// or pull the next block into this one.
pub fn delete_forward(state: &EditorState) -> EditorState {
    let content = state.current_content();
    let selection = state.selection();

    if !selection.is_collapsed() {
        return state.push(
            modifier::remove_range(content, selection),
            ChangeType::RemoveRange,
        );
    }

    let caret = content.clamp_position(selection.focus());
    let block_len = content
        .block_for_key(&caret.key)
        .map(|b| b.len())
        .unwrap_or_default();
    let target = if caret.offset < block_len {
        Position::new(caret.key.clone(), caret.offset + 1)
    } else if let Some(next) = content.block_after(&caret.key) {
        Position::new(next.key(), 0)
    } else {
        return state.clone();
    };

    let range = SelectionState::new(caret, target, content).with_focus(selection.has_focus());
    state.push(
        modifier::remove_range(content, &range),
        ChangeType::DeleteCharacter,
    )
}

/// Enter: split the current block at the caret.
pub fn split_block(state: &EditorState) -> EditorState {
    let content = modifier::split_block(state.current_content(), state.selection());
    state.push(content, ChangeType::SplitBlock)
}

/// Move the caret, or extend the selection when `extend` is set.
pub fn move_caret(state: &EditorState, motion: Motion, extend: bool) -> EditorState {
    let content = state.current_content();
    let selection = state.selection();

    if !extend && !selection.is_collapsed() {
        match motion {
            Motion::Left => return collapse_at(state, selection.start().clone()),
            Motion::Right => return collapse_at(state, selection.end().clone()),
            _ => {}
        }
    }

    let focus = content.clamp_position(selection.focus());
    let Some(block) = content.block_for_key(&focus.key) else {
        return state.clone();
    };

    let target = match motion {
        Motion::Left if focus.offset > 0 => Position::new(focus.key.clone(), focus.offset - 1),
        Motion::Left => content
            .block_before(&focus.key)
            .map(|b| Position::new(b.key(), b.len()))
            .unwrap_or(focus.clone()),
        Motion::Right if focus.offset < block.len() => {
            Position::new(focus.key.clone(), focus.offset + 1)
        }
        Motion::Right => content
            .block_after(&focus.key)
            .map(|b| Position::new(b.key(), 0))
            .unwrap_or(focus.clone()),
        Motion::Up => content
            .block_before(&focus.key)
            .map(|b| Position::new(b.key(), focus.offset.min(b.len())))
            .unwrap_or_else(|| Position::new(focus.key.clone(), 0)),
        Motion::Down => content
            .block_after(&focus.key)
            .map(|b| Position::new(b.key(), focus.offset.min(b.len())))
            .unwrap_or_else(|| Position::new(focus.key.clone(), block.len())),
        Motion::BlockStart => Position::new(focus.key.clone(), 0),
        Motion::BlockEnd => Position::new(focus.key.clone(), block.len()),
        Motion::DocumentStart => content.start_position(),
        Motion::DocumentEnd => content.end_position(),
    };

    place_caret(state, target, extend)
}

/// Put the caret at `position` (a click), extending the selection when `extend` is set.
pub fn place_caret(state: &EditorState, position: Position, extend: bool) -> EditorState {
    let content = state.current_content();
    if extend {
        let anchor = state.selection().anchor().clone();
        state.force_selection(SelectionState::new(anchor, position, content))
    } else {
        collapse_at(state, position)
    }
}

fn collapse_at(state: &EditorState, position: Position) -> EditorState {
    state.force_selection(SelectionState::collapsed(position))
}

/// Select the whole document.
pub fn select_all(state: &EditorState) -> EditorState {
    let content = state.current_content();
    state.force_selection(SelectionState::new(
        content.start_position(),
        content.end_position(),
        content,
    ))
}

/// Text covered by the selection, blocks joined with newlines.
pub fn selected_text(state: &EditorState) -> String {
    let content = state.current_content();
    let selection = state.selection();
    let start = content.clamp_position(selection.start());
    let end = content.clamp_position(selection.end());
    let (Some(start_index), Some(end_index)) =
        (content.index_of(&start.key), content.index_of(&end.key))
    else {
        return String::new();
    };

    content.blocks()[start_index..=end_index]
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let from = if i == 0 { start.offset } else { 0 };
            let to = if start_index + i == end_index {
                end.offset
            } else {
                block.len()
            };
            block.text_between(from, to)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{BlockType, ContentBlock, ContentState, InlineStyle};

    fn type_str(mut state: EditorState, text: &str) -> EditorState {
        for ch in text.chars() {
            state = insert_text(&state, &ch.to_string());
        }
        state
    }

    fn two_blocks() -> EditorState {
        EditorState::create_with_content(ContentState::from_blocks(vec![
            ContentBlock::with_text("a", "one", BlockType::HeaderOne),
            ContentBlock::with_text("b", "two", BlockType::Unstyled),
        ]))
    }

    fn caret(state: &EditorState) -> (String, usize) {
        let focus = state.selection().focus();
        (focus.key.clone(), focus.offset)
    }

    #[test]
    fn test_typing_builds_text() {
        let state = type_str(EditorState::create_empty(), "hello");
        assert_eq!(state.current_content().plain_text(), "hello");
        assert_eq!(state.selection().anchor_offset(), 5);
    }

    #[test]
    fn test_insert_empty_text_is_noop() {
        let state = EditorState::create_empty();
        let next = insert_text(&state, "");
        assert!(!next.can_undo());
    }

    #[test]
    fn test_paste_multiline_creates_blocks() {
        let state = insert_text(&EditorState::create_empty(), "one\r\ntwo\nthree");
        let content = state.current_content();
        assert_eq!(content.blocks().len(), 3);
        assert_eq!(content.plain_text(), "one\ntwo\nthree");
        assert_eq!(state.selection().anchor_offset(), 5);
        assert_eq!(state.last_change_type(), Some(ChangeType::InsertFragment));

        let undone = state.undo();
        assert!(undone.current_content().is_blank());
    }

    #[test]
    fn test_backspace_removes_previous_character() {
        let state = backspace(&type_str(EditorState::create_empty(), "abc"));
        assert_eq!(state.current_content().plain_text(), "ab");
        assert_eq!(state.selection().anchor_offset(), 2);
    }

    #[test]
    fn test_backspace_joins_blocks() {
        let state = two_blocks();
        let at_b = place_caret(&state, Position::new("b", 0), false);
        let joined = backspace(&at_b);
        let content = joined.current_content();
        assert_eq!(content.blocks().len(), 1);
        assert_eq!(content.plain_text(), "onetwo");
        assert_eq!(content.first_block().block_type(), BlockType::HeaderOne);
        assert_eq!(caret(&joined), ("a".to_string(), 3));
    }

    #[test]
    fn test_backspace_at_document_start_keeps_heading() {
        let state = two_blocks();
        let next = backspace(&state);
        assert_eq!(next.current_block_type(), BlockType::HeaderOne);
        assert_eq!(next.current_content().plain_text(), "one\ntwo");
        assert!(!next.can_undo());
    }

    #[test]
    fn test_backspace_at_start_of_blank_document_is_noop() {
        let state = EditorState::create_empty();
        let next = backspace(&state);
        assert!(!next.can_undo());
    }

    #[test]
    fn test_backspace_removes_selection() {
        let state = select_all(&two_blocks());
        let cleared = backspace(&state);
        assert_eq!(cleared.current_content().plain_text(), "");
        assert_eq!(cleared.last_change_type(), Some(ChangeType::RemoveRange));
    }

    #[test]
    fn test_delete_forward() {
        let state = place_caret(&two_blocks(), Position::new("a", 1), false);
        let next = delete_forward(&state);
        assert_eq!(next.current_content().plain_text(), "oe\ntwo");
        assert_eq!(caret(&next), ("a".to_string(), 1));

        let at_end = place_caret(&two_blocks(), Position::new("a", 3), false);
        let pulled = delete_forward(&at_end);
        assert_eq!(pulled.current_content().plain_text(), "onetwo");

        let doc_end = move_caret(&two_blocks(), Motion::DocumentEnd, false);
        assert!(!delete_forward(&doc_end).can_undo());
    }

    #[test]
    fn test_split_block() {
        let state = type_str(EditorState::create_empty(), "ab");
        let state = move_caret(&state, Motion::Left, false);
        let split = split_block(&state);
        let content = split.current_content();
        assert_eq!(content.plain_text(), "a\nb");
        assert_eq!(split.selection().anchor_offset(), 0);
        assert_eq!(split.selection().anchor_key(), content.blocks()[1].key());
    }

    #[test]
    fn test_enter_carries_style_into_new_block() {
        let state = EditorState::create_empty().toggle_inline_style(InlineStyle::Bold);
        let state = type_str(state, "hi");
        let state = split_block(&state);
        let state = type_str(state, "x");
        let second = &state.current_content().blocks()[1];
        assert_eq!(second.text(), "x");
        assert!(second.style_at(0).contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_move_caret_across_blocks() {
        let state = place_caret(&two_blocks(), Position::new("a", 3), false);
        let right = move_caret(&state, Motion::Right, false);
        assert_eq!(caret(&right), ("b".to_string(), 0));
        let left = move_caret(&right, Motion::Left, false);
        assert_eq!(caret(&left), ("a".to_string(), 3));
        let down = move_caret(&state, Motion::Down, false);
        assert_eq!(caret(&down), ("b".to_string(), 3));
        let up = move_caret(&down, Motion::Up, false);
        assert_eq!(caret(&up), ("a".to_string(), 3));
        let home = move_caret(&state, Motion::BlockStart, false);
        assert_eq!(caret(&home), ("a".to_string(), 0));
    }

    #[test]
    fn test_shift_motion_extends_selection() {
        let state = place_caret(&two_blocks(), Position::new("a", 1), false);
        let extended = move_caret(&state, Motion::BlockEnd, true);
        assert!(!extended.selection().is_collapsed());
        assert_eq!(selected_text(&extended), "ne");

        let collapsed = move_caret(&extended, Motion::Left, false);
        assert_eq!(caret(&collapsed), ("a".to_string(), 1));
    }

    #[test]
    fn test_selected_text_across_blocks() {
        let state = select_all(&two_blocks());
        assert_eq!(selected_text(&state), "one\ntwo");
    }

    #[test]
    fn test_caret_move_clears_pending_style() {
        let state = EditorState::create_empty().toggle_inline_style(InlineStyle::Red);
        let moved = move_caret(&state, Motion::DocumentEnd, false);
        assert!(moved.inline_style_override().is_none());
    }
}
