//! Content transformations
//!
//! Every function takes content plus a target selection and returns new
//! content. The returned content records the target as its "selection
//! before" and the natural caret position as its "selection after".

use super::model::{BlockType, ContentState, InlineStyle, Position, SelectionState, StyleSet};

fn inserted_len(text: &str) -> usize {
    text.chars().filter(|c| *c != '\n' && *c != '\r').count()
}

/// Remove everything between two clamped positions, merging the end block
/// into the start block when they differ.
fn remove_between(content: &mut ContentState, start: &Position, end: &Position) {
    if start.key == end.key {
        if let Some(block) = content.block_mut(&start.key) {
            block.splice(start.offset, end.offset, "", &StyleSet::new());
        }
        return;
    }

    let (Some(start_index), Some(end_index)) =
        (content.index_of(&start.key), content.index_of(&end.key))
    else {
        return;
    };

    let blocks = content.blocks_mut();
    let tail = blocks[end_index].split_off(end.offset, String::new());
    let start_len = blocks[start_index].len();
    blocks[start_index].splice(start.offset, start_len, "", &StyleSet::new());
    blocks[start_index].append(&tail);
    blocks.drain(start_index + 1..=end_index);
}

/// Ordered, clamped `(start, end)` of a selection.
fn clamped_range(content: &ContentState, selection: &SelectionState) -> (Position, Position) {
    (
        content.clamp_position(selection.start()),
        content.clamp_position(selection.end()),
    )
}

/// Remove the selected range.
pub fn remove_range(content: &ContentState, selection: &SelectionState) -> ContentState {
    let (start, end) = clamped_range(content, selection);
    let mut next = content.clone();
    remove_between(&mut next, &start, &end);
    next.set_selections(
        selection.clone(),
        SelectionState::collapsed(start).with_focus(selection.has_focus()),
    );
    next
}

/// Replace the selected range with `text`, styling inserted characters with `style`.
///
/// Line breaks in `text` are dropped; use [`split_block`] for those.
pub fn replace_text(
    content: &ContentState,
    selection: &SelectionState,
    text: &str,
    style: &StyleSet,
) -> ContentState {
    let (start, end) = clamped_range(content, selection);
    let mut next = content.clone();
    remove_between(&mut next, &start, &end);

    if let Some(block) = next.block_mut(&start.key) {
        block.splice(start.offset, start.offset, text, style);
    }

    let after = Position::new(start.key.clone(), start.offset + inserted_len(text));
    next.set_selections(
        selection.clone(),
        SelectionState::collapsed(after).with_focus(selection.has_focus()),
    );
    next
}

/// Split the block at the selection, removing any selected range first.
///
/// Splitting a styled block at its very end starts an unstyled block.
pub fn split_block(content: &ContentState, selection: &SelectionState) -> ContentState {
    let (start, end) = clamped_range(content, selection);
    let mut next = content.clone();
    remove_between(&mut next, &start, &end);

    let Some(index) = next.index_of(&start.key) else {
        return next;
    };
    let new_key = next.generate_key();
    let blocks = next.blocks_mut();
    let mut tail = blocks[index].split_off(start.offset, new_key.clone());
    if tail.is_empty() {
        tail.set_block_type(BlockType::Unstyled);
        tail.set_depth(0);
    }
    blocks.insert(index + 1, tail);

    next.set_selections(
        selection.clone(),
        SelectionState::collapsed(Position::new(new_key, 0)).with_focus(selection.has_focus()),
    );
    next
}

/// Add (`on == true`) or remove an inline style over the selected range.
pub fn set_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: InlineStyle,
    on: bool,
) -> ContentState {
    let (start, end) = clamped_range(content, selection);
    let mut next = content.clone();

    if let (Some(start_index), Some(end_index)) =
        (content.index_of(&start.key), content.index_of(&end.key))
    {
        for (index, block) in next
            .blocks_mut()
            .iter_mut()
            .enumerate()
            .take(end_index + 1)
            .skip(start_index)
        {
            let from = if index == start_index { start.offset } else { 0 };
            let to = if index == end_index {
                end.offset
            } else {
                block.len()
            };
            block.set_style(from, to, style, on);
        }
    }

    next.set_selections(selection.clone(), selection.clone());
    next
}

/// Set the type of every block touched by the selection.
pub fn set_block_type(
    content: &ContentState,
    selection: &SelectionState,
    block_type: BlockType,
) -> ContentState {
    let (start, end) = clamped_range(content, selection);
    let mut next = content.clone();

    if let (Some(start_index), Some(end_index)) =
        (content.index_of(&start.key), content.index_of(&end.key))
    {
        for block in next
            .blocks_mut()
            .iter_mut()
            .take(end_index + 1)
            .skip(start_index)
        {
            block.set_block_type(block_type);
        }
    }

    next.set_selections(selection.clone(), selection.clone());
    next
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
