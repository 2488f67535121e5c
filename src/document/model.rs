//! Block document model
//!
//! A document is an ordered list of blocks. Each block carries a type tag,
//! its text, and one inline style set per character. Selections address
//! positions by block key and character offset, so they survive edits that
//! insert or remove other blocks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ─────────────────────────────────────────────────────────────────────────────
// Styles and Block Types
// ─────────────────────────────────────────────────────────────────────────────

/// Character-level styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InlineStyle {
    Bold,
    Red,
    Underline,
}

impl InlineStyle {
    /// All styles, in raw-encoding order.
    pub fn all() -> &'static [InlineStyle] {
        &[InlineStyle::Bold, InlineStyle::Red, InlineStyle::Underline]
    }
}

/// Set of inline styles applied to one character.
pub type StyleSet = BTreeSet<InlineStyle>;

/// Block-level type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
}

/// Kind of edit recorded with each pushed state.
///
/// Consecutive edits of the same character-level kind share one undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    BackspaceCharacter,
    DeleteCharacter,
    RemoveRange,
    SplitBlock,
    InsertFragment,
    ChangeBlockType,
    ChangeInlineStyle,
}

impl ChangeType {
    /// Whether consecutive edits of this kind merge into one undo step.
    pub fn is_character_edit(&self) -> bool {
        matches!(
            self,
            ChangeType::InsertCharacters
                | ChangeType::BackspaceCharacter
                | ChangeType::DeleteCharacter
        )
    }

    /// Whether a pending inline style override survives a push of this kind.
    pub fn preserves_style_override(&self) -> bool {
        matches!(self, ChangeType::ChangeBlockType | ChangeType::SplitBlock)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content Block
// ─────────────────────────────────────────────────────────────────────────────

/// One paragraph-like unit of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    key: String,
    block_type: BlockType,
    text: String,
    /// One entry per character of `text`
    styles: Vec<StyleSet>,
    depth: u8,
    data: serde_json::Map<String, serde_json::Value>,
}

impl ContentBlock {
    /// Create an empty block.
    pub fn new(key: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            key: key.into(),
            block_type,
            text: String::new(),
            styles: Vec::new(),
            depth: 0,
            data: serde_json::Map::new(),
        }
    }

    /// Create a block holding unstyled text.
    pub fn with_text(key: impl Into<String>, text: &str, block_type: BlockType) -> Self {
        let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let styles = vec![StyleSet::new(); text.chars().count()];
        Self {
            key: key.into(),
            block_type,
            text,
            styles,
            depth: 0,
            data: serde_json::Map::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn data(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.data
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style of the character at `offset`, empty when out of range.
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.styles.get(offset).cloned().unwrap_or_default()
    }

    /// Styles of every character.
    pub fn styles(&self) -> &[StyleSet] {
        &self.styles
    }

    /// Contiguous runs of identical style as `(start, end, style)` character ranges.
    pub fn style_runs(&self) -> Vec<(usize, usize, &StyleSet)> {
        let mut runs: Vec<(usize, usize, &StyleSet)> = Vec::new();
        for (offset, style) in self.styles.iter().enumerate() {
            if let Some(last) = runs.last_mut() {
                if last.2 == style {
                    last.1 = offset + 1;
                    continue;
                }
            }
            runs.push((offset, offset + 1, style));
        }
        runs
    }

    /// Slice of the text between two character offsets.
    pub fn text_between(&self, start: usize, end: usize) -> &str {
        let end = end.max(start);
        &self.text[self.byte_index(start)..self.byte_index(end)]
    }

    /// Byte index of a character offset, clamped to the text length.
    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Crate-internal mutation (used by the modifier functions)
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub(crate) fn set_depth(&mut self, depth: u8) {
        self.depth = depth;
    }

    pub(crate) fn set_data(&mut self, data: serde_json::Map<String, serde_json::Value>) {
        self.data = data;
    }

    /// Replace `[start, end)` with `text`, giving every inserted character `style`.
    pub(crate) fn splice(&mut self, start: usize, end: usize, text: &str, style: &StyleSet) {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());
        let byte_start = self.byte_index(start);
        let byte_end = self.byte_index(end);
        let inserted: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let count = inserted.chars().count();

        self.text.replace_range(byte_start..byte_end, &inserted);
        self.styles
            .splice(start..end, std::iter::repeat(style.clone()).take(count));
    }

    /// Truncate at `offset`, returning the tail as a new block with `new_key`.
    pub(crate) fn split_off(&mut self, offset: usize, new_key: String) -> ContentBlock {
        let offset = offset.min(self.len());
        let byte = self.byte_index(offset);
        let tail_text = self.text.split_off(byte);
        let tail_styles = self.styles.split_off(offset);
        ContentBlock {
            key: new_key,
            block_type: self.block_type,
            text: tail_text,
            styles: tail_styles,
            depth: self.depth,
            data: serde_json::Map::new(),
        }
    }

    /// Append another block's characters to this one.
    pub(crate) fn append(&mut self, other: &ContentBlock) {
        self.text.push_str(&other.text);
        self.styles.extend(other.styles.iter().cloned());
    }

    /// Add or remove `style` on characters `[start, end)`.
    pub(crate) fn set_style(&mut self, start: usize, end: usize, style: InlineStyle, on: bool) {
        let end = end.min(self.len());
        for set in self.styles.iter_mut().take(end).skip(start) {
            if on {
                set.insert(style);
            } else {
                set.remove(&style);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Positions and Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A caret position: block key plus character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub key: String,
    pub offset: usize,
}

impl Position {
    pub fn new(key: impl Into<String>, offset: usize) -> Self {
        Self {
            key: key.into(),
            offset,
        }
    }
}

/// Anchor/focus selection over the document.
///
/// `start`/`end` are the anchor and focus in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    anchor: Position,
    focus: Position,
    is_backward: bool,
    has_focus: bool,
}

impl SelectionState {
    /// Collapsed selection at `position`.
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
            is_backward: false,
            has_focus: false,
        }
    }

    /// Selection from `anchor` to `focus`, ordered against `content`.
    pub fn new(anchor: Position, focus: Position, content: &ContentState) -> Self {
        let is_backward = content.compare_positions(&focus, &anchor) == std::cmp::Ordering::Less;
        Self {
            anchor,
            focus,
            is_backward,
            has_focus: false,
        }
    }

    /// Forward selection over `[start, end)` of one block.
    pub fn within_block(key: impl Into<String>, start: usize, end: usize) -> Self {
        let key = key.into();
        let (start, end) = (start.min(end), start.max(end));
        Self {
            anchor: Position::new(key.clone(), start),
            focus: Position::new(key, end),
            is_backward: false,
            has_focus: false,
        }
    }

    pub fn anchor(&self) -> &Position {
        &self.anchor
    }

    pub fn focus(&self) -> &Position {
        &self.focus
    }

    #[cfg(test)]
    pub fn anchor_key(&self) -> &str {
        &self.anchor.key
    }

    pub fn anchor_offset(&self) -> usize {
        self.anchor.offset
    }

    pub fn start(&self) -> &Position {
        if self.is_backward {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn end(&self) -> &Position {
        if self.is_backward {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn start_key(&self) -> &str {
        &self.start().key
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    #[must_use]
    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    /// Same as `other`, ignoring focus.
    pub fn same_range(&self, other: &SelectionState) -> bool {
        self.anchor == other.anchor && self.focus == other.focus
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content State
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable-by-convention document content.
///
/// Besides the blocks, content remembers the selection before and after the
/// edit that produced it, so pushing it onto an editor state knows where the
/// caret goes and undo knows where it came from.
#[derive(Debug, Clone)]
pub struct ContentState {
    blocks: Vec<ContentBlock>,
    selection_before: SelectionState,
    selection_after: SelectionState,
    next_key: u64,
}

impl ContentState {
    /// Content with one empty unstyled block.
    pub fn new_empty() -> Self {
        let mut content = Self {
            blocks: Vec::new(),
            selection_before: SelectionState::collapsed(Position::new("", 0)),
            selection_after: SelectionState::collapsed(Position::new("", 0)),
            next_key: 0,
        };
        let key = content.generate_key();
        content.blocks.push(ContentBlock::new(key, BlockType::Unstyled));
        content.reset_selections();
        content
    }

    /// Content from blocks; an empty list becomes one empty block.
    ///
    /// Blocks with empty or duplicate keys are re-keyed.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        if blocks.is_empty() {
            return Self::new_empty();
        }

        let mut content = Self {
            blocks: Vec::with_capacity(blocks.len()),
            selection_before: SelectionState::collapsed(Position::new("", 0)),
            selection_after: SelectionState::collapsed(Position::new("", 0)),
            next_key: 0,
        };
        for mut block in blocks {
            if block.key.is_empty() || content.block_for_key(&block.key).is_some() {
                block.key = content.generate_key();
            }
            content.blocks.push(block);
        }
        content.reset_selections();
        content
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block_for_key(&self, key: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.key == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.key == key)
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &ContentBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block_before(&self, key: &str) -> Option<&ContentBlock> {
        self.index_of(key)
            .and_then(|i| i.checked_sub(1))
            .map(|i| &self.blocks[i])
    }

    pub fn block_after(&self, key: &str) -> Option<&ContentBlock> {
        self.index_of(key).and_then(|i| self.blocks.get(i + 1))
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    /// Text of all blocks joined with newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True for a single empty unstyled block.
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1
            && self.blocks[0].is_empty()
            && self.blocks[0].block_type == BlockType::Unstyled
    }

    /// Position at the very end of the document.
    pub fn end_position(&self) -> Position {
        let last = self.last_block();
        Position::new(last.key.clone(), last.len())
    }

    /// Position at the very start of the document.
    pub fn start_position(&self) -> Position {
        Position::new(self.first_block().key.clone(), 0)
    }

    /// Order two positions by block index, then offset.
    pub fn compare_positions(&self, a: &Position, b: &Position) -> std::cmp::Ordering {
        let ia = self.index_of(&a.key).unwrap_or(usize::MAX);
        let ib = self.index_of(&b.key).unwrap_or(usize::MAX);
        ia.cmp(&ib).then(a.offset.cmp(&b.offset))
    }

    /// Clamp a position into the document (unknown keys map to the end).
    pub fn clamp_position(&self, position: &Position) -> Position {
        match self.block_for_key(&position.key) {
            Some(block) => Position::new(block.key.clone(), position.offset.min(block.len())),
            None => self.end_position(),
        }
    }

    /// Clamp both ends of a selection into this content.
    pub fn clamp_selection(&self, selection: &SelectionState) -> SelectionState {
        SelectionState::new(
            self.clamp_position(selection.anchor()),
            self.clamp_position(selection.focus()),
            self,
        )
        .with_focus(selection.has_focus())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Crate-internal mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate a block key not used by any block of this content.
    pub(crate) fn generate_key(&mut self) -> String {
        loop {
            let key = format!("b{:04x}", self.next_key);
            self.next_key += 1;
            if self.block_for_key(&key).is_none() {
                return key;
            }
        }
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<ContentBlock> {
        &mut self.blocks
    }

    pub(crate) fn block_mut(&mut self, key: &str) -> Option<&mut ContentBlock> {
        self.blocks.iter_mut().find(|b| b.key == key)
    }

    pub(crate) fn set_selections(&mut self, before: SelectionState, after: SelectionState) {
        self.selection_before = before;
        self.selection_after = after;
    }

    fn reset_selections(&mut self) {
        let start = SelectionState::collapsed(self.start_position());
        self.selection_before = start.clone();
        self.selection_after = start;
    }
}

/// Content equality compares blocks only.
impl PartialEq for ContentState {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
