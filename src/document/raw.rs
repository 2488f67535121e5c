//! Raw JSON form of a document
//!
//! This is the persisted shape: a list of blocks with their text, type and
//! inline style ranges, plus an entity map. Offsets and lengths count
//! characters.

use serde::{Deserialize, Serialize};

use super::model::{BlockType, ContentBlock, ContentState, InlineStyle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    /// Accepted for compatibility; nothing in this editor creates entities.
    #[serde(default)]
    pub entity_map: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub depth: u8,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

/// Convert content to its raw form.
///
/// Each style gets one range per maximal run of characters carrying it.
pub fn convert_to_raw(content: &ContentState) -> RawContent {
    let blocks = content
        .blocks()
        .iter()
        .map(|block| RawBlock {
            key: block.key().to_string(),
            text: block.text().to_string(),
            block_type: block.block_type(),
            depth: block.depth(),
            inline_style_ranges: style_ranges(block),
            entity_ranges: Vec::new(),
            data: block.data().clone(),
        })
        .collect();

    RawContent {
        blocks,
        entity_map: serde_json::Map::new(),
    }
}

fn style_ranges(block: &ContentBlock) -> Vec<RawStyleRange> {
    let mut ranges = Vec::new();
    for &style in InlineStyle::all() {
        let mut run_start: Option<usize> = None;
        for (offset, set) in block.styles().iter().enumerate() {
            match (set.contains(&style), run_start) {
                (true, None) => run_start = Some(offset),
                (false, Some(start)) => {
                    ranges.push(RawStyleRange {
                        offset: start,
                        length: offset - start,
                        style,
                    });
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            ranges.push(RawStyleRange {
                offset: start,
                length: block.len() - start,
                style,
            });
        }
    }
    ranges
}

/// Convert a raw form back into content.
///
/// Style ranges running past the end of their block are clamped; missing or
/// duplicate keys are regenerated. Line breaks inside a block's text are
/// dropped and the style ranges shifted to match.
pub fn convert_from_raw(raw: &RawContent) -> ContentState {
    let blocks = raw
        .blocks
        .iter()
        .map(|raw_block| {
            let mut block =
                ContentBlock::with_text(raw_block.key.as_str(), &raw_block.text, raw_block.block_type);
            block.set_depth(raw_block.depth);
            block.set_data(raw_block.data.clone());

            let offsets = block_offsets(&raw_block.text);
            let raw_len = offsets.len() - 1;
            for range in &raw_block.inline_style_ranges {
                let start = offsets[range.offset.min(raw_len)];
                let end = offsets[range.offset.saturating_add(range.length).min(raw_len)];
                if start < end {
                    block.set_style(start, end, range.style, true);
                }
            }
            block
        })
        .collect();

    ContentState::from_blocks(blocks)
}

/// Maps each character offset of raw text (plus the end) to the offset in
/// the block text, which has line breaks removed.
fn block_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut kept = 0;
    for c in text.chars() {
        offsets.push(kept);
        if c != '\n' && c != '\r' {
            kept += 1;
        }
    }
    offsets.push(kept);
    offsets
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
