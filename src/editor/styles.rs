//! Visual styles for the editor
//!
//! Four fixed looks: bold, red, underline (all 16px body text) and the 24px
//! heading applied through the block type.

use crate::document::{BlockType, InlineStyle, StyleSet};
use eframe::egui::{text::TextFormat, Color32, FontId, Stroke, Visuals};

/// Body text size
pub const BODY_FONT_SIZE: f32 = 16.0;

/// Heading block text size
pub const HEADING_FONT_SIZE: f32 = 24.0;

/// Dark grey used for headings and underlined text
pub const INK: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);

/// Color of red text
pub const RED: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);

/// Extra spacing that makes bold runs stand out (no bold face is bundled)
pub const BOLD_LETTER_SPACING: f32 = 0.6;

/// Vertical gap between blocks
pub const BLOCK_SPACING: f32 = 6.0;

/// Hint shown while the document is empty
pub const PLACEHOLDER: &str =
    "For heading: # + Space | For bold: * + Space | For red text: ** + Space | For underline: *** + Space";

fn font_size(block_type: BlockType) -> f32 {
    match block_type {
        BlockType::HeaderOne => HEADING_FONT_SIZE,
        BlockType::Unstyled => BODY_FONT_SIZE,
    }
}

/// `INK` is unreadable on a dark background, so dark themes use the strong text color.
fn ink(visuals: &Visuals) -> Color32 {
    if visuals.dark_mode {
        visuals.strong_text_color()
    } else {
        INK
    }
}

/// Format for characters with `style` inside a block of `block_type`.
pub fn text_format(block_type: BlockType, style: &StyleSet, visuals: &Visuals) -> TextFormat {
    let bold = block_type == BlockType::HeaderOne || style.contains(&InlineStyle::Bold);
    let underline = style.contains(&InlineStyle::Underline);

    let color = if style.contains(&InlineStyle::Red) {
        RED
    } else if block_type == BlockType::HeaderOne || underline {
        ink(visuals)
    } else if bold {
        visuals.strong_text_color()
    } else {
        visuals.text_color()
    };

    TextFormat {
        font_id: FontId::proportional(font_size(block_type)),
        extra_letter_spacing: if bold { BOLD_LETTER_SPACING } else { 0.0 },
        color,
        underline: if underline {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        },
        ..Default::default()
    }
}

/// Format for the empty-document hint.
pub fn placeholder_format(visuals: &Visuals) -> TextFormat {
    TextFormat {
        font_id: FontId::proportional(BODY_FONT_SIZE),
        color: visuals.weak_text_color(),
        ..Default::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
