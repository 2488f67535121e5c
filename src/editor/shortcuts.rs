//! Markdown-like formatting shortcuts
//!
//! After every edit the text in front of the caret is checked against a small
//! fixed table of triggers. A match deletes the trigger text and toggles the
//! matching style:
//!
//! | Typed   | Effect                     |
//! |---------|----------------------------|
//! | `# `    | heading block              |
//! | `* `    | bold                       |
//! | `** `   | red text                   |
//! | `*** `  | underline                  |
//!
//! A trigger only fires when it is the whole start of the block and the
//! caret sits right after it.

use crate::document::{BlockType, ChangeType, InlineStyle, RichTextEngine};
use log::debug;

/// What a trigger turns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    Block(BlockType),
    Inline(InlineStyle),
}

impl StyleTarget {
    /// Change type recorded when the trigger text is removed.
    fn change_type(&self) -> ChangeType {
        match self {
            StyleTarget::Block(_) => ChangeType::ChangeBlockType,
            StyleTarget::Inline(_) => ChangeType::ChangeInlineStyle,
        }
    }
}

/// One entry of the trigger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRule {
    pub prefix: &'static str,
    /// Caret offset at which the rule fires, the prefix length in characters
    pub required_offset: usize,
    pub target: StyleTarget,
}

/// Triggers in priority order. The first match wins.
pub const TRIGGER_RULES: &[TriggerRule] = &[
    TriggerRule {
        prefix: "# ",
        required_offset: 2,
        target: StyleTarget::Block(BlockType::HeaderOne),
    },
    TriggerRule {
        prefix: "* ",
        required_offset: 2,
        target: StyleTarget::Inline(InlineStyle::Bold),
    },
    TriggerRule {
        prefix: "** ",
        required_offset: 3,
        target: StyleTarget::Inline(InlineStyle::Red),
    },
    TriggerRule {
        prefix: "*** ",
        required_offset: 4,
        target: StyleTarget::Inline(InlineStyle::Underline),
    },
];

/// Find the rule matching a block's text and the caret offset in it.
pub fn detect_shortcut(block_text: &str, caret_offset: usize) -> Option<&'static TriggerRule> {
    TRIGGER_RULES
        .iter()
        .find(|rule| block_text.starts_with(rule.prefix) && caret_offset == rule.required_offset)
}

/// Remove the trigger text of `rule` from the start block of `state` and
/// toggle its style.
pub fn apply_shortcut<E: RichTextEngine>(
    engine: &E,
    state: &E::State,
    rule: &TriggerRule,
) -> E::State {
    let content = engine.current_content(state);
    let selection = engine.selection(state);
    let trigger = engine.select_in_start_block(selection, 0, rule.required_offset);
    let stripped = engine.replace_text(content, &trigger, "");
    let pushed = engine.push(state, stripped, rule.target.change_type());

    match rule.target {
        StyleTarget::Block(block_type) => engine.toggle_block_type(&pushed, block_type),
        StyleTarget::Inline(style) => engine.toggle_inline_style(&pushed, style),
    }
}

/// Run the shortcut check on a proposed state.
///
/// Returns the state to commit: the proposed one untouched when nothing
/// matches, otherwise the state with the trigger removed and the style
/// toggled.
pub fn handle_change<E: RichTextEngine>(engine: &E, proposed: E::State) -> E::State {
    let content = engine.current_content(&proposed);
    let selection = engine.selection(&proposed);
    let Some(text) = engine.start_block_text(content, selection) else {
        return proposed;
    };

    match detect_shortcut(&text, engine.anchor_offset(selection)) {
        Some(rule) => {
            debug!("Shortcut {:?} fired for {:?}", rule.prefix, rule.target);
            apply_shortcut(engine, &proposed, rule)
        }
        None => proposed,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{editing, BlockEngine, EditorState, Position};

    /// Type `text` one character at a time, running the shortcut check after each.
    fn type_keys(state: EditorState, text: &str) -> EditorState {
        text.chars().fold(state, |state, ch| {
            handle_change(&BlockEngine, editing::insert_text(&state, &ch.to_string()))
        })
    }

    fn first_block_text(state: &EditorState) -> String {
        state.current_content().first_block().text().to_string()
    }

    #[test]
    fn test_detect_shortcut_table() {
        assert_eq!(
            detect_shortcut("# ", 2).map(|r| r.target),
            Some(StyleTarget::Block(BlockType::HeaderOne))
        );
        assert_eq!(
            detect_shortcut("* ", 2).map(|r| r.target),
            Some(StyleTarget::Inline(InlineStyle::Bold))
        );
        assert_eq!(
            detect_shortcut("** ", 3).map(|r| r.target),
            Some(StyleTarget::Inline(InlineStyle::Red))
        );
        assert_eq!(
            detect_shortcut("*** ", 4).map(|r| r.target),
            Some(StyleTarget::Inline(InlineStyle::Underline))
        );
    }

    #[test]
    fn test_detect_requires_exact_offset() {
        assert!(detect_shortcut("# ", 1).is_none());
        assert!(detect_shortcut("# hello", 7).is_none());
        assert!(detect_shortcut("** ", 2).is_none());
        assert!(detect_shortcut("a# ", 3).is_none());
        assert!(detect_shortcut("#", 1).is_none());
        assert!(detect_shortcut("", 0).is_none());
    }

    #[test]
    fn test_detect_matches_with_trailing_text() {
        // Space typed between the trigger and existing text
        let rule = detect_shortcut("* word", 2).unwrap();
        assert_eq!(rule.prefix, "* ");
    }

    #[test]
    fn test_rules_are_ordered() {
        let prefixes: Vec<_> = TRIGGER_RULES.iter().map(|r| r.prefix).collect();
        assert_eq!(prefixes, vec!["# ", "* ", "** ", "*** "]);
        for rule in TRIGGER_RULES {
            assert_eq!(rule.prefix.chars().count(), rule.required_offset);
        }
    }

    #[test]
    fn test_heading_shortcut() {
        let state = type_keys(EditorState::create_empty(), "# ");
        assert_eq!(first_block_text(&state), "");
        assert_eq!(state.current_block_type(), BlockType::HeaderOne);
        assert_eq!(state.selection().anchor_offset(), 0);

        let state = type_keys(state, "Title");
        assert_eq!(first_block_text(&state), "Title");
        assert_eq!(state.current_block_type(), BlockType::HeaderOne);
    }

    #[test]
    fn test_bold_shortcut() {
        let state = type_keys(EditorState::create_empty(), "* hello");
        let block = state.current_content().first_block();
        assert_eq!(block.text(), "hello");
        assert!((0..5).all(|i| block.style_at(i).contains(&InlineStyle::Bold)));
        assert!(state.current_inline_style().contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_red_shortcut() {
        let state = type_keys(EditorState::create_empty(), "** warn");
        let block = state.current_content().first_block();
        assert_eq!(block.text(), "warn");
        let style = block.style_at(0);
        assert!(style.contains(&InlineStyle::Red));
        assert!(!style.contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_underline_shortcut() {
        let state = type_keys(EditorState::create_empty(), "*** note");
        let block = state.current_content().first_block();
        assert_eq!(block.text(), "note");
        let style = block.style_at(0);
        assert!(style.contains(&InlineStyle::Underline));
        assert!(!style.contains(&InlineStyle::Red));
        assert!(!style.contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_no_match_returns_proposed_state() {
        let state = type_keys(EditorState::create_empty(), "plain");
        let proposed = editing::insert_text(&state, " ");
        let handled = handle_change(&BlockEngine, proposed.clone());
        assert_eq!(handled.current_content(), proposed.current_content());
        assert_eq!(handled.selection(), proposed.selection());
        assert_eq!(handled.undo_count(), proposed.undo_count());
    }

    #[test]
    fn test_trigger_mid_document_only_affects_its_block() {
        let state = type_keys(EditorState::create_empty(), "intro");
        let state = handle_change(&BlockEngine, editing::split_block(&state));
        let state = type_keys(state, "# ");

        let blocks = state.current_content().blocks();
        assert_eq!(blocks[0].text(), "intro");
        assert_eq!(blocks[0].block_type(), BlockType::Unstyled);
        assert_eq!(blocks[1].text(), "");
        assert_eq!(blocks[1].block_type(), BlockType::HeaderOne);
    }

    #[test]
    fn test_heading_trigger_in_heading_reverts_it() {
        let state = type_keys(EditorState::create_empty(), "# ");
        let state = type_keys(state, "# ");
        assert_eq!(first_block_text(&state), "");
        assert_eq!(state.current_block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_trigger_before_existing_text() {
        let base = EditorState::create_empty();
        let base = type_keys(base, "*word");
        let base = editing::place_caret(&base, Position::new(base.selection().anchor_key(), 1), false);
        let state = type_keys(base, " ");

        let block = state.current_content().first_block();
        assert_eq!(block.text(), "word");
        assert_eq!(state.selection().anchor_offset(), 0);
        assert!(state.current_inline_style().contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_undo_after_inline_shortcut_restores_trigger_and_caret() {
        let state = type_keys(EditorState::create_empty(), "* ");
        let undone = state.undo();
        assert_eq!(first_block_text(&undone), "* ");
        assert!(undone.selection().is_collapsed());
        assert_eq!(undone.selection().anchor_offset(), 2);
    }

    #[test]
    fn test_inline_shortcut_fires_again_after_undo() {
        let state = type_keys(EditorState::create_empty(), "* ");
        let handled = handle_change(&BlockEngine, state.undo());
        assert_eq!(first_block_text(&handled), "");
        assert_eq!(handled.selection().anchor_offset(), 0);
        assert!(handled.current_inline_style().contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_undo_after_heading_shortcut() {
        let state = type_keys(EditorState::create_empty(), "# ");
        let once = handle_change(&BlockEngine, state.undo());
        assert_eq!(first_block_text(&once), "");
        assert_eq!(once.current_block_type(), BlockType::Unstyled);
        assert_eq!(once.selection().anchor_offset(), 0);

        let twice = once.undo();
        assert_eq!(first_block_text(&twice), "# ");
        assert_eq!(twice.selection().anchor_offset(), 2);
        let handled = handle_change(&BlockEngine, twice);
        assert_eq!(first_block_text(&handled), "");
        assert_eq!(handled.current_block_type(), BlockType::HeaderOne);
    }
}
