//! Editing commands
//!
//! Keyboard and clipboard events are first translated into [`EditCommand`]s,
//! then applied to the editor state. Keeping the two steps apart lets the
//! application ignore input wholesale (while a dialog is open) and lets the
//! translation be tested without a window.

use crate::document::{editing, editing::Motion, EditorState, Position};
use eframe::egui::{Event, Key, Modifiers};
use log::debug;

/// One user edit or caret action.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Typed or pasted text
    Insert(String),
    /// Enter
    SplitBlock,
    Backspace,
    DeleteForward,
    Move { motion: Motion, extend: bool },
    /// Click or drag inside the editing region
    PlaceCaret { position: Position, extend: bool },
    SelectAll,
    Undo,
    Redo,
}

impl EditCommand {
    /// Translate an input event, `None` for events that are not edits.
    ///
    /// Copy, cut and save are handled by the caller since they reach outside
    /// the document.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Text(text) => {
                let text: String = text.chars().filter(|c| !c.is_control()).collect();
                (!text.is_empty()).then_some(EditCommand::Insert(text))
            }
            Event::Paste(text) if !text.is_empty() => Some(EditCommand::Insert(text.clone())),
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => Self::from_key(*key, *modifiers),
            _ => None,
        }
    }

    fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        let extend = modifiers.shift;
        let command = modifiers.command;
        let motion = |motion| Some(EditCommand::Move { motion, extend });

        match key {
            Key::Enter => Some(EditCommand::SplitBlock),
            Key::Backspace => Some(EditCommand::Backspace),
            Key::Delete => Some(EditCommand::DeleteForward),
            Key::ArrowLeft if command => motion(Motion::BlockStart),
            Key::ArrowRight if command => motion(Motion::BlockEnd),
            Key::ArrowUp if command => motion(Motion::DocumentStart),
            Key::ArrowDown if command => motion(Motion::DocumentEnd),
            Key::ArrowLeft => motion(Motion::Left),
            Key::ArrowRight => motion(Motion::Right),
            Key::ArrowUp => motion(Motion::Up),
            Key::ArrowDown => motion(Motion::Down),
            Key::Home if command => motion(Motion::DocumentStart),
            Key::End if command => motion(Motion::DocumentEnd),
            Key::Home => motion(Motion::BlockStart),
            Key::End => motion(Motion::BlockEnd),
            Key::A if command => Some(EditCommand::SelectAll),
            Key::Z if command && modifiers.shift => Some(EditCommand::Redo),
            Key::Z if command => Some(EditCommand::Undo),
            Key::Y if command => Some(EditCommand::Redo),
            _ => None,
        }
    }
}

/// Whether `event` is the save shortcut (Ctrl+S / Cmd+S).
pub fn is_save_shortcut(event: &Event) -> bool {
    matches!(
        event,
        Event::Key {
            key: Key::S,
            pressed: true,
            modifiers,
            ..
        } if modifiers.command
    )
}

/// Apply `command` to `state`, producing the proposed next state.
pub fn apply_command(state: &EditorState, command: &EditCommand) -> EditorState {
    match command {
        EditCommand::Insert(text) => editing::insert_text(state, text),
        EditCommand::SplitBlock => editing::split_block(state),
        EditCommand::Backspace => editing::backspace(state),
        EditCommand::DeleteForward => editing::delete_forward(state),
        EditCommand::Move { motion, extend } => editing::move_caret(state, *motion, *extend),
        EditCommand::PlaceCaret { position, extend } => {
            editing::place_caret(state, position.clone(), *extend)
        }
        EditCommand::SelectAll => editing::select_all(state),
        EditCommand::Undo => {
            if !state.can_undo() {
                debug!("Nothing to undo");
            }
            state.undo()
        }
        EditCommand::Redo => {
            if !state.can_redo() {
                debug!("Nothing to redo");
            }
            state.redo()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
