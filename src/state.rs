//! Application state management for Sorcerer
//!
//! This module defines the central `AppState` struct that owns the document
//! being edited, the key-value store it is saved to, user settings, and UI
//! state. Every input event replaces the editor state exactly once.

use crate::config::{save_config_silent, Settings};
use crate::document::{BlockEngine, EditorState, RichTextEngine};
use crate::editor::{apply_command, handle_change, EditCommand};
use crate::error::Result;
use crate::storage::{load_document, save_document, FileStore, KeyValueStore};
use log::{debug, info, warn};

/// Message shown after a successful save
pub const SAVE_NOTICE: &str = "Content saved!";

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the "Content saved!" acknowledgment is open
    pub show_save_notice: bool,
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Give the editor keyboard focus on the next frame
    pub focus_editor: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// # Example
///
/// ```ignore
/// let mut state = AppState::open(load_config())?;
/// state.apply_command(&EditCommand::Insert("# ".into()));
/// state.request_save();
/// ```
#[derive(Debug)]
pub struct AppState<S: KeyValueStore = FileStore> {
    engine: BlockEngine,
    /// The one committed editor state
    editor: EditorState,
    /// Where the document snapshot is saved
    store: S,
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
}

impl AppState<FileStore> {
    /// Open the file-backed store chosen by `settings` and restore the saved document.
    ///
    /// # Errors
    ///
    /// Fails when the store location cannot be determined, the saved document
    /// cannot be read, or it is not a valid document.
    pub fn open(settings: Settings) -> Result<Self> {
        let store = FileStore::open_default(settings.storage_dir.as_deref())?;
        info!("Using storage at {}", store.dir().display());
        Self::with_store(settings, store)
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Create the state over `store`, restoring the saved document.
    pub fn with_store(settings: Settings, store: S) -> Result<Self> {
        let engine = BlockEngine;
        let editor = load_document(&engine, &store)?;
        Ok(Self {
            engine,
            editor,
            store,
            settings,
            ui: UiState {
                focus_editor: true,
                ..Default::default()
            },
            settings_dirty: false,
        })
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a dialog is open and editing input must be ignored.
    pub fn is_input_blocked(&self) -> bool {
        self.ui.show_save_notice || self.ui.show_error_modal
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit a proposed editor state, applying any formatting shortcut it completes.
    pub fn on_change(&mut self, proposed: EditorState) {
        self.editor = handle_change(&self.engine, proposed);
    }

    /// Apply one edit command. Ignored while a dialog is open.
    pub fn apply_command(&mut self, command: &EditCommand) {
        if self.is_input_blocked() {
            debug!("Ignoring {:?} while a dialog is open", command);
            return;
        }
        let proposed = apply_command(&self.editor, command);
        self.on_change(proposed);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the document to the store and open the acknowledgment.
    ///
    /// On failure nothing else changes: the document stays as it is and no
    /// acknowledgment is shown.
    pub fn save(&mut self) -> Result<()> {
        save_document(&self.engine, &mut self.store, &self.editor)?;
        info!(
            "Document saved ({} characters)",
            self.editor.current_content().plain_text().chars().count()
        );
        self.ui.show_save_notice = true;
        Ok(())
    }

    /// Save, reporting any failure in the error dialog.
    pub fn request_save(&mut self) {
        if self.is_input_blocked() {
            return;
        }
        if let Err(e) = self.save() {
            warn!("Failed to save document: {}", e);
            self.show_error(format!("Failed to save:\n{}", e));
        }
    }

    /// Close the acknowledgment and put the caret at the end of the document.
    pub fn acknowledge_save(&mut self) {
        self.ui.show_save_notice = false;
        self.editor = self.engine.move_focus_to_end(&self.editor);
        self.ui.focus_editor = true;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let before = self.settings.clone();
        f(&mut self.settings);
        if self.settings != before {
            self.settings_dirty = true;
        }
    }

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Prepare state for application shutdown.
    ///
    /// The document is not saved here; only an explicit save writes it.
    pub fn shutdown(&mut self) {
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    /// Dismiss the error modal.
    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
        self.ui.focus_editor = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
