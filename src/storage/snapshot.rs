//! Document snapshot load/save
//!
//! The document content (not the selection) is stored as raw JSON under one
//! fixed key. It is read once at startup and overwritten on every save.

use super::store::KeyValueStore;
use crate::document::RichTextEngine;
use crate::error::{Error, Result};
use log::{debug, info};

/// Key holding the saved document
pub const STORAGE_KEY: &str = "editorContent";

/// Restore the saved document, or start an empty one when nothing was saved.
///
/// # Errors
///
/// - `Error::StorageRead`: the store could not be read
/// - `Error::SnapshotParse`: the stored value is not a valid raw document
pub fn load_document<E, S>(engine: &E, store: &S) -> Result<E::State>
where
    E: RichTextEngine,
    S: KeyValueStore + ?Sized,
{
    let Some(saved) = store.get_item(STORAGE_KEY)? else {
        info!("No saved document, starting empty");
        return Ok(engine.create_empty());
    };

    let raw: E::Raw = serde_json::from_str(&saved).map_err(|e| Error::SnapshotParse {
        key: STORAGE_KEY.to_string(),
        source: e,
    })?;
    info!("Restored saved document ({} bytes)", saved.len());
    Ok(engine.create_with_content(engine.convert_from_raw(&raw)))
}

/// Write the current content of `state` to the store.
///
/// # Errors
///
/// - `Error::SnapshotSerialize`: the content could not be serialized
/// - `Error::StorageWrite`: the store rejected the write
pub fn save_document<E, S>(engine: &E, store: &mut S, state: &E::State) -> Result<()>
where
    E: RichTextEngine,
    S: KeyValueStore + ?Sized,
{
    let raw = engine.convert_to_raw(engine.current_content(state));
    let json = serde_json::to_string(&raw).map_err(Error::SnapshotSerialize)?;
    store.set_item(STORAGE_KEY, &json)?;
    debug!("Saved document ({} bytes)", json.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        editing, BlockEngine, BlockType, ContentBlock, ContentState, EditorState, RawContent,
    };
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn hi_state() -> EditorState {
        EditorState::create_with_content(ContentState::from_blocks(vec![
            ContentBlock::with_text("k1", "hi", BlockType::Unstyled),
        ]))
    }

    #[test]
    fn test_load_without_saved_document_is_empty() {
        let store = MemoryStore::default();
        let state = load_document(&BlockEngine, &store).unwrap();
        assert!(state.current_content().is_blank());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_save_writes_raw_json() {
        let mut store = MemoryStore::default();
        let state = hi_state();
        save_document(&BlockEngine, &mut store, &state).unwrap();

        let stored = store.get_item(STORAGE_KEY).unwrap().unwrap();
        let expected = serde_json::to_string(&BlockEngine.convert_to_raw(state.current_content()))
            .unwrap();
        assert_eq!(stored, expected);

        let raw: RawContent = serde_json::from_str(&stored).unwrap();
        assert_eq!(raw.blocks[0].text, "hi");
        assert_eq!(raw.blocks[0].block_type, BlockType::Unstyled);
    }

    #[test]
    fn test_save_then_reload() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path());
        save_document(&BlockEngine, &mut store, &hi_state()).unwrap();

        let reloaded = load_document(&BlockEngine, &FileStore::new(temp.path())).unwrap();
        let content = reloaded.current_content();
        assert_eq!(content.first_block().text(), "hi");
        assert_eq!(reloaded.selection().anchor_offset(), 0);
        assert!(!reloaded.selection().has_focus());
    }

    #[test]
    fn test_reload_keeps_styles_but_not_history() {
        let mut store = MemoryStore::default();
        let state = editing::insert_text(&EditorState::create_empty(), "plain");
        let state = state.toggle_block_type(BlockType::HeaderOne);
        save_document(&BlockEngine, &mut store, &state).unwrap();

        let reloaded = load_document(&BlockEngine, &store).unwrap();
        assert_eq!(reloaded.current_content(), state.current_content());
        assert!(!reloaded.can_undo());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let mut store = MemoryStore::default();
        store.set_item(STORAGE_KEY, "{not json").unwrap();
        let err = load_document(&BlockEngine, &store).unwrap_err();
        assert!(matches!(err, Error::SnapshotParse { .. }));
    }

    #[test]
    fn test_save_failure_propagates() {
        let mut store = MemoryStore::failing();
        let err = save_document(&BlockEngine, &mut store, &hi_state()).unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
    }
}
