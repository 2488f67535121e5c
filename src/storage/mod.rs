//! Persistent storage for Sorcerer
//!
//! This module provides the local key-value store and the load/save of the
//! document snapshot kept in it.

mod snapshot;
mod store;

pub use snapshot::{load_document, save_document, STORAGE_KEY};
#[cfg(test)]
pub use store::MemoryStore;
pub use store::{FileStore, KeyValueStore};
