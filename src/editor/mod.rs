//! Editor module for Sorcerer
//!
//! This module contains the rich-text editor widget, the translation of
//! input events into edit commands, and the formatting shortcuts applied
//! after every edit.

mod commands;
mod shortcuts;
mod styles;
mod widget;

pub use commands::{apply_command, EditCommand};
pub use shortcuts::handle_change;
pub use widget::RichEditor;
