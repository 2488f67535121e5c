//! User settings and preferences for Sorcerer
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the window chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// egui visuals for this theme.
    pub fn visuals(&self) -> egui::Visuals {
        match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 560.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Color theme (light or dark)
    pub theme: Theme,

    /// Window size and position
    pub window_size: WindowSize,

    /// Directory holding the key-value store. `None` uses the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Settings {
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        // An empty override is treated as "not set"
        if self
            .storage_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.storage_dir = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
