// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Sorcerer - Main Entry Point
//!
//! A small rich-text editor with markdown-like formatting shortcuts. Built with Rust and egui.

mod app;
mod config;
mod document;
mod editor;
mod error;
mod state;
mod storage;

use app::{SorcererApp, APP_TITLE};
use config::load_config;
use log::{error, info};
use state::AppState;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_TITLE);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    // Restore the saved document before any window exists; a broken snapshot is fatal
    let state = match AppState::open(settings) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to restore the saved document: {}", e);
            std::process::exit(1);
        }
    };

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 360.0]);

    // Apply position if saved
    let viewport = if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport.with_position([x, y])
    } else {
        viewport
    };

    // Apply maximized state
    let viewport = if window_size.maximized {
        viewport.with_maximized(true)
    } else {
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(move |cc| Ok(Box::new(SorcererApp::new(cc, state)))),
    )
}
