//! Main application module for Sorcerer
//!
//! This module implements the eframe App trait for the main application,
//! handling the window layout, dialogs, and the routing of editor input into
//! the application state.

use crate::config::WindowSize;
use crate::editor::RichEditor;
use crate::state::{AppState, SAVE_NOTICE};
use eframe::egui;
use log::{debug, info};

/// Window title and heading text
pub const APP_TITLE: &str = "Sorcerer Editor";

/// Minimum height of the editing region
const EDITOR_MIN_HEIGHT: f32 = 300.0;

/// Fill of the Save button
const SAVE_BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(0x4c, 0xaf, 0x50);

/// The main application struct that implements eframe::App.
pub struct SorcererApp {
    /// Application state
    state: AppState,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
}

impl SorcererApp {
    /// Create the application around an already opened state and apply the saved theme.
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        info!("Initializing {}", APP_TITLE);

        cc.egui_ctx.set_visuals(state.settings.theme.visuals());
        info!("Applied initial theme: {:?}", state.settings.theme);

        Self {
            state,
            last_window_size: None,
            last_window_pos: None,
        }
    }

    /// Update window size in settings if changed.
    ///
    /// Returns `true` if the window state was updated.
    fn update_window_state(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);
                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
                self.state.update_settings(|settings| {
                    settings.window_size = WindowSize {
                        width: size.x,
                        height: size.y,
                        x: Some(pos.x),
                        y: Some(pos.y),
                        maximized,
                    };
                });
                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }

        changed
    }

    /// Render the heading row and the editing region.
    ///
    /// With `allow_input` false the editor is drawn but ignores input.
    fn render_ui(&mut self, ctx: &egui::Context, allow_input: bool) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(APP_TITLE);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let save = egui::Button::new(
                        egui::RichText::new("Save").color(egui::Color32::WHITE),
                    )
                    .fill(SAVE_BUTTON_FILL);
                    if ui
                        .add_enabled(!self.state.is_input_blocked(), save)
                        .clicked()
                    {
                        self.state.request_save();
                    }
                });
            });
            ui.add_space(8.0);

            let interactive = allow_input && !self.state.is_input_blocked();
            let request_focus = interactive && std::mem::take(&mut self.state.ui.focus_editor);
            // Fill the window, leaving room for the frame stroke
            let min_height = EDITOR_MIN_HEIGHT.max(ui.available_height() - 4.0);

            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(0.0))
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            let output = RichEditor::new(self.state.editor())
                                .id(egui::Id::new("sorcerer_editor"))
                                .min_height(min_height)
                                .interactive(interactive)
                                .request_focus(request_focus)
                                .show(ui);

                            for command in &output.commands {
                                self.state.apply_command(command);
                            }
                            if output.save_requested {
                                self.state.request_save();
                            }
                        });
                });
        });
    }

    /// Render the save acknowledgment and error dialogs.
    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if self.state.ui.show_save_notice {
            let mut acknowledged = false;
            egui::Window::new(APP_TITLE)
                .id(egui::Id::new("save_notice"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(SAVE_NOTICE);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            if ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
                acknowledged = true;
            }
            if acknowledged {
                self.state.acknowledge_save();
            }
        }

        if self.state.ui.show_error_modal {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0));
                    ui.label(&self.state.ui.error_message);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        self.state.dismiss_error();
                    }
                });
        }
    }
}

impl eframe::App for SorcererApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window size/position changes for persistence
        self.update_window_state(ctx);

        // A key press that closes a dialog must not also reach the editor
        let blocked_at_start = self.state.is_input_blocked();
        self.render_dialogs(ctx);
        if blocked_at_start && !self.state.is_input_blocked() {
            ctx.request_repaint();
        }

        self.render_ui(ctx, !blocked_at_start);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
