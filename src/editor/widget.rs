//! Rich-text editor widget for Sorcerer
//!
//! egui's `TextEdit` only edits plain strings, so this widget draws the block
//! document itself: one galley per block, a painted caret and selection, and
//! hit-testing for clicks. It never mutates the editor state. Input is
//! returned as [`EditCommand`]s for the caller to apply.

use super::commands::{is_save_shortcut, EditCommand};
use super::styles;
use crate::document::{editing, ContentBlock, EditorState, Position};
use eframe::egui::{
    self, text::CCursor, text::LayoutJob, Color32, EventFilter, Galley, Id, Rect, Response, Sense,
    Ui, Vec2,
};
use log::debug;
use std::sync::Arc;

/// Inner padding between the frame and the text.
const PADDING: f32 = 8.0;

/// Caret width in points.
const CARET_WIDTH: f32 = 1.5;

/// Result of showing the editor widget.
pub struct RichEditorOutput {
    pub response: Response,
    /// Edits requested this frame, in input order.
    pub commands: Vec<EditCommand>,
    /// Whether the save shortcut was pressed.
    pub save_requested: bool,
}

/// Laid-out block, positioned relative to the widget's top-left corner.
struct BlockLayout {
    key: String,
    offset: Vec2,
    galley: Arc<Galley>,
    height: f32,
}

/// A widget that renders and edits an [`EditorState`].
///
/// # Example
///
/// ```ignore
/// let output = RichEditor::new(&state.editor)
///     .min_height(300.0)
///     .interactive(!dialog_open)
///     .show(ui);
/// for command in output.commands {
///     state.apply_command(&command);
/// }
/// ```
pub struct RichEditor<'a> {
    state: &'a EditorState,
    id: Option<Id>,
    min_height: f32,
    interactive: bool,
    request_focus: bool,
}

impl<'a> RichEditor<'a> {
    pub fn new(state: &'a EditorState) -> Self {
        Self {
            state,
            id: None,
            min_height: 0.0,
            interactive: true,
            request_focus: false,
        }
    }

    #[must_use]
    pub fn id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Minimum height of the editing region.
    #[must_use]
    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    /// When false, input is ignored and no commands are produced.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Give the widget keyboard focus this frame.
    #[must_use]
    pub fn request_focus(mut self, request: bool) -> Self {
        self.request_focus = request;
        self
    }

    pub fn show(self, ui: &mut Ui) -> RichEditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("rich_editor"));
        let width = ui.available_width();
        let text_width = (width - 2.0 * PADDING).max(1.0);
        let visuals = ui.visuals().clone();

        // Lay out every block before allocating so the total height is known
        let mut layouts = Vec::with_capacity(self.state.current_content().blocks().len());
        let mut y = PADDING;
        for block in self.state.current_content().blocks() {
            let galley = ui.fonts(|f| f.layout_job(block_job(block, text_width, &visuals)));
            let font_id = styles::text_format(block.block_type(), &Default::default(), &visuals).font_id;
            let height = galley.size().y.max(ui.fonts(|f| f.row_height(&font_id)));
            layouts.push(BlockLayout {
                key: block.key().to_string(),
                offset: egui::vec2(PADDING, y),
                galley,
                height,
            });
            y += height + styles::BLOCK_SPACING;
        }
        let content_height = y - styles::BLOCK_SPACING + PADDING;

        let desired = egui::vec2(width, content_height.max(self.min_height));
        let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
        let response = ui
            .interact(rect, id, Sense::click_and_drag())
            .on_hover_cursor(egui::CursorIcon::Text);
        ui.memory_mut(|m| {
            m.set_focus_lock_filter(
                response.id,
                EventFilter {
                    horizontal_arrows: true,
                    vertical_arrows: true,
                    ..Default::default()
                },
            )
        });

        let mut commands = Vec::new();
        let mut save_requested = false;

        if self.interactive {
            if self.request_focus {
                response.request_focus();
            }

            if let Some(pointer) = response.interact_pointer_pos() {
                let local = pointer - rect.min;
                let position = position_at(&layouts, local);
                if response.clicked() || response.drag_started() {
                    response.request_focus();
                    let extend = ui.input(|i| i.modifiers.shift);
                    commands.push(EditCommand::PlaceCaret { position, extend });
                } else if response.dragged() {
                    commands.push(EditCommand::PlaceCaret {
                        position,
                        extend: true,
                    });
                }
            }

            if response.has_focus() {
                let events = ui.input(|i| i.events.clone());
                for event in &events {
                    if is_save_shortcut(event) {
                        save_requested = true;
                        continue;
                    }
                    match event {
                        egui::Event::Copy | egui::Event::Cut => {
                            let text = editing::selected_text(self.state);
                            if !text.is_empty() {
                                ui.output_mut(|o| o.copied_text = text);
                                if matches!(event, egui::Event::Cut) {
                                    commands.push(EditCommand::Backspace);
                                }
                            }
                        }
                        _ => commands.extend(EditCommand::from_event(event)),
                    }
                }
            }
        }

        if !commands.is_empty() {
            debug!("Editor produced {} command(s)", commands.len());
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);

            if self.state.current_content().is_blank() {
                if let Some(first) = layouts.first() {
                    let mut job = LayoutJob::default();
                    job.wrap.max_width = text_width;
                    job.append(styles::PLACEHOLDER, 0.0, styles::placeholder_format(&visuals));
                    let galley = ui.fonts(|f| f.layout_job(job));
                    painter.galley(rect.min + first.offset, galley, visuals.weak_text_color());
                }
            }

            paint_selection(&painter, rect, &layouts, self.state, visuals.selection.bg_fill);

            for layout in &layouts {
                painter.galley(rect.min + layout.offset, layout.galley.clone(), visuals.text_color());
            }

            if response.has_focus() && self.state.selection().is_collapsed() {
                let focus = self.state.selection().focus();
                if let Some(caret) = caret_rect(&layouts, focus) {
                    painter.rect_filled(
                        caret.translate(rect.min.to_vec2()),
                        0.0,
                        visuals.strong_text_color(),
                    );
                }
            }
        }

        RichEditorOutput {
            response,
            commands,
            save_requested,
        }
    }
}

/// Layout job for one block, one section per style run.
fn block_job(block: &ContentBlock, wrap_width: f32, visuals: &egui::Visuals) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;

    if block.is_empty() {
        // An empty section keeps the row height of the block's font
        job.append(
            "",
            0.0,
            styles::text_format(block.block_type(), &Default::default(), visuals),
        );
        return job;
    }

    for (start, end, style) in block.style_runs() {
        job.append(
            block.text_between(start, end),
            0.0,
            styles::text_format(block.block_type(), style, visuals),
        );
    }
    job
}

/// Document position under `local`, a point relative to the widget's corner.
fn position_at(layouts: &[BlockLayout], local: Vec2) -> Position {
    let Some(layout) = layouts
        .iter()
        .find(|l| local.y < l.offset.y + l.height + styles::BLOCK_SPACING)
        .or_else(|| layouts.last())
    else {
        return Position::new("", 0);
    };

    let cursor = layout.galley.cursor_from_pos(local - layout.offset);
    Position::new(layout.key.clone(), cursor.ccursor.index)
}

/// Caret rectangle for `position`, relative to the widget's corner.
fn caret_rect(layouts: &[BlockLayout], position: &Position) -> Option<Rect> {
    let layout = layouts.iter().find(|l| l.key == position.key)?;
    let cursor = layout.galley.from_ccursor(CCursor::new(position.offset));
    let (x, top, bottom) = match layout.galley.rows.get(cursor.rcursor.row) {
        Some(row) => (
            row.x_offset(cursor.rcursor.column),
            row.min_y(),
            row.max_y(),
        ),
        None => (0.0, 0.0, layout.height),
    };
    Some(Rect::from_min_max(
        layout.offset.to_pos2() + egui::vec2(x, top),
        layout.offset.to_pos2() + egui::vec2(x + CARET_WIDTH, bottom.max(top + 1.0)),
    ))
}

/// Paint the selection background of every block the selection touches.
fn paint_selection(
    painter: &egui::Painter,
    rect: Rect,
    layouts: &[BlockLayout],
    state: &EditorState,
    color: Color32,
) {
    let selection = state.selection();
    if selection.is_collapsed() {
        return;
    }
    let start = selection.start();
    let end = selection.end();
    let (Some(first), Some(last)) = (
        layouts.iter().position(|l| l.key == start.key),
        layouts.iter().position(|l| l.key == end.key),
    ) else {
        return;
    };

    for (index, layout) in layouts.iter().enumerate().take(last + 1).skip(first) {
        let from = if index == first { start.offset } else { 0 };
        let galley = &layout.galley;
        let from_cursor = galley.from_ccursor(CCursor::new(from)).rcursor;
        let to_cursor = if index == last {
            galley.from_ccursor(CCursor::new(end.offset)).rcursor
        } else {
            galley.end().rcursor
        };

        for row_idx in from_cursor.row..=to_cursor.row {
            let Some(row) = galley.rows.get(row_idx) else {
                continue;
            };
            let x_start = if row_idx == from_cursor.row {
                row.x_offset(from_cursor.column)
            } else {
                0.0
            };
            let mut x_end = if row_idx == to_cursor.row {
                row.x_offset(to_cursor.column)
            } else {
                row.rect.width()
            };
            // Show selected line ends as a sliver
            if index != last && row_idx == to_cursor.row {
                x_end += 4.0;
            }

            let origin = rect.min + layout.offset;
            let highlight = Rect::from_min_max(
                origin + egui::vec2(x_start, row.min_y()),
                origin + egui::vec2(x_end, row.max_y()),
            );
            painter.rect_filled(highlight, 2.0, color);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockType, ContentState, InlineStyle};

    #[test]
    fn test_block_job_has_one_section_per_run() {
        let mut state = EditorState::create_empty()
            .toggle_inline_style(InlineStyle::Bold);
        state = editing::insert_text(&state, "ab");
        state = state.toggle_inline_style(InlineStyle::Bold);
        state = editing::insert_text(&state, "cd");

        let block = state.current_content().first_block();
        let job = block_job(block, 200.0, &egui::Visuals::light());
        assert_eq!(job.text, "abcd");
        assert_eq!(job.sections.len(), 2);
        assert_eq!(job.sections[0].byte_range, 0..2);
        assert_eq!(job.sections[1].byte_range, 2..4);
        assert_eq!(job.wrap.max_width, 200.0);
    }

    #[test]
    fn test_empty_block_job_keeps_heading_font() {
        let content = ContentState::from_blocks(vec![ContentBlock::new("a", BlockType::HeaderOne)]);
        let job = block_job(content.first_block(), 100.0, &egui::Visuals::light());
        assert!(job.text.is_empty());
        assert_eq!(job.sections.len(), 1);
        assert_eq!(job.sections[0].format.font_id.size, styles::HEADING_FONT_SIZE);
    }
}
