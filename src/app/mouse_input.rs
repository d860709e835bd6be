//! Mouse input handling.
//!
//! Presses go to the pointer hub first so outside-click listeners see them
//! before the menu or the text area react.

use super::Editor;
use crate::app::dismissal::{PointerEvent, PointerKind};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::time::Duration;

const SCROLL_LINES: isize = 3;

impl Editor {
    /// Handle a mouse event.
    /// Returns true if a re-render is needed.
    pub fn handle_mouse(&mut self, mouse_event: MouseEvent) -> std::io::Result<bool> {
        let col = mouse_event.column;
        let row = mouse_event.row;

        let needs_render = match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double_click = self.track_click(col, row);
                self.pointer_hub.dispatch(&PointerEvent::press(col, row));
                self.handle_mouse_click(col, row, is_double_click);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_hub.dispatch(&PointerEvent {
                    column: col,
                    row,
                    kind: PointerKind::Drag,
                });
                self.handle_mouse_drag(col, row)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer_hub.dispatch(&PointerEvent {
                    column: col,
                    row,
                    kind: PointerKind::Release,
                });
                self.mouse_selecting = false;
                false
            }
            MouseEventKind::ScrollUp => {
                self.handle_mouse_scroll(col, row, -SCROLL_LINES);
                true
            }
            MouseEventKind::ScrollDown => {
                self.handle_mouse_scroll(col, row, SCROLL_LINES);
                true
            }
            _ => false,
        };

        self.sync_menu_layout();
        Ok(needs_render)
    }

    /// Record a left press and report whether it completes a double click
    fn track_click(&mut self, col: u16, row: u16) -> bool {
        let now = self.time_source.now();
        let threshold = Duration::from_millis(self.config.editor.double_click_time_ms);
        let is_double = match (self.previous_click_time, self.previous_click_position) {
            (Some(previous_time), Some(previous_pos)) => {
                now.duration_since(previous_time) < threshold && previous_pos == (col, row)
            }
            _ => false,
        };

        if is_double {
            self.previous_click_time = None;
            self.previous_click_position = None;
        } else {
            self.previous_click_time = Some(now);
            self.previous_click_position = Some((col, row));
        }
        is_double
    }

    fn handle_mouse_click(&mut self, col: u16, row: u16, is_double_click: bool) {
        let menu = self.controller.menu_layout();
        if menu.hits_trigger(col, row) {
            self.controller.toggle_menu();
            return;
        }
        if menu.hits_body(col, row) {
            if let Some(kind) = menu.item_at(col, row) {
                self.dispatch_action(kind);
            }
            return;
        }

        let Some(pos) = self
            .view
            .viewport
            .position_at(&self.view.document, col, row)
        else {
            return;
        };
        if is_double_click {
            tracing::debug!("Double click at {}", pos);
            self.view.select_word_at(pos);
        } else {
            self.view.move_to(pos, false);
            self.mouse_selecting = true;
        }
        self.selection_changed();
    }

    fn handle_mouse_drag(&mut self, col: u16, row: u16) -> bool {
        if !self.mouse_selecting {
            return false;
        }
        let area = self.view.viewport.area;
        // Clamp so dragging past the edge keeps extending the selection
        let col = col.clamp(area.x, area.right().saturating_sub(1));
        let row = row.clamp(area.y, area.bottom().saturating_sub(1));
        let Some(pos) = self
            .view
            .viewport
            .position_at(&self.view.document, col, row)
        else {
            return false;
        };
        if pos == self.view.cursor() {
            return false;
        }
        self.view.move_to(pos, true);
        self.selection_changed();
        true
    }

    fn handle_mouse_scroll(&mut self, col: u16, row: u16, delta: isize) {
        if let Some(panel) = self.layout.panel {
            if panel.contains((col, row).into()) {
                self.scroll_panel(delta);
                return;
            }
        }
        self.view.viewport.scroll_by(&self.view.document, delta);
        self.controller.refresh_anchor(&self.view);
    }
}
