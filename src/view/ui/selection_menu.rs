//! Floating selection action menu: the trigger next to the selection end and
//! the menu body listing the remote actions.

use crate::services::action_client::ActionKind;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Trigger text while idle
pub const TRIGGER_LABEL: &str = " ⋮ ";
/// Trigger text while an action is running
pub const TRIGGER_BUSY_LABEL: &str = " … ";
pub const TRIGGER_WIDTH: u16 = 3;

/// Screen rectangles of the menu, used for hit testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuLayout {
    /// Trigger cell, present while a selection is active and on screen
    pub trigger: Option<Rect>,
    /// Open menu body, including its border
    pub body: Option<Rect>,
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}

fn item_text(index: usize, kind: ActionKind) -> String {
    format!(" {} {} ", index + 1, kind.label())
}

fn body_width() -> u16 {
    let widest = ActionKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| item_text(i, *kind).width())
        .max()
        .unwrap_or(0);
    widest as u16 + 2
}

impl MenuLayout {
    pub const HIDDEN: MenuLayout = MenuLayout {
        trigger: None,
        body: None,
    };

    /// Lay out the menu for an anchor `(column, row)` inside `bounds`.
    ///
    /// The trigger sits at the anchor, nudged left if it would overflow. The
    /// body opens below the trigger, or above it when there is no room.
    pub fn compute(anchor: Option<(u16, u16)>, visible: bool, bounds: Rect) -> Self {
        let Some((col, row)) = anchor else {
            return Self::HIDDEN;
        };
        if bounds.width < TRIGGER_WIDTH || !rect_contains(bounds, bounds.x, row) {
            return Self::HIDDEN;
        }

        let trigger_x = col
            .max(bounds.x)
            .min(bounds.right().saturating_sub(TRIGGER_WIDTH));
        let trigger = Rect::new(trigger_x, row, TRIGGER_WIDTH, 1);

        let body = visible.then(|| {
            let width = body_width().min(bounds.width);
            let height = (ActionKind::ALL.len() as u16 + 2).min(bounds.height);
            let x = trigger_x.min(bounds.right().saturating_sub(width));
            let below = row + 1;
            let y = if below + height <= bounds.bottom() {
                below
            } else {
                row.saturating_sub(height).max(bounds.y)
            };
            Rect::new(x, y, width, height)
        });

        Self {
            trigger: Some(trigger),
            body,
        }
    }

    pub fn hits_trigger(&self, col: u16, row: u16) -> bool {
        self.trigger.is_some_and(|r| rect_contains(r, col, row))
    }

    pub fn hits_body(&self, col: u16, row: u16) -> bool {
        self.body.is_some_and(|r| rect_contains(r, col, row))
    }

    /// Action under a body cell. Border cells select nothing.
    pub fn item_at(&self, col: u16, row: u16) -> Option<ActionKind> {
        let body = self.body?;
        if col <= body.x || col + 1 >= body.right() || row <= body.y {
            return None;
        }
        ActionKind::ALL.get((row - body.y - 1) as usize).copied()
    }
}

/// Renders the trigger and the open menu body
pub struct SelectionMenuRenderer;

impl SelectionMenuRenderer {
    pub fn render(frame: &mut Frame, layout: &MenuLayout, loading: bool) {
        if let Some(trigger) = layout.trigger {
            let (label, style) = if loading {
                (
                    TRIGGER_BUSY_LABEL,
                    Style::default()
                        .fg(Color::DarkGray)
                        .bg(Color::Gray)
                        .add_modifier(Modifier::DIM),
                )
            } else {
                (
                    TRIGGER_LABEL,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            };
            frame.render_widget(Paragraph::new(Span::styled(label, style)), trigger);
        }

        if let Some(body) = layout.body {
            let lines: Vec<Line> = ActionKind::ALL
                .iter()
                .enumerate()
                .map(|(i, kind)| Line::from(item_text(i, *kind)))
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow));
            frame.render_widget(Clear, body);
            frame.render_widget(
                Paragraph::new(lines)
                    .block(block)
                    .style(Style::default().fg(Color::White).bg(Color::Black)),
                body,
            );
        }
    }
}
