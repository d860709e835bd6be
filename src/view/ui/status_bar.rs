//! Status bar and feedback line rendering

use crate::app::feedback::{Feedback, FeedbackKind};
use crate::model::document::Position;
use crate::primitives::language::Language;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Key hints shown on the feedback line when there is no message
pub const KEY_HINTS: &str =
    "F2 language  F4 actions  F5 analyze  F6 run  Esc close  Ctrl+S save  Ctrl+Q quit";

/// Everything the status bar shows
#[derive(Debug, Clone)]
pub struct StatusInfo<'a> {
    pub file_name: Option<&'a str>,
    pub modified: bool,
    pub language: Language,
    pub cursor: Position,
    /// A selection action is running
    pub loading: bool,
    pub message: Option<&'a str>,
}

/// Plain text of the status bar
pub fn status_text(info: &StatusInfo) -> String {
    let mut text = format!(
        " {}{} | {} | Ln {}, Col {}",
        info.file_name.unwrap_or("[No Name]"),
        if info.modified { " [+]" } else { "" },
        info.language.label(),
        info.cursor.line + 1,
        info.cursor.column + 1
    );
    if info.loading {
        text.push_str(" | Working...");
    }
    if let Some(message) = info.message {
        text.push_str(" | ");
        text.push_str(message);
    }
    text
}

/// Renders the status bar and the feedback line below it
pub struct StatusBarRenderer;

impl StatusBarRenderer {
    pub fn render(frame: &mut Frame, area: Rect, info: &StatusInfo) {
        let style = Style::default().fg(Color::Black).bg(Color::White);
        frame.render_widget(Paragraph::new(status_text(info)).style(style), area);
    }

    pub fn render_feedback(frame: &mut Frame, area: Rect, feedback: Option<&Feedback>) {
        let line = match feedback {
            Some(feedback) => {
                let color = match feedback.kind {
                    FeedbackKind::Success => Color::Green,
                    FeedbackKind::Error => Color::Red,
                };
                Line::from(Span::styled(
                    feedback.message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
            None => Line::from(Span::styled(
                KEY_HINTS,
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
