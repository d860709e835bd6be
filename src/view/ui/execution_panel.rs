//! Program output returned by the execution endpoint.

use crate::app::panels::PanelState;
use crate::model::analysis::ExecutionResult;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn execution_lines(result: &ExecutionResult) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Output", bold))];
    if result.output.is_empty() {
        lines.push(Line::from(Span::styled(
            "No output",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.extend(result.output.lines().map(|l| Line::from(l.to_string())));
    }

    if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Error", bold.fg(Color::Red))));
        lines.extend(
            error
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Red)))),
        );
    }

    lines.push(Line::default());
    lines.push(Line::from(format!(
        "Execution time: {:.2} ms",
        result.execution_time
    )));
    lines
}

pub struct ExecutionPanelRenderer;

impl ExecutionPanelRenderer {
    pub fn render(frame: &mut Frame, area: Rect, state: &PanelState<ExecutionResult>, scroll: u16) {
        let lines = match state {
            PanelState::Idle => vec![Line::from("Press F6 to run the document")],
            PanelState::Loading => vec![Line::from("Running...")],
            PanelState::Failed(message) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
            PanelState::Ready(result) => execution_lines(result),
        };
        let block = Block::default().borders(Borders::ALL).title(" Execution ");
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            area,
        );
    }
}
