//! Analysis results: score cards, issues, suggestions and generated tests.

use crate::app::panels::PanelState;
use crate::model::analysis::{AnalysisResult, ScoreRating, Severity};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

fn rating_color(score: u8) -> Color {
    match ScoreRating::for_score(score) {
        ScoreRating::Good => Color::Green,
        ScoreRating::Fair => Color::Yellow,
        ScoreRating::Poor => Color::Red,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn score_card(label: &str, score: u8) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{label}: ")),
        Span::styled(
            format!("{score:>3}"),
            Style::default()
                .fg(rating_color(score))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ]
}

fn code_lines(code: &str, prefix: &'static str, color: Color) -> Vec<Line<'static>> {
    code.lines()
        .map(|l| {
            Line::from(Span::styled(
                format!("  {prefix}{l}"),
                Style::default().fg(color),
            ))
        })
        .collect()
}

/// Text of the panel for a finished analysis
pub fn result_lines(result: &AnalysisResult) -> Vec<Line<'static>> {
    let m = &result.metrics;
    let mut lines = vec![heading("Scores")];
    let mut cards = score_card("Overall", m.overall_score);
    cards.extend(score_card("Readability", m.readability_score));
    lines.push(Line::from(cards));
    let mut cards = score_card("Security", m.security_score);
    cards.extend(score_card("Performance", m.performance_score));
    lines.push(Line::from(cards));
    lines.push(Line::default());

    lines.push(heading(&format!("Issues ({})", result.issues.len())));
    if result.issues.is_empty() {
        lines.push(Line::from("  No issues found"));
    }
    for issue in &result.issues {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}]", issue.severity.label()),
                Style::default().fg(severity_color(issue.severity)),
            ),
            Span::styled(
                format!("[{}] ", issue.issue_type.label()),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(format!("Line {}: {}", issue.line, issue.message)),
        ]));
    }
    lines.push(Line::default());

    lines.push(heading(&format!("Suggestions ({})", result.suggestions.len())));
    for suggestion in &result.suggestions {
        lines.push(Line::from(format!("• {}", suggestion.description)));
        if let Some(original) = &suggestion.original_code {
            lines.extend(code_lines(original, "- ", Color::Red));
        }
        if let Some(improved) = &suggestion.improved_code {
            lines.extend(code_lines(improved, "+ ", Color::Green));
        }
    }
    lines.push(Line::default());

    lines.push(heading(&format!("Test Cases ({})", result.test_cases.len())));
    for test in &result.test_cases {
        lines.push(Line::from(Span::styled(
            test.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if !test.description.is_empty() {
            lines.push(Line::from(format!("  {}", test.description)));
        }
        lines.extend(code_lines(&test.code, "", Color::Gray));
    }
    lines
}

pub struct ResultsPanelRenderer;

impl ResultsPanelRenderer {
    pub fn render(frame: &mut Frame, area: Rect, state: &PanelState<AnalysisResult>, scroll: u16) {
        let lines = match state {
            PanelState::Idle => vec![Line::from("Press F5 to analyze the document")],
            PanelState::Loading => vec![Line::from("Analyzing...")],
            PanelState::Failed(message) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
            PanelState::Ready(result) => result_lines(result),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Analysis Results ");
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            area,
        );
    }
}
