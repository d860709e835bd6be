use super::panels::PanelKind;
use super::Editor;
use crate::model::document::{Document, Position, TextRange};
use crate::primitives::visual_layout::char_display_width;
use crate::view::ui::execution_panel::ExecutionPanelRenderer;
use crate::view::ui::results_panel::ResultsPanelRenderer;
use crate::view::ui::selection_menu::SelectionMenuRenderer;
use crate::view::ui::status_bar::{StatusBarRenderer, StatusInfo};
use crate::view::viewport::Viewport;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Spans for one line of text: tabs expanded, scrolled horizontally and
/// with the selected characters highlighted
fn text_line_spans(
    text: &str,
    line: usize,
    selection: TextRange,
    viewport: &Viewport,
) -> Vec<Span<'static>> {
    let selected_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    let width = viewport.text_width();
    let left = viewport.left_column;

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_selected = false;
    let mut visual = 0;

    for (idx, ch) in text.chars().enumerate() {
        if visual >= left + width {
            break;
        }
        let cell_width = char_display_width(ch, visual, viewport.tab_size);
        let pos = Position::new(line, idx);
        let selected = selection.start <= pos && pos < selection.end;
        let rendered: String = if ch == '\t' {
            " ".repeat(cell_width)
        } else {
            ch.to_string()
        };

        // Characters straddling the left edge are dropped
        if visual >= left {
            if selected != run_selected && !run.is_empty() {
                let style = if run_selected { selected_style } else { Style::default() };
                spans.push(Span::styled(std::mem::take(&mut run), style));
            }
            run_selected = selected;
            run.push_str(&rendered);
        }
        visual += cell_width;
    }

    // The line break of a selected line shows as one highlighted cell
    let newline = Position::new(line, text.chars().count());
    if selection.start <= newline && newline < selection.end && visual >= left && visual < left + width
    {
        if !run_selected && !run.is_empty() {
            spans.push(Span::raw(std::mem::take(&mut run)));
        }
        run_selected = true;
        run.push(' ');
    }

    if !run.is_empty() {
        let style = if run_selected { selected_style } else { Style::default() };
        spans.push(Span::styled(run, style));
    }
    spans
}

fn text_lines(document: &Document, selection: TextRange, viewport: &Viewport) -> Vec<Line<'static>> {
    let gutter_style = Style::default().fg(Color::DarkGray);
    let digits = (viewport.gutter_width as usize).saturating_sub(3);

    (viewport.top_line..document.line_count())
        .take(viewport.visible_lines())
        .map(|line| {
            let mut spans = Vec::new();
            if viewport.gutter_width > 0 {
                spans.push(Span::styled(
                    format!("{:>digits$} │ ", line + 1),
                    gutter_style,
                ));
            }
            let text = document.line(line).unwrap_or("");
            spans.extend(text_line_spans(text, line, selection, viewport));
            Line::from(spans)
        })
        .collect()
}

impl Editor {
    /// Render the editor to the terminal
    pub fn render(&mut self, frame: &mut Frame) {
        let _span = tracing::trace_span!("render").entered();

        let size = frame.area();
        if size.width != self.terminal_width || size.height != self.terminal_height {
            self.resize(size.width, size.height);
        }

        self.render_text(frame, self.layout.text);

        if let Some(area) = self.layout.panel {
            match self.open_panel {
                Some(PanelKind::Analysis) => {
                    ResultsPanelRenderer::render(frame, area, &self.analysis, self.panel_scroll)
                }
                Some(PanelKind::Execution) => {
                    ExecutionPanelRenderer::render(frame, area, &self.execution, self.panel_scroll)
                }
                None => {}
            }
        }

        let menu = self.controller.update_layout(self.layout.text);
        SelectionMenuRenderer::render(frame, &menu, self.controller.is_loading());

        let document = &self.view.document;
        let file_name = document
            .file_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        let info = StatusInfo {
            file_name,
            modified: document.is_modified(),
            language: self.controller.language(),
            cursor: self.view.cursor(),
            loading: self.is_busy(),
            message: self.status_message.as_deref(),
        };
        StatusBarRenderer::render(frame, self.layout.status, &info);
        StatusBarRenderer::render_feedback(frame, self.layout.feedback, self.controller.feedback());
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        let lines = text_lines(
            &self.view.document,
            self.view.selection.range(),
            &self.view.viewport,
        );
        frame.render_widget(Paragraph::new(lines), area);

        if let Some((col, row)) = self
            .view
            .viewport
            .screen_position(&self.view.document, self.view.cursor())
        {
            frame.set_cursor_position((col, row));
        }
    }
}
