//! Ad-hoc invocation test panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};

use funcport_app::{ResponseContent, TestPanelState, TestTab};

use crate::theme;

/// Overlay panel with input/output tabs for test invocations.
pub struct TestPanel<'a> {
    panel: &'a TestPanelState,
    response: Option<&'a ResponseContent>,
    running: bool,
}

impl<'a> TestPanel<'a> {
    pub fn new(
        panel: &'a TestPanelState,
        response: Option<&'a ResponseContent>,
        running: bool,
    ) -> Self {
        Self {
            panel,
            response,
            running,
        }
    }

    fn input_lines(&self) -> Vec<Line<'static>> {
        let panel = self.panel;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("method: ", Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(
                    panel.method.as_str().to_uppercase(),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::styled("   key: ", Style::default().fg(theme::TEXT_MUTED)),
                Span::styled(
                    if panel.selected_key.is_empty() {
                        "(none)".to_string()
                    } else {
                        panel.selected_key.clone()
                    },
                    Style::default().fg(theme::TEXT_SECONDARY),
                ),
            ]),
            Line::default(),
        ];

        lines.push(Line::from(Span::styled(
            "query parameters:",
            Style::default().fg(theme::TEXT_MUTED),
        )));
        if panel.queries.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (none)",
                Style::default().fg(theme::TEXT_MUTED),
            )));
        }
        for query in &panel.queries {
            lines.push(Line::from(Span::styled(
                format!("  {} = {}", query.name, query.value),
                Style::default().fg(theme::TEXT_SECONDARY),
            )));
        }

        lines.push(Line::from(Span::styled(
            "headers:",
            Style::default().fg(theme::TEXT_MUTED),
        )));
        for header in &panel.headers {
            lines.push(Line::from(Span::styled(
                format!("  {}: {}", header.name, header.value),
                Style::default().fg(theme::TEXT_SECONDARY),
            )));
        }

        lines.push(Line::from(Span::styled(
            if panel.editing_body {
                "body (editing, Esc to stop):"
            } else {
                "body:"
            },
            Style::default().fg(theme::TEXT_MUTED),
        )));
        for text in panel.body.split('\n') {
            lines.push(Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(theme::TEXT_PRIMARY),
            )));
        }

        lines
    }

    fn output_lines(&self) -> Vec<Line<'static>> {
        match self.response {
            Some(response) => {
                let status_style = if response.code < 400 {
                    Style::default().fg(theme::STATUS_GREEN)
                } else {
                    Style::default().fg(theme::STATUS_RED)
                };
                let mut lines = vec![
                    Line::from(vec![
                        Span::styled("status: ", Style::default().fg(theme::TEXT_MUTED)),
                        Span::styled(response.code.to_string(), status_style),
                    ]),
                    Line::default(),
                ];
                for text in response.text.split('\n') {
                    lines.push(Line::from(Span::styled(
                        text.to_string(),
                        Style::default().fg(theme::TEXT_PRIMARY),
                    )));
                }
                lines
            }
            None => vec![Line::from(Span::styled(
                "no response yet",
                Style::default().fg(theme::TEXT_MUTED),
            ))],
        }
    }
}

impl Widget for TestPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let tab_label = match self.panel.tab {
            TestTab::Input => "Input",
            TestTab::Output => "Output",
        };
        let title = if self.running {
            format!(" Test - {tab_label} (running...) ")
        } else {
            format!(" Test - {tab_label} ")
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(theme::BORDER_ACTIVE));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = match self.panel.tab {
            TestTab::Input => self.input_lines(),
            TestTab::Output => self.output_lines(),
        };

        if let Some(message) = &self.panel.status_message {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default()
                    .fg(theme::STATUS_RED)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(Span::styled(
            "[Enter] Run  [Tab] Input/Output  [m] Method  [k] Key  [b] Body  [Esc] Close",
            Style::default().fg(theme::TEXT_MUTED),
        )));

        for (row, line) in lines.iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + row as u16, line, inner.width);
        }
    }
}
