//! Header bar: app title, function name, view tabs, key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use funcport_app::View;

use crate::theme;

/// Main header showing the app title, the open function, and view tabs.
pub struct MainHeader<'a> {
    app_name: Option<&'a str>,
    function_name: &'a str,
    view: View,
}

impl<'a> MainHeader<'a> {
    pub fn new(app_name: Option<&'a str>, function_name: &'a str, view: View) -> Self {
        Self {
            app_name,
            function_name,
            view,
        }
    }

    fn tab_span(&self, label: &str, key: &str, active: bool) -> Vec<Span<'static>> {
        let style = if active {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        vec![
            Span::styled(format!("[{key}]"), Style::default().fg(theme::STATUS_YELLOW)),
            Span::styled(format!(" {label}  "), style),
        ]
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().border_style(Style::default().fg(theme::BORDER_DIM));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                "Funcport",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" / ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled(
                self.app_name.unwrap_or("functions"),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
            Span::styled(" / ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled(self.function_name, Style::default().fg(theme::TEXT_PRIMARY)),
            Span::raw("   "),
        ];
        spans.extend(self.tab_span("Code", "1", self.view == View::Editor));
        spans.extend(self.tab_span("Integrate", "2", self.view == View::Integrate));
        spans.extend(self.tab_span("Monitor", "3", self.view == View::Invocations));
        spans.push(Span::styled(
            "[t] Test  [r] Refresh  [q] Quit",
            Style::default().fg(theme::TEXT_MUTED),
        ));

        let line = Line::from(spans);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_header_renders_names() {
        let mut term = TestTerminal::with_size(120, 24);
        let header = MainHeader::new(Some("app1"), "httpping", View::Editor);
        term.render_widget(header, term.area());

        assert!(term.buffer_contains("Funcport"));
        assert!(term.buffer_contains("app1"));
        assert!(term.buffer_contains("httpping"));
    }

    #[test]
    fn test_header_without_app_name() {
        let mut term = TestTerminal::new();
        let header = MainHeader::new(None, "f1", View::Editor);
        term.render_widget(header, term.area());

        assert!(term.buffer_contains("functions"));
    }

    #[test]
    fn test_header_shows_tabs() {
        let mut term = TestTerminal::with_size(120, 24);
        let header = MainHeader::new(Some("app1"), "f1", View::Integrate);
        term.render_widget(header, term.area());

        assert!(term.buffer_contains("Code"));
        assert!(term.buffer_contains("Integrate"));
        assert!(term.buffer_contains("Monitor"));
    }
}
