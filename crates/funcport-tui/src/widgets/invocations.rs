//! Invocation telemetry view.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use funcport_app::AppState;

use crate::theme;

/// Recent invocations table plus detail rows for the selected trace.
pub struct InvocationsView<'a> {
    state: &'a AppState,
}

impl<'a> InvocationsView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn render_traces(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Invocations ")
            .border_style(Style::default().fg(theme::BORDER_DIM));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let invocations = &self.state.invocations;
        let Some(traces) = &invocations.traces else {
            let text = if invocations.loading {
                ("loading invocations...", theme::STATUS_YELLOW)
            } else if self.state.insights_component.is_none() {
                ("telemetry is not configured for this app", theme::TEXT_MUTED)
            } else if self.state.insights_token.is_none() {
                ("waiting for a telemetry token...", theme::TEXT_MUTED)
            } else {
                ("failed to load invocations", theme::STATUS_RED)
            };
            let line = Line::from(Span::styled(text.0, Style::default().fg(text.1)));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        };

        if traces.is_empty() {
            let line = Line::from(Span::styled(
                "no results",
                Style::default().fg(theme::TEXT_MUTED),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (row, trace) in traces.iter().take(inner.height as usize).enumerate() {
            let status = if trace.success { "ok " } else { "err" };
            let status_color = if trace.success {
                theme::STATUS_GREEN
            } else {
                theme::STATUS_RED
            };
            let mut text_style = Style::default().fg(theme::TEXT_SECONDARY);
            if row == invocations.selected {
                text_style = text_style.add_modifier(Modifier::REVERSED);
            }
            let line = Line::from(vec![
                Span::styled(format!(" {status} "), Style::default().fg(status_color)),
                Span::styled(
                    format!(
                        "{}  {}  {:.1}ms",
                        trace.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        trace.result_code,
                        trace.duration
                    ),
                    text_style,
                ),
            ]);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Details ")
            .border_style(Style::default().fg(theme::BORDER_DIM));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let invocations = &self.state.invocations;
        let Some(details) = &invocations.details else {
            let text = if invocations.details_loading {
                "loading..."
            } else {
                "select an invocation and press Enter"
            };
            let line = Line::from(Span::styled(text, Style::default().fg(theme::TEXT_MUTED)));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        };

        for (row, detail) in details.iter().take(inner.height as usize).enumerate() {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", detail.timestamp.format("%H:%M:%S%.3f")),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
                Span::styled(
                    format!("[{}] ", detail.log_level),
                    Style::default().fg(theme::STATUS_BLUE),
                ),
                Span::styled(
                    detail.message.clone(),
                    Style::default().fg(theme::TEXT_PRIMARY),
                ),
            ]);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

impl Widget for InvocationsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);
        self.render_traces(chunks[0], buf);
        self.render_details(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use funcport_app::testing::{FakeApi, FAKE_SITE_ID};
    use funcport_api::ResourceIds;

    fn state() -> AppState {
        AppState::new(ResourceIds::new(FAKE_SITE_ID, "httpping"))
    }

    #[test]
    fn test_placeholder_without_telemetry() {
        let mut term = TestTerminal::new();
        let state = state();
        term.render_widget(InvocationsView::new(&state), term.area());
        assert!(term.buffer_contains("telemetry is not configured"));
    }

    #[test]
    fn test_traces_render() {
        let mut term = TestTerminal::new();
        let api = FakeApi::healthy();
        let mut state = state();
        state.insights_component = api.component.clone();
        state.invocations.traces = Some(api.traces.clone());
        term.render_widget(InvocationsView::new(&state), term.area());

        assert!(term.buffer_contains("ok"));
        assert!(term.buffer_contains("200"));
        assert!(term.buffer_contains("select an invocation"));
    }

    #[test]
    fn test_details_render() {
        let mut term = TestTerminal::new();
        let api = FakeApi::healthy();
        let mut state = state();
        state.invocations.traces = Some(api.traces.clone());
        state.invocations.details = Some(api.details.clone());
        term.render_widget(InvocationsView::new(&state), term.area());

        assert!(term.buffer_contains("Executed"));
        assert!(term.buffer_contains("[Information]"));
    }

    #[test]
    fn test_empty_traces() {
        let mut term = TestTerminal::new();
        let mut state = state();
        state.invocations.traces = Some(Vec::new());
        term.render_widget(InvocationsView::new(&state), term.area());
        assert!(term.buffer_contains("no results"));
    }
}
