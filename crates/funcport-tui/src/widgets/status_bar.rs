//! Bottom status bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use funcport_app::AppState;

use crate::theme;

/// One-line status: load state, runtime version, permission, dirty marker.
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let state = self.state;

        let mut spans: Vec<Span> = Vec::new();
        if state.initial_loading {
            spans.push(Span::styled(
                " loading...",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
        } else if state.is_refreshing {
            spans.push(Span::styled(
                " refreshing...",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
        } else if state.function_running {
            spans.push(Span::styled(
                " running...",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
        } else {
            spans.push(Span::styled(
                " ready",
                Style::default().fg(theme::STATUS_GREEN),
            ));
        }

        if let Some(version) = &state.runtime_version {
            spans.push(Span::styled(
                format!("  runtime {version}"),
                Style::default().fg(theme::TEXT_SECONDARY),
            ));
        }

        if !state.app_permission {
            spans.push(Span::styled(
                "  read-only",
                Style::default().fg(theme::STATUS_RED),
            ));
        }

        if state.runtime_version_mismatch() {
            spans.push(Span::styled(
                "  version pin mismatch",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
        }

        if state.editor.is_dirty() {
            spans.push(Span::styled(
                "  * unsaved changes",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
        }

        if state.editor.file_saved_count > 0 {
            spans.push(Span::styled(
                format!("  saved x{}", state.editor.file_saved_count),
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
