//! Confirmation dialog overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};

use crate::theme;

/// Centered confirm/cancel dialog.
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: String,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(theme::BORDER_ACTIVE));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = [
            Line::from(Span::styled(
                self.message,
                Style::default().fg(theme::TEXT_PRIMARY),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled(
                    "[Enter] OK",
                    Style::default()
                        .fg(theme::STATUS_YELLOW)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   [Esc] Cancel", Style::default().fg(theme::TEXT_MUTED)),
            ]),
        ];
        for (row, line) in lines.iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + row as u16, line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_dialog_renders_message() {
        let mut term = TestTerminal::new();
        let dialog = ConfirmDialog::new("Discard changes", "Unsaved changes will be lost.");
        term.render_widget(dialog, term.area());

        assert!(term.buffer_contains("Discard changes"));
        assert!(term.buffer_contains("Unsaved changes will be lost."));
        assert!(term.buffer_contains("[Enter] OK"));
    }
}
