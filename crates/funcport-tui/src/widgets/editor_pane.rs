//! Code buffer pane.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use funcport_app::EditorState;

use crate::theme;

/// The edit buffer with a simple cursor and scroll-to-cursor behavior.
pub struct EditorPane<'a> {
    editor: &'a EditorState,
    focused: bool,
}

impl<'a> EditorPane<'a> {
    pub fn new(editor: &'a EditorState, focused: bool) -> Self {
        Self { editor, focused }
    }

    fn title(&self) -> String {
        let name = self
            .editor
            .selected_file
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or("(no file)");
        let mode = if self.editor.insert_mode {
            " [insert]"
        } else {
            ""
        };
        format!(" {name} ({}){mode} ", self.editor.language.as_str())
    }
}

impl Widget for EditorPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            theme::BORDER_ACTIVE
        } else {
            theme::BORDER_DIM
        };
        let block = Block::bordered()
            .title(self.title())
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.editor.fetching_content {
            let line = Line::from(Span::styled(
                "loading...",
                Style::default().fg(theme::STATUS_YELLOW),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        if self.editor.content_available == Some(false) {
            let line = Line::from(Span::styled(
                "failed to load file content",
                Style::default().fg(theme::STATUS_RED),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let (cursor_line, cursor_column) = self.editor.cursor_position();
        let height = inner.height as usize;
        let first_line = cursor_line.saturating_sub(height.saturating_sub(1));

        for (row, text) in self
            .editor
            .content
            .latest
            .split('\n')
            .skip(first_line)
            .take(height)
            .enumerate()
        {
            let line_no = first_line + row;
            let line = if self.focused && self.editor.insert_mode && line_no == cursor_line {
                cursor_line_spans(text, cursor_column)
            } else {
                Line::from(Span::styled(
                    text.to_string(),
                    Style::default().fg(theme::TEXT_PRIMARY),
                ))
            };
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

/// Split a line around the cursor column and reverse-video the cursor cell.
fn cursor_line_spans(text: &str, column: usize) -> Line<'static> {
    let before: String = text.chars().take(column).collect();
    let at: String = text.chars().skip(column).take(1).collect();
    let after: String = text.chars().skip(column + 1).collect();

    let cursor_symbol = if at.is_empty() { " ".to_string() } else { at };
    Line::from(vec![
        Span::styled(before, Style::default().fg(theme::TEXT_PRIMARY)),
        Span::styled(
            cursor_symbol,
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::REVERSED),
        ),
        Span::styled(after, Style::default().fg(theme::TEXT_PRIMARY)),
    ])
}
