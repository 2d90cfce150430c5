//! File selector pane.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use funcport_api::models::VfsObject;

use crate::theme;

/// Sidebar listing the function's files.
pub struct FilePane<'a> {
    options: &'a [VfsObject],
    highlighted: usize,
    selected_name: Option<&'a str>,
    focused: bool,
}

impl<'a> FilePane<'a> {
    pub fn new(
        options: &'a [VfsObject],
        highlighted: usize,
        selected_name: Option<&'a str>,
        focused: bool,
    ) -> Self {
        Self {
            options,
            highlighted,
            selected_name,
            focused,
        }
    }
}

impl Widget for FilePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            theme::BORDER_ACTIVE
        } else {
            theme::BORDER_DIM
        };
        let block = Block::bordered()
            .title(" Files ")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.options.is_empty() {
            let line = Line::from(Span::styled(
                "host unreachable",
                Style::default().fg(theme::STATUS_RED),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (row, file) in self.options.iter().enumerate() {
            if row as u16 >= inner.height {
                break;
            }
            let open = self.selected_name == Some(file.name.as_str());
            let marker = if open { "> " } else { "  " };
            let mut style = Style::default().fg(theme::TEXT_SECONDARY);
            if open {
                style = Style::default().fg(theme::TEXT_PRIMARY);
            }
            if row == self.highlighted && self.focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let line = Line::from(Span::styled(format!("{marker}{}", file.name), style));
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}
