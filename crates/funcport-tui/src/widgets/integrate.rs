//! Bindings/integrate view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use funcport_app::{AppState, IntegrateState};
use funcport_api::models::BindingInfo;

use crate::theme;

/// Trigger / input / output binding summary for the open function.
pub struct IntegrateView<'a> {
    state: &'a AppState,
}

impl<'a> IntegrateView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn integrate(&self) -> &IntegrateState {
        &self.state.integrate
    }

    fn binding_line(binding: &BindingInfo, selected: bool) -> Line<'static> {
        let name = if binding.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            binding.name.clone()
        };
        let marker = if selected { "> " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(ratatui::style::Modifier::REVERSED)
        } else {
            Style::default().fg(theme::TEXT_PRIMARY)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{name}"), name_style),
            Span::styled(
                format!("  {}", binding.binding_type),
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ])
    }
}

impl Widget for IntegrateView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Integrate ")
            .border_style(Style::default().fg(theme::BORDER_DIM));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines: Vec<Line> = Vec::new();

        if self.integrate().bindings_error {
            lines.push(Line::from(Span::styled(
                "failed to load binding metadata",
                Style::default().fg(theme::STATUS_RED),
            )));
        } else if self.integrate().loading {
            lines.push(Line::from(Span::styled(
                "loading binding metadata...",
                Style::default().fg(theme::STATUS_YELLOW),
            )));
        }

        let Some(info) = &self.state.function_info else {
            lines.push(Line::from(Span::styled(
                "function not loaded",
                Style::default().fg(theme::TEXT_MUTED),
            )));
            for (row, line) in lines.iter().take(inner.height as usize).enumerate() {
                buf.set_line(inner.x, inner.y + row as u16, line, inner.width);
            }
            return;
        };
        let config = &info.properties.config;

        let missing = config.bindings_missing_direction();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|b| b.name.as_str()).collect();
            lines.push(Line::from(Span::styled(
                format!("bindings missing a direction: {}", names.join(", ")),
                Style::default().fg(theme::STATUS_YELLOW),
            )));
        }

        let selected_index = self.integrate().selected;
        let index_of = |binding: &BindingInfo| {
            config
                .bindings
                .iter()
                .position(|b| std::ptr::eq(b, binding))
                .unwrap_or(usize::MAX)
        };

        lines.push(Line::from(Span::styled(
            "Trigger",
            Style::default().fg(theme::ACCENT),
        )));
        let triggers = config.trigger_bindings();
        if triggers.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (none)",
                Style::default().fg(theme::TEXT_MUTED),
            )));
        }
        for binding in triggers {
            lines.push(Self::binding_line(binding, index_of(binding) == selected_index));
        }

        lines.push(Line::from(Span::styled(
            "Inputs",
            Style::default().fg(theme::ACCENT),
        )));
        for binding in config.input_bindings() {
            lines.push(Self::binding_line(binding, index_of(binding) == selected_index));
        }

        lines.push(Line::from(Span::styled(
            "Outputs",
            Style::default().fg(theme::ACCENT),
        )));
        for binding in config.output_bindings() {
            lines.push(Self::binding_line(binding, index_of(binding) == selected_index));
        }

        if let Some(metadata) = &self.integrate().binding_metadata {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!("{} binding types available on this host", metadata.len()),
                Style::default().fg(theme::TEXT_MUTED),
            )));
        }

        lines.push(Line::from(Span::styled(
            if self.integrate().updating {
                "saving binding changes..."
            } else {
                "[Up/Down] Select  [x] Remove binding"
            },
            Style::default().fg(theme::TEXT_MUTED),
        )));

        for (row, line) in lines.iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + row as u16, line, inner.width);
        }
    }
}
