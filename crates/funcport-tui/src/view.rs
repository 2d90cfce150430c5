//! Main render/view function (View in TEA pattern)

use ratatui::Frame;

use funcport_app::{AppState, EditorFocus, View};

use crate::{layout, widgets};

/// Render the complete UI. Pure: reads resolved state, performs no I/O.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let areas = layout::create(area);

    let app_name = state.site.as_ref().map(|site| site.name.as_str());
    let header = widgets::MainHeader::new(app_name, &state.ids.function_name, state.view);
    frame.render_widget(header, areas.header);

    match state.view {
        View::Editor => render_editor(frame, state, areas.body),
        View::Integrate => frame.render_widget(widgets::IntegrateView::new(state), areas.body),
        View::Invocations => {
            frame.render_widget(widgets::InvocationsView::new(state), areas.body)
        }
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    // Overlays
    if state.test_panel.visible {
        let overlay = layout::centered(area, area.width.saturating_sub(10).max(40), 18);
        let panel = widgets::TestPanel::new(
            &state.test_panel,
            state.response_content.as_ref(),
            state.function_running,
        );
        frame.render_widget(panel, overlay);
    }

    if state.editor.show_discard_dialog {
        let overlay = layout::centered(area, 50, 5);
        let file_name = state
            .editor
            .selected_file
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or_default();
        let dialog = widgets::ConfirmDialog::new(
            "Discard changes",
            format!("Discard unsaved changes to {file_name}?"),
        );
        frame.render_widget(dialog, overlay);
    }

    if let Some(pending) = &state.editor.pending_switch {
        let overlay = layout::centered(area, 56, 5);
        let dialog = widgets::ConfirmDialog::new(
            "Change file",
            format!("Unsaved changes will be lost. Open {}?", pending.name),
        );
        frame.render_widget(dialog, overlay);
    }
}

fn render_editor(frame: &mut Frame, state: &AppState, body: ratatui::layout::Rect) {
    let (files_area, buffer_area) = layout::split_editor(body);
    let options = state.file_options();
    let selected_name = state.editor.selected_file.as_ref().map(|f| f.name.clone());

    let file_pane = widgets::FilePane::new(
        &options,
        state.editor.file_index,
        selected_name.as_deref(),
        state.editor.focus == EditorFocus::Files,
    );
    frame.render_widget(file_pane, files_area);

    let editor_pane =
        widgets::EditorPane::new(&state.editor, state.editor.focus == EditorFocus::Buffer);
    frame.render_widget(editor_pane, buffer_area);
}
