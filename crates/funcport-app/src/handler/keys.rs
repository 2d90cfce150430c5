//! Key event handlers for UI modes.
//!
//! Dialogs take priority over panels, panels over the insert-mode buffer,
//! and the buffer over global navigation keys.

use crate::editor::EditorFocus;
use crate::input_key::InputKey;
use crate::message::{Message, UpdateAction};
use crate::state::{AppState, View};

use super::run::build_run_action;
use super::UpdateResult;

/// Process a key event against the current UI mode.
pub fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.editor.show_discard_dialog {
        return handle_discard_dialog_key(state, key);
    }
    if state.editor.pending_switch.is_some() {
        return handle_switch_dialog_key(state, key);
    }
    if state.test_panel.visible {
        return handle_test_panel_key(state, key);
    }
    if state.view == View::Editor && state.editor.insert_mode {
        return handle_insert_key(state, key);
    }
    handle_normal_key(state, key)
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialogs
// ─────────────────────────────────────────────────────────────────────────────

fn handle_discard_dialog_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Enter | InputKey::Char('y') => {
            state.editor.confirm_discard();
            UpdateResult::none()
        }
        InputKey::Esc | InputKey::Char('n') => {
            state.editor.cancel_discard();
            UpdateResult::none()
        }
        _ => UpdateResult::none(),
    }
}

fn handle_switch_dialog_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Enter | InputKey::Char('y') => {
            let Some(runtime_version) = state.runtime_version.clone() else {
                state.editor.cancel_switch();
                return UpdateResult::none();
            };
            match state.editor.confirm_switch() {
                Some(file) => UpdateResult::action(UpdateAction::FetchFileContent {
                    file,
                    runtime_version,
                }),
                None => UpdateResult::none(),
            }
        }
        InputKey::Esc | InputKey::Char('n') => {
            state.editor.cancel_switch();
            UpdateResult::none()
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test panel
// ─────────────────────────────────────────────────────────────────────────────

fn handle_test_panel_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if state.test_panel.editing_body {
        match key {
            InputKey::Esc => state.test_panel.editing_body = false,
            InputKey::Char(c) => state.test_panel.body.push(c),
            InputKey::Enter => state.test_panel.body.push('\n'),
            InputKey::Backspace => {
                state.test_panel.body.pop();
            }
            _ => {}
        }
        return UpdateResult::none();
    }

    match key {
        InputKey::Esc => {
            state.test_panel.close();
            UpdateResult::none()
        }
        InputKey::Tab | InputKey::BackTab => {
            state.test_panel.toggle_tab();
            UpdateResult::none()
        }
        InputKey::Char('m') => {
            state.test_panel.cycle_method();
            UpdateResult::none()
        }
        InputKey::Char('k') => {
            let labels = state.key_labels();
            state.test_panel.cycle_key(&labels);
            UpdateResult::none()
        }
        InputKey::Char('b') => {
            state.test_panel.editing_body = true;
            UpdateResult::none()
        }
        InputKey::Enter => {
            if state.function_running {
                return UpdateResult::none();
            }
            if let Some(message) = state.test_panel.validate() {
                state.test_panel.status_message = Some(message);
                return UpdateResult::none();
            }
            state.test_panel.status_message = None;
            match build_run_action(state) {
                Some(action) => {
                    state.function_running = true;
                    UpdateResult::action(action)
                }
                None => UpdateResult::none(),
            }
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Buffer insert mode
// ─────────────────────────────────────────────────────────────────────────────

fn handle_insert_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let editor = &mut state.editor;
    match key {
        InputKey::Esc => editor.insert_mode = false,
        InputKey::Char(c) => editor.insert_char(c),
        InputKey::Enter => editor.insert_newline(),
        InputKey::Backspace => editor.backspace(),
        InputKey::Delete => editor.delete(),
        InputKey::Left => editor.move_left(),
        InputKey::Right => editor.move_right(),
        InputKey::Up => editor.move_up(),
        InputKey::Down => editor.move_down(),
        InputKey::Home => editor.move_line_start(),
        InputKey::End => editor.move_line_end(),
        _ => {}
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Normal mode
// ─────────────────────────────────────────────────────────────────────────────

fn handle_normal_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('q') | InputKey::CharCtrl('c') => UpdateResult::message(Message::Quit),

        InputKey::Char('1') => {
            state.view = View::Editor;
            UpdateResult::none()
        }
        InputKey::Char('2') => {
            state.view = View::Integrate;
            if state.integrate.binding_metadata.is_none() && !state.integrate.loading {
                state.integrate.loading = true;
                return UpdateResult::action(UpdateAction::LoadBindingMetadata);
            }
            UpdateResult::none()
        }
        InputKey::Char('3') => {
            state.view = View::Invocations;
            maybe_load_invocations(state)
        }

        InputKey::Char('r') => {
            if state.is_refreshing {
                return UpdateResult::none();
            }
            state.is_refreshing = true;
            UpdateResult::action(UpdateAction::Refresh)
        }

        _ => match state.view {
            View::Editor => handle_editor_key(state, key),
            View::Invocations => handle_invocations_key(state, key),
            View::Integrate => handle_integrate_key(state, key),
        },
    }
}

fn handle_editor_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    match key {
        InputKey::Tab | InputKey::BackTab => {
            state.editor.focus = match state.editor.focus {
                EditorFocus::Files => EditorFocus::Buffer,
                EditorFocus::Buffer => EditorFocus::Files,
            };
            UpdateResult::none()
        }

        InputKey::Up if state.editor.focus == EditorFocus::Files => {
            state.editor.file_index = state.editor.file_index.saturating_sub(1);
            UpdateResult::none()
        }
        InputKey::Down if state.editor.focus == EditorFocus::Files => {
            let count = state.file_options().len();
            if count > 0 {
                state.editor.file_index = (state.editor.file_index + 1).min(count - 1);
            }
            UpdateResult::none()
        }
        InputKey::Enter if state.editor.focus == EditorFocus::Files => {
            let options = state.file_options();
            let Some(file) = options.get(state.editor.file_index).cloned() else {
                return UpdateResult::none();
            };
            let Some(runtime_version) = state.runtime_version.clone() else {
                return UpdateResult::none();
            };
            if state.editor.request_switch(file.clone()) {
                UpdateResult::action(UpdateAction::FetchFileContent {
                    file,
                    runtime_version,
                })
            } else {
                UpdateResult::none()
            }
        }

        InputKey::Char('i') => {
            if editor_enabled(state) {
                state.editor.focus = EditorFocus::Buffer;
                state.editor.insert_mode = true;
            }
            UpdateResult::none()
        }

        InputKey::Char('s') => {
            if state.editor.saving || !state.app_permission {
                return UpdateResult::none();
            }
            let Some(file) = state.editor.selected_file.clone() else {
                return UpdateResult::none();
            };
            let Some(runtime_version) = state.runtime_version.clone() else {
                return UpdateResult::none();
            };
            state.editor.saving = true;
            UpdateResult::action(UpdateAction::SaveFile {
                file,
                content: state.editor.content.latest.clone(),
                runtime_version,
            })
        }

        InputKey::Char('u') => {
            state.editor.request_discard();
            UpdateResult::none()
        }

        InputKey::Char('t') => {
            if state.is_test_disabled() {
                return UpdateResult::none();
            }
            open_test_panel(state);
            UpdateResult::none()
        }

        _ => UpdateResult::none(),
    }
}

fn handle_integrate_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let binding_count = state
        .function_info
        .as_ref()
        .map(|info| info.properties.config.bindings.len())
        .unwrap_or(0);
    match key {
        InputKey::Up => {
            state.integrate.selected = state.integrate.selected.saturating_sub(1);
            UpdateResult::none()
        }
        InputKey::Down => {
            if binding_count > 0 {
                state.integrate.selected = (state.integrate.selected + 1).min(binding_count - 1);
            }
            UpdateResult::none()
        }
        // Remove the highlighted binding and write the config back wholesale
        InputKey::Char('x') | InputKey::Delete => {
            if state.integrate.updating || !state.app_permission {
                return UpdateResult::none();
            }
            let Some(info) = state.function_info.clone() else {
                return UpdateResult::none();
            };
            if state.integrate.selected >= info.properties.config.bindings.len() {
                return UpdateResult::none();
            }
            let mut updated = info;
            updated
                .properties
                .config
                .bindings
                .remove(state.integrate.selected);
            state.integrate.updating = true;
            UpdateResult::action(UpdateAction::UpdateFunction {
                info: Box::new(updated),
            })
        }
        _ => UpdateResult::none(),
    }
}

fn handle_invocations_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let trace_count = state
        .invocations
        .traces
        .as_ref()
        .map(Vec::len)
        .unwrap_or(0);
    match key {
        InputKey::Up => {
            state.invocations.selected = state.invocations.selected.saturating_sub(1);
            UpdateResult::none()
        }
        InputKey::Down => {
            if trace_count > 0 {
                state.invocations.selected =
                    (state.invocations.selected + 1).min(trace_count - 1);
            }
            UpdateResult::none()
        }
        InputKey::Enter => {
            let Some((app_id, token)) = insights_query_context(state) else {
                return UpdateResult::none();
            };
            let Some(trace) = state
                .invocations
                .traces
                .as_ref()
                .and_then(|traces| traces.get(state.invocations.selected))
            else {
                return UpdateResult::none();
            };
            let action = UpdateAction::LoadInvocationDetails {
                app_id,
                token,
                operation_id: trace.operation_id.clone(),
                invocation_id: trace.invocation_id.clone(),
            };
            state.invocations.details = None;
            state.invocations.details_loading = true;
            UpdateResult::action(action)
        }
        _ => UpdateResult::none(),
    }
}

fn maybe_load_invocations(state: &mut AppState) -> UpdateResult {
    if state.invocations.traces.is_some() || state.invocations.loading {
        return UpdateResult::none();
    }
    let Some((app_id, token)) = insights_query_context(state) else {
        return UpdateResult::none();
    };
    state.invocations.loading = true;
    UpdateResult::action(UpdateAction::LoadInvocations { app_id, token })
}

fn insights_query_context(state: &AppState) -> Option<(String, String)> {
    let app_id = state
        .insights_component
        .as_ref()
        .and_then(|c| c.properties.app_id.clone())?;
    let token = state.insights_token.clone()?;
    Some((app_id, token))
}

fn editor_enabled(state: &AppState) -> bool {
    state.app_permission
        && state.is_runtime_reachable()
        && state.editor.content_available == Some(true)
        && !state.is_busy()
}

fn open_test_panel(state: &mut AppState) {
    let url = state.function_url(None);
    let default_key = state.default_key_label();
    let test_data = state.test_data.clone();
    let inline = state
        .function_info
        .as_ref()
        .and_then(|info| info.properties.test_data.clone());
    state
        .test_panel
        .seed(test_data.as_deref(), inline.as_deref(), &url, default_key);
    state.test_panel.visible = true;
}
