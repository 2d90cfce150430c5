//! Main update function - handles state transitions (TEA pattern)

use funcport_core::prelude::*;

use crate::editor::EditorState;
use crate::message::{Message, UpdateAction};
use crate::state::AppState;

use super::{keys, UpdateResult};

/// Process a message and update state.
/// Returns optional follow-up message and/or action.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Tick => UpdateResult::none(),

        Message::Key(key) => keys::handle_key(state, key),

        // ─────────────────────────────────────────────────────────
        // Loader Completions
        // ─────────────────────────────────────────────────────────
        Message::EditorLoaded(snapshot) => {
            state.apply_snapshot(*snapshot);
            let action = select_default_file(state);
            UpdateResult {
                message: Some(Message::CheckInsightsToken),
                action,
            }
        }

        Message::CheckInsightsToken => {
            if state.insights_token.is_none() {
                if let Some(component) = &state.insights_component {
                    return UpdateResult::action(UpdateAction::FetchInsightsToken {
                        component_id: component.id.clone(),
                    });
                }
            }
            UpdateResult::none()
        }

        Message::InsightsTokenLoaded { token } => {
            if token.is_some() {
                state.insights_token = token;
            }
            UpdateResult::none()
        }

        Message::FileContentLoaded { file, content } => {
            let normalized =
                content.map(|text| EditorState::normalize_file_text(text, &file.mime));
            state.editor.apply_content(normalized);
            UpdateResult::none()
        }

        Message::FileSaved { file_name, success } => {
            if success {
                state.editor.apply_saved();
            } else {
                state.editor.saving = false;
                warn!(
                    category = LogCategory::FunctionEdit.as_str(),
                    "save left {file_name} dirty"
                );
            }
            UpdateResult::none()
        }

        Message::RunCompleted {
            function_info,
            response,
        } => {
            state.function_running = false;
            if let Some(info) = function_info {
                state.function_info = Some(*info);
                state.rebuild_url_objs();
            }
            if let Some(response) = response {
                state.response_content = Some(response);
                state.test_panel.apply_response();
            }
            UpdateResult::none()
        }

        Message::FunctionUpdated { function_info } => {
            state.integrate.updating = false;
            if let Some(info) = function_info {
                let binding_count = info.properties.config.bindings.len();
                state.function_info = Some(*info);
                state.integrate.selected = state
                    .integrate
                    .selected
                    .min(binding_count.saturating_sub(1));
                state.rebuild_url_objs();
            }
            UpdateResult::none()
        }

        Message::BindingMetadataLoaded { metadata } => {
            state.integrate.loading = false;
            match metadata {
                Some(metadata) => {
                    state.integrate.binding_metadata = Some(metadata);
                    state.integrate.bindings_error = false;
                }
                None => state.integrate.bindings_error = true,
            }
            UpdateResult::none()
        }

        Message::InvocationsLoaded { traces } => {
            state.invocations.loading = false;
            if let Some(traces) = traces {
                state.invocations.selected = state
                    .invocations
                    .selected
                    .min(traces.len().saturating_sub(1));
                state.invocations.traces = Some(traces);
            }
            UpdateResult::none()
        }

        Message::InvocationDetailsLoaded { details } => {
            state.invocations.details_loading = false;
            state.invocations.details = details;
            UpdateResult::none()
        }
    }
}

/// Pick the file to show after a load: the script file when it is listed,
/// else the first option. Mirrors the remote contract where a refresh
/// re-selects and refetches.
fn select_default_file(state: &mut AppState) -> Option<UpdateAction> {
    let runtime_version = state.runtime_version.clone()?;
    let options = state.file_options();
    let info = state.function_info.as_ref()?;
    let file = EditorState::default_file(&options, &info.properties)?;
    state.editor.file_index = options
        .iter()
        .position(|f| f.name == file.name)
        .unwrap_or(0);
    state.editor.begin_fetch(file.clone());
    Some(UpdateAction::FetchFileContent {
        file,
        runtime_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_key::InputKey;
    use crate::loader::EditorSnapshot;
    use crate::test_panel::{ResponseContent, TestTab};
    use crate::testing::{FakeApi, FAKE_SITE_ID};
    use funcport_api::models::{ArmObj, VfsObject};
    use funcport_api::ResourceIds;

    fn ids() -> ResourceIds {
        ResourceIds::new(FAKE_SITE_ID, "httpping")
    }

    fn healthy_snapshot() -> EditorSnapshot {
        let api = FakeApi::healthy();
        EditorSnapshot {
            site: Some(ArmObj::new(FAKE_SITE_ID, "app1", api.site.clone())),
            function_info: Some(ArmObj::new(
                &ids().function_id,
                "httpping",
                api.function.clone(),
            )),
            host_keys: Some(api.host_keys.clone()),
            function_keys: Some(api.function_keys.clone()),
            host_status: Some(api.host_status.clone()),
            runtime_version: Some("~2".to_string()),
            host_json: Some(api.host_json.clone()),
            file_list: Some(api.files.clone()),
            insights_component: api.component.clone(),
            app_permission: true,
            extension_version_setting: None,
            test_data: None,
        }
    }

    #[test]
    fn test_editor_loaded_selects_script_file() {
        let mut state = AppState::new(ids());
        let result = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));

        // the script file (run.csx) wins over the alphabetical default
        let Some(UpdateAction::FetchFileContent { file, .. }) = result.action else {
            panic!("expected a content fetch for the default file");
        };
        assert_eq!(file.name, "run.csx");
        assert!(matches!(result.message, Some(Message::CheckInsightsToken)));
        assert!(!state.initial_loading);
    }

    #[test]
    fn test_insights_token_chain() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));

        let result = update(&mut state, Message::CheckInsightsToken);
        assert!(matches!(
            result.action,
            Some(UpdateAction::FetchInsightsToken { .. })
        ));

        let _ = update(
            &mut state,
            Message::InsightsTokenLoaded {
                token: Some("tok-1".to_string()),
            },
        );
        assert_eq!(state.insights_token.as_deref(), Some("tok-1"));

        // token already held: no second fetch
        let result = update(&mut state, Message::CheckInsightsToken);
        assert!(result.action.is_none());
    }

    #[test]
    fn test_failed_token_keeps_none() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::InsightsTokenLoaded { token: None });
        assert!(state.insights_token.is_none());
    }

    #[test]
    fn test_file_content_failure_flags_unavailable() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));

        let file = VfsObject {
            name: "run.csx".to_string(),
            mime: "text/plain".to_string(),
            ..VfsObject::default()
        };
        let _ = update(
            &mut state,
            Message::FileContentLoaded {
                file,
                content: None,
            },
        );
        assert_eq!(state.editor.content_available, Some(false));
    }

    #[test]
    fn test_json_file_content_pretty_printed() {
        let mut state = AppState::new(ids());
        let file = VfsObject {
            name: "function.json".to_string(),
            mime: "application/json".to_string(),
            ..VfsObject::default()
        };
        let _ = update(
            &mut state,
            Message::FileContentLoaded {
                file,
                content: Some(r#"{"a":1}"#.to_string()),
            },
        );
        assert_eq!(state.editor.content.latest, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_save_completion() {
        let mut state = AppState::new(ids());
        state.editor.apply_content(Some("a".to_string()));
        state.editor.insert_char('b');
        state.editor.saving = true;

        let _ = update(
            &mut state,
            Message::FileSaved {
                file_name: "run.csx".to_string(),
                success: true,
            },
        );
        assert!(!state.editor.is_dirty());
        assert_eq!(state.editor.file_saved_count, 1);

        state.editor.insert_char('c');
        state.editor.saving = true;
        let _ = update(
            &mut state,
            Message::FileSaved {
                file_name: "run.csx".to_string(),
                success: false,
            },
        );
        assert!(state.editor.is_dirty(), "failed save keeps the buffer dirty");
        assert!(!state.editor.saving);
    }

    #[test]
    fn test_run_completed_updates_response_and_info() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));
        state.function_running = true;

        let mut updated = state.function_info.clone().unwrap();
        updated.properties.test_data = Some("{}".to_string());
        let _ = update(
            &mut state,
            Message::RunCompleted {
                function_info: Some(Box::new(updated)),
                response: Some(ResponseContent {
                    code: 200,
                    text: "pong".to_string(),
                }),
            },
        );

        assert!(!state.function_running);
        assert_eq!(state.response_content.as_ref().unwrap().text, "pong");
        assert_eq!(state.test_panel.tab, TestTab::Output);
        assert_eq!(
            state
                .function_info
                .as_ref()
                .unwrap()
                .properties
                .test_data
                .as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_run_failure_keeps_previous_response() {
        let mut state = AppState::new(ids());
        state.function_running = true;
        state.response_content = Some(ResponseContent {
            code: 200,
            text: "old".to_string(),
        });

        let _ = update(
            &mut state,
            Message::RunCompleted {
                function_info: None,
                response: None,
            },
        );
        assert!(!state.function_running);
        assert_eq!(state.response_content.as_ref().unwrap().text, "old");
    }

    #[test]
    fn test_function_updated_replaces_local_copy() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));
        state.integrate.updating = true;
        state.integrate.selected = 0;

        let mut updated = state.function_info.clone().unwrap();
        updated.properties.config.bindings.clear();
        let _ = update(
            &mut state,
            Message::FunctionUpdated {
                function_info: Some(Box::new(updated)),
            },
        );

        assert!(!state.integrate.updating);
        assert!(state
            .function_info
            .as_ref()
            .unwrap()
            .properties
            .config
            .bindings
            .is_empty());
    }

    #[test]
    fn test_function_update_rejection_keeps_local_copy() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::EditorLoaded(Box::new(healthy_snapshot())));
        state.integrate.updating = true;

        let _ = update(&mut state, Message::FunctionUpdated { function_info: None });
        assert!(!state.integrate.updating);
        assert_eq!(
            state
                .function_info
                .as_ref()
                .unwrap()
                .properties
                .config
                .bindings
                .len(),
            1
        );
    }

    #[test]
    fn test_binding_metadata_failure_sets_banner_flag() {
        let mut state = AppState::new(ids());
        state.integrate.loading = true;
        let _ = update(&mut state, Message::BindingMetadataLoaded { metadata: None });
        assert!(state.integrate.bindings_error);
        assert!(!state.integrate.loading);

        let _ = update(
            &mut state,
            Message::BindingMetadataLoaded {
                metadata: Some(Vec::new()),
            },
        );
        assert!(!state.integrate.bindings_error);
    }

    #[test]
    fn test_invocations_selection_clamped() {
        let mut state = AppState::new(ids());
        state.invocations.selected = 10;
        let api = FakeApi::healthy();
        let _ = update(
            &mut state,
            Message::InvocationsLoaded {
                traces: Some(api.traces.clone()),
            },
        );
        assert_eq!(state.invocations.selected, 0);
    }

    #[test]
    fn test_quit_message() {
        let mut state = AppState::new(ids());
        let _ = update(&mut state, Message::Quit);
        assert!(state.should_quit());

        let mut state = AppState::new(ids());
        let result = update(&mut state, Message::Key(InputKey::Char('q')));
        assert!(matches!(result.message, Some(Message::Quit)));
    }
}
