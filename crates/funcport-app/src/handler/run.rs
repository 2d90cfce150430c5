//! Test invocation assembly.
//!
//! A run persists the edited test payload onto the function resource, then
//! invokes the function at its public URL: path parameters substituted from
//! the query rows, leftovers appended as the query string, and the
//! authorizing key attached as `x-functions-key`.

use std::collections::BTreeMap;

use funcport_core::invoke_url::{append_query_string, query_string, substitute_path_params};
use funcport_core::{NameValuePair, FUNCTIONS_KEY_HEADER};

use crate::message::UpdateAction;
use crate::state::AppState;
use crate::urls::resolve_key_value;

/// Assemble the run action from the current form state. Returns `None` when
/// the function or site has not loaded.
pub fn build_run_action(state: &AppState) -> Option<UpdateAction> {
    let info = state.function_info.as_ref()?;
    let site = state.site.as_ref()?;

    let data = state.test_panel.test_data();

    let mut updated = info.clone();
    updated.properties.test_data = Some(data.to_json());

    // URL: default-key invoke path, then path params, then leftover queries
    let base = format!("{}{}", site.properties.main_url(), state.invoke_path(None));
    let (url, processed) = substitute_path_params(&base, &data.queries);
    let remaining: Vec<NameValuePair> = data
        .queries
        .iter()
        .filter(|q| !processed.contains(&q.name))
        .cloned()
        .collect();
    let url = append_query_string(&url, &query_string(&remaining));

    let headers = run_headers(state, &data.headers);

    Some(UpdateAction::RunFunction {
        info: Box::new(updated),
        url,
        method: data.method,
        headers,
        body: data.body,
    })
}

/// JSON headers plus user rows, with the authorizing key when the master key
/// is known. An explicitly selected label resolves through the URL lists; an
/// unknown label degrades to an empty key value.
fn run_headers(state: &AppState, user_headers: &[NameValuePair]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    for header in user_headers {
        headers.insert(header.name.clone(), header.value.clone());
    }

    if let Some(master) = state
        .host_keys
        .as_ref()
        .and_then(|keys| keys.master_key.as_deref())
    {
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        let label = &state.test_panel.selected_key;
        let key = if label.is_empty() {
            master
        } else {
            resolve_key_value(label, &state.function_urls, &state.host_urls).unwrap_or("")
        };
        headers.insert(FUNCTIONS_KEY_HEADER.to_string(), key.to_string());
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::EditorSnapshot;
    use crate::state::AppState;
    use crate::testing::{FakeApi, FAKE_SITE_ID};
    use funcport_api::models::ArmObj;
    use funcport_api::ResourceIds;
    use funcport_core::HttpMethod;

    fn loaded_state() -> AppState {
        let api = FakeApi::healthy();
        let ids = ResourceIds::new(FAKE_SITE_ID, "httpping");
        let mut state = AppState::new(ids.clone());
        state.apply_snapshot(EditorSnapshot {
            site: Some(ArmObj::new(FAKE_SITE_ID, "app1", api.site.clone())),
            function_info: Some(ArmObj::new(&ids.function_id, "httpping", api.function.clone())),
            host_keys: Some(api.host_keys.clone()),
            function_keys: Some(api.function_keys.clone()),
            host_status: Some(api.host_status.clone()),
            runtime_version: Some("~2".to_string()),
            host_json: Some(api.host_json.clone()),
            file_list: Some(api.files.clone()),
            insights_component: None,
            app_permission: true,
            extension_version_setting: None,
            test_data: None,
        });
        state
    }

    #[test]
    fn test_run_requires_loaded_function() {
        let state = AppState::new(ResourceIds::new(FAKE_SITE_ID, "f"));
        assert!(build_run_action(&state).is_none());
    }

    #[test]
    fn test_run_action_url_and_headers() {
        let mut state = loaded_state();
        state.test_panel.selected_key = "master - Host".to_string();
        state.test_panel.method = HttpMethod::Post;
        state.test_panel.body = "{}".to_string();

        let Some(UpdateAction::RunFunction {
            info,
            url,
            method,
            headers,
            body,
        }) = build_run_action(&state)
        else {
            panic!("expected a run action");
        };

        assert_eq!(
            url,
            "https://app1.example.net/api/httpping?code=default-secret"
        );
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(body, "{}");
        assert_eq!(
            headers.get(FUNCTIONS_KEY_HEADER).map(String::as_str),
            Some("master-secret")
        );
        assert_eq!(
            headers.get("Cache-Control").map(String::as_str),
            Some("no-cache")
        );
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        // run persists the edited payload
        let persisted = info.properties.test_data.unwrap();
        assert!(persisted.contains("\"method\":\"post\""));
    }

    #[test]
    fn test_run_substitutes_path_params() {
        let mut state = loaded_state();
        {
            let info = state.function_info.as_mut().unwrap();
            info.properties.config.bindings[0].route = Some("items/{id}".to_string());
        }
        state
            .test_panel
            .queries
            .push(NameValuePair::new("id", "5"));
        state
            .test_panel
            .queries
            .push(NameValuePair::new("verbose", "1"));

        let Some(UpdateAction::RunFunction { url, .. }) = build_run_action(&state) else {
            panic!("expected a run action");
        };

        // {id} substituted into the path, verbose appended, id not repeated
        assert_eq!(
            url,
            "https://app1.example.net/api/items/5?code=default-secret&verbose=1"
        );
    }

    #[test]
    fn test_unknown_key_label_degrades_to_empty() {
        let mut state = loaded_state();
        state.test_panel.selected_key = "ghost - Host".to_string();

        let Some(UpdateAction::RunFunction { headers, .. }) = build_run_action(&state) else {
            panic!("expected a run action");
        };
        assert_eq!(headers.get(FUNCTIONS_KEY_HEADER).map(String::as_str), Some(""));
    }

    #[test]
    fn test_selected_function_key_resolves() {
        let mut state = loaded_state();
        state.test_panel.selected_key = "default - Function".to_string();

        let Some(UpdateAction::RunFunction { headers, .. }) = build_run_action(&state) else {
            panic!("expected a run action");
        };
        assert_eq!(
            headers.get(FUNCTIONS_KEY_HEADER).map(String::as_str),
            Some("default-secret")
        );
    }

    #[test]
    fn test_user_headers_carried_through() {
        let mut state = loaded_state();
        state
            .test_panel
            .headers
            .push(NameValuePair::new("x-trace", "42"));

        let Some(UpdateAction::RunFunction { headers, .. }) = build_run_action(&state) else {
            panic!("expected a run action");
        };
        assert_eq!(headers.get("x-trace").map(String::as_str), Some("42"));
    }
}
