//! Function editor data loader.
//!
//! Six independent primary fetches fan out concurrently; a successful host
//! status gates the secondary host.json/file-list pair; app settings feed
//! the telemetry component lookup; the function's test-data href is followed
//! once the master key is known. Every failure is logged and isolated.

use std::collections::BTreeMap;

use funcport_core::prelude::*;
use funcport_core::{tilde_version, HostConfig, FUNCTIONS_KEY_HEADER};
use funcport_api::models::{
    AppSettings, ArmObj, FunctionInfo, FunctionKeys, HostKeys, HostStatus, InsightsComponent,
    Site, VfsObject, SETTING_EXTENSION_VERSION, SETTING_INSIGHTS_CONNECTION_STRING,
    SETTING_INSIGHTS_INSTRUMENTATION_KEY,
};
use funcport_api::{HostApi, InsightsApi, ManagementApi, ResourceIds};

/// Everything one editor load resolves. Absent fields mean that resource's
/// fetch failed (or was never reachable) this round.
#[derive(Debug, Clone, Default)]
pub struct EditorSnapshot {
    pub site: Option<ArmObj<Site>>,
    pub function_info: Option<ArmObj<FunctionInfo>>,
    pub host_keys: Option<HostKeys>,
    pub function_keys: Option<FunctionKeys>,
    pub host_status: Option<HostStatus>,
    /// `~N` form inferred from the host status version
    pub runtime_version: Option<String>,
    pub host_json: Option<HostConfig>,
    pub file_list: Option<Vec<VfsObject>>,
    pub insights_component: Option<ArmObj<InsightsComponent>>,
    /// False when the app-settings fetch came back 403
    pub app_permission: bool,
    /// The app's pinned runtime setting (`~N` or a custom value)
    pub extension_version_setting: Option<String>,
    /// Test data fetched through the function's href
    pub test_data: Option<String>,
}

/// Run the full editor load against the remote surfaces.
pub async fn load_editor<C>(client: &C, ids: &ResourceIds) -> EditorSnapshot
where
    C: ManagementApi + HostApi + InsightsApi + Sync,
{
    let (site, function_info, app_settings, host_keys, function_keys, host_status) = tokio::join!(
        client.fetch_site(&ids.site_id),
        client.fetch_function(&ids.function_id),
        client.fetch_app_settings(&ids.site_id),
        client.fetch_host_keys(&ids.site_id),
        client.fetch_function_keys(&ids.function_id),
        client.fetch_host_status(&ids.site_id),
    );

    let mut snapshot = EditorSnapshot {
        app_permission: !app_settings.is_forbidden(),
        ..EditorSnapshot::default()
    };

    snapshot.site = site.into_logged(LogCategory::FunctionEdit, "fetch_site");
    snapshot.function_info =
        function_info.into_logged(LogCategory::FunctionEdit, "fetch_function");
    snapshot.host_keys = host_keys.into_logged(LogCategory::FunctionEdit, "fetch_host_keys");
    snapshot.function_keys =
        function_keys.into_logged(LogCategory::FunctionEdit, "fetch_function_keys");

    let settings = app_settings.into_logged(LogCategory::FunctionEdit, "fetch_app_settings");
    if let Some(settings) = &settings {
        snapshot.extension_version_setting = settings.get(SETTING_EXTENSION_VERSION).cloned();
        snapshot.insights_component = resolve_insights_component(client, settings).await;
    }

    if let Some(status) = host_status.into_logged(LogCategory::FunctionEdit, "fetch_host_status")
    {
        let runtime_version = tilde_version(&status.version);
        let (host_json, file_list) = tokio::join!(
            client.fetch_host_json(&ids.site_id, &runtime_version),
            client.list_files(&ids.site_id, &ids.function_name, &runtime_version),
        );
        snapshot.host_json = host_json.into_logged(LogCategory::FunctionEdit, "fetch_host_json");
        snapshot.file_list = file_list.into_logged(LogCategory::FunctionEdit, "list_files");
        snapshot.runtime_version = Some(runtime_version);
        snapshot.host_status = Some(status);
    }

    snapshot.test_data = fetch_test_data(client, &snapshot).await;

    snapshot
}

/// Refresh: ask the platform to re-sync triggers, then reload. A failed sync
/// is logged and the reload proceeds anyway.
pub async fn refresh_editor<C>(client: &C, ids: &ResourceIds) -> EditorSnapshot
where
    C: ManagementApi + HostApi + InsightsApi + Sync,
{
    let sync = client.fire_sync_trigger(&ids.site_id).await;
    if !sync.is_success() {
        error!(
            category = LogCategory::FunctionEdit.as_str(),
            "fire_sync_trigger failed (status {}): {}",
            sync.status,
            sync.error().unwrap_or_default()
        );
    }
    load_editor(client, ids).await
}

/// Look up the telemetry component wired to the app, preferring the full
/// connection string over a bare instrumentation key.
async fn resolve_insights_component<C: InsightsApi + Sync>(
    client: &C,
    settings: &AppSettings,
) -> Option<ArmObj<InsightsComponent>> {
    let envelope = if let Some(cs) = settings.get(SETTING_INSIGHTS_CONNECTION_STRING) {
        client.find_component_by_connection_string(cs).await
    } else if let Some(key) = settings.get(SETTING_INSIGHTS_INSTRUMENTATION_KEY) {
        client.find_component_by_instrumentation_key(key).await
    } else {
        return None;
    };
    envelope
        .into_logged(LogCategory::FunctionMonitor, "find_insights_component")
        .flatten()
}

/// Follow the function's test-data href with the master-key header. JSON
/// bodies are re-serialized compactly; anything else passes through.
async fn fetch_test_data<C: HostApi + Sync>(
    client: &C,
    snapshot: &EditorSnapshot,
) -> Option<String> {
    let info = snapshot.function_info.as_ref()?;
    let keys = snapshot.host_keys.as_ref()?;
    let href = info.properties.test_data_href.as_deref()?;

    let envelope = client.fetch_href(href, &key_headers(keys)).await;
    envelope
        .into_logged(LogCategory::FunctionEdit, "fetch_test_data")
        .map(normalize_test_data)
}

/// Master-key headers for host href follow-ups. Empty when no master key is
/// available.
pub fn key_headers(host_keys: &HostKeys) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if let Some(master) = &host_keys.master_key {
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        headers.insert(FUNCTIONS_KEY_HEADER.to_string(), master.clone());
    }
    headers
}

fn normalize_test_data(text: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => serde_json::to_string(&value).unwrap_or(text),
        Err(_) => text,
    }
}
