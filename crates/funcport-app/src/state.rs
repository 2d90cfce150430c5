//! Application state (Model in TEA pattern)

use funcport_core::prelude::*;
use funcport_core::{HostConfig, RuntimeMajorVersion};
use funcport_api::models::{
    ArmObj, BindingMetadata, FunctionInfo, FunctionKeys, HostKeys, HostStatus,
    InsightsComponent, InvocationTrace, InvocationTraceDetail, Site, VfsObject,
};
use funcport_api::ResourceIds;

use crate::editor::EditorState;
use crate::loader::EditorSnapshot;
use crate::test_panel::{ResponseContent, TestPanelState};
use crate::urls::{
    build_url_objs, default_key_label, function_invoke_path, host_key_lookup, UrlObj, UrlType,
};

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Editor,
    Integrate,
    Invocations,
}

/// State for the bindings/integrate screen.
#[derive(Debug, Clone, Default)]
pub struct IntegrateState {
    pub binding_metadata: Option<Vec<BindingMetadata>>,
    /// Metadata fetch failed; rendered as a non-fatal banner
    pub bindings_error: bool,
    pub loading: bool,
    /// Highlighted row among the function's bindings
    pub selected: usize,
    /// A wholesale write-back is in flight
    pub updating: bool,
}

/// State for the invocation telemetry screen.
#[derive(Debug, Clone, Default)]
pub struct InvocationsState {
    pub traces: Option<Vec<InvocationTrace>>,
    pub selected: usize,
    pub details: Option<Vec<InvocationTraceDetail>>,
    pub loading: bool,
    pub details_loading: bool,
}

/// The application model: resolved loader state plus per-view sub-states.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ids: ResourceIds,
    pub view: View,

    // Resolved remote state (None = not loaded / last fetch failed)
    pub site: Option<ArmObj<Site>>,
    pub function_info: Option<ArmObj<FunctionInfo>>,
    pub host_keys: Option<HostKeys>,
    pub function_keys: FunctionKeys,
    pub host_status: Option<HostStatus>,
    pub runtime_version: Option<String>,
    pub host_json: Option<HostConfig>,
    pub file_list: Option<Vec<VfsObject>>,
    pub insights_component: Option<ArmObj<InsightsComponent>>,
    pub insights_token: Option<String>,
    /// Cleared by a 403 on app settings; never reset
    pub app_permission: bool,
    /// The app's pinned runtime setting (`~N` or a custom value)
    pub extension_version_setting: Option<String>,
    pub test_data: Option<String>,

    // Derived URL lists, regenerated when keys or host metadata change
    pub host_urls: Vec<UrlObj>,
    pub function_urls: Vec<UrlObj>,

    pub initial_loading: bool,
    pub is_refreshing: bool,
    pub function_running: bool,
    pub response_content: Option<ResponseContent>,

    pub editor: EditorState,
    pub test_panel: TestPanelState,
    pub integrate: IntegrateState,
    pub invocations: InvocationsState,

    should_quit: bool,
}

impl AppState {
    pub fn new(ids: ResourceIds) -> Self {
        Self {
            ids,
            view: View::default(),
            site: None,
            function_info: None,
            host_keys: None,
            function_keys: FunctionKeys::new(),
            host_status: None,
            runtime_version: None,
            host_json: None,
            file_list: None,
            insights_component: None,
            insights_token: None,
            app_permission: true,
            extension_version_setting: None,
            test_data: None,
            host_urls: Vec::new(),
            function_urls: Vec::new(),
            initial_loading: true,
            is_refreshing: false,
            function_running: false,
            response_content: None,
            editor: EditorState::default(),
            test_panel: TestPanelState::default(),
            integrate: IntegrateState::default(),
            invocations: InvocationsState::default(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Snapshot application
    // ─────────────────────────────────────────────────────────────────────

    /// Fold a resolved loader snapshot into the model. Absent snapshot
    /// fields leave the previous value in place (a failed refetch does not
    /// blank a previously rendered resource).
    pub fn apply_snapshot(&mut self, snapshot: EditorSnapshot) {
        if snapshot.site.is_some() {
            self.site = snapshot.site;
        }
        if snapshot.function_info.is_some() {
            self.function_info = snapshot.function_info;
        }
        if snapshot.host_keys.is_some() {
            self.host_keys = snapshot.host_keys;
        }
        if let Some(keys) = snapshot.function_keys {
            self.function_keys = keys;
        }
        if snapshot.host_status.is_some() {
            self.host_status = snapshot.host_status;
        }
        if snapshot.runtime_version.is_some() {
            self.runtime_version = snapshot.runtime_version;
        }
        if snapshot.host_json.is_some() {
            self.host_json = snapshot.host_json;
        }
        if snapshot.file_list.is_some() {
            self.file_list = snapshot.file_list;
        }
        if snapshot.insights_component.is_some() {
            self.insights_component = snapshot.insights_component;
        }
        if snapshot.extension_version_setting.is_some() {
            self.extension_version_setting = snapshot.extension_version_setting;
        }
        if snapshot.test_data.is_some() {
            self.test_data = snapshot.test_data;
        }
        if !snapshot.app_permission {
            self.app_permission = false;
        }

        self.initial_loading = false;
        self.is_refreshing = false;
        self.rebuild_url_objs();
    }

    /// Regenerate the host/function URL lists from the current keys.
    pub fn rebuild_url_objs(&mut self) {
        if self.site.is_none() || self.function_info.is_none() {
            return;
        }
        if let Some(host_keys) = self.host_keys.clone() {
            let lookup = host_key_lookup(&host_keys);
            let urls = build_url_objs(&lookup, UrlType::Host, |key| self.function_url(Some(key)));
            self.host_urls = urls;
        }
        let function_keys = self.function_keys.clone();
        let urls = build_url_objs(&function_keys, UrlType::Function, |key| {
            self.function_url(Some(key))
        });
        self.function_urls = urls;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derivations
    // ─────────────────────────────────────────────────────────────────────

    /// Invocation path for the function, empty when prerequisites are
    /// missing.
    pub fn invoke_path(&self, key: Option<&str>) -> String {
        match &self.function_info {
            Some(info) => function_invoke_path(
                &info.properties,
                &self.function_keys,
                self.host_keys.as_ref(),
                self.host_json.as_ref(),
                self.runtime_version.as_deref().unwrap_or(""),
                key,
            ),
            None => {
                error!(
                    category = LogCategory::InvokeUrl.as_str(),
                    "no function info loaded for {}", self.ids.function_id
                );
                String::new()
            }
        }
    }

    /// Full invocation URL (site base + path); empty without a site.
    pub fn function_url(&self, key: Option<&str>) -> String {
        match &self.site {
            Some(site) => format!("{}{}", site.properties.main_url(), self.invoke_path(key)),
            None => String::new(),
        }
    }

    /// Key labels offered by the test panel, function keys first.
    pub fn key_labels(&self) -> Vec<String> {
        self.function_urls
            .iter()
            .chain(self.host_urls.iter())
            .map(|obj| obj.key.clone())
            .collect()
    }

    /// Default `x-functions-key` label.
    pub fn default_key_label(&self) -> String {
        default_key_label(self.host_keys.as_ref())
    }

    /// The runtime answered the file listing at least once this load.
    pub fn is_runtime_reachable(&self) -> bool {
        self.file_list.is_some()
    }

    /// The app pins a major runtime version that disagrees with what the
    /// host actually reports. Custom pins (`beta`, exact versions) never
    /// count as a mismatch.
    pub fn runtime_version_mismatch(&self) -> bool {
        let pinned = RuntimeMajorVersion::from_setting(self.extension_version_setting.as_deref());
        if pinned == RuntimeMajorVersion::Custom {
            return false;
        }
        match &self.host_status {
            Some(status) => pinned != RuntimeMajorVersion::from_exact(&status.version),
            None => false,
        }
    }

    /// Testing requires an HTTP trigger or webhook plus a reachable runtime.
    pub fn is_test_disabled(&self) -> bool {
        let has_trigger = self
            .function_info
            .as_ref()
            .map(|info| {
                info.properties.config.http_trigger().is_some()
                    || info.properties.config.webhook_info().is_some()
            })
            .unwrap_or(false);
        !has_trigger || !self.is_runtime_reachable()
    }

    /// Anything in flight that should grey out the editor chrome.
    pub fn is_busy(&self) -> bool {
        self.initial_loading
            || self.is_refreshing
            || self.function_running
            || self.editor.is_loading()
    }

    /// File options for the selector pane.
    pub fn file_options(&self) -> Vec<VfsObject> {
        self.file_list
            .as_deref()
            .map(EditorState::file_options)
            .unwrap_or_default()
    }
}
