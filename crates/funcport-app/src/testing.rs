//! Scripted fake for the remote API traits.
//!
//! Loader and handler tests flip per-operation failure flags to exercise
//! partial-failure isolation without a network. Calls are recorded so tests
//! can assert ordering (e.g. a run persists the function before invoking).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use funcport_core::{Envelope, HostConfig, HttpMethod};
use funcport_api::models::{
    AppSettings, ArmObj, BindingDirection, BindingInfo, BindingMetadata, FunctionConfig,
    FunctionInfo, FunctionKeys, HostKeys, HostStatus, InsightsComponent, InsightsToken,
    InvocationTrace, InvocationTraceDetail, Site, VfsObject, SETTING_EXTENSION_VERSION,
    SETTING_INSIGHTS_CONNECTION_STRING,
};
use funcport_api::{HostApi, InsightsApi, ManagementApi};

pub const FAKE_SITE_ID: &str =
    "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app1";
pub const FAKE_COMPONENT_ID: &str = "/components/c1";

/// Scripted in-memory implementation of the three remote surfaces.
#[derive(Debug, Clone)]
pub struct FakeApi {
    pub site: Site,
    pub function: FunctionInfo,
    pub app_settings: AppSettings,
    pub host_keys: HostKeys,
    pub function_keys: FunctionKeys,
    pub host_status: HostStatus,
    pub host_json: HostConfig,
    pub files: Vec<VfsObject>,
    pub file_content: String,
    pub href_body: String,
    pub component: Option<ArmObj<InsightsComponent>>,
    pub token: String,
    pub traces: Vec<InvocationTrace>,
    pub details: Vec<InvocationTraceDetail>,
    pub binding_metadata: Vec<BindingMetadata>,
    pub run_status: u16,
    pub run_body: String,

    pub fail_site: bool,
    pub forbid_app_settings: bool,
    pub fail_host_keys: bool,
    pub fail_function: bool,
    pub fail_function_keys: bool,
    pub fail_host_status: bool,
    pub fail_host_json: bool,
    pub fail_files: bool,
    pub fail_file_content: bool,
    pub fail_save: bool,
    pub fail_sync: bool,
    pub fail_update: bool,
    pub fail_binding_metadata: bool,
    pub fail_token: bool,
    pub fail_traces: bool,
    pub fail_details: bool,

    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    /// A fully healthy app: every surface answers.
    pub fn healthy() -> Self {
        let function = FunctionInfo {
            name: "httpping".to_string(),
            script_href: Some("https://app1.example.net/admin/vfs/httpping/run.csx".to_string()),
            test_data_href: Some("https://app1.example.net/admin/vfs/data/httpping.dat".to_string()),
            config: FunctionConfig {
                bindings: vec![BindingInfo {
                    name: "req".to_string(),
                    binding_type: "httpTrigger".to_string(),
                    direction: Some(BindingDirection::In),
                    ..BindingInfo::default()
                }],
                disabled: None,
            },
            ..FunctionInfo::default()
        };

        let mut app_settings = AppSettings::new();
        app_settings.insert(
            SETTING_INSIGHTS_CONNECTION_STRING.to_string(),
            "InstrumentationKey=ikey-1;IngestionEndpoint=https://ingest.example.net/".to_string(),
        );
        app_settings.insert(SETTING_EXTENSION_VERSION.to_string(), "~2".to_string());

        let mut host_keys = HostKeys {
            master_key: Some("master-secret".to_string()),
            ..HostKeys::default()
        };
        host_keys
            .function_keys
            .insert("host-fn".to_string(), "host-fn-secret".to_string());

        let mut function_keys = FunctionKeys::new();
        function_keys.insert("default".to_string(), "default-secret".to_string());

        let trace: InvocationTrace = serde_json::from_str(
            r#"{"timestamp":"2020-03-01T10:00:00Z","operationId":"op-1","invocationId":"inv-1","success":true,"resultCode":"200","duration":12.5}"#,
        )
        .expect("valid trace fixture");
        let detail: InvocationTraceDetail = serde_json::from_str(
            r#"{"timestamp":"2020-03-01T10:00:00Z","message":"Executed","logLevel":"Information"}"#,
        )
        .expect("valid detail fixture");

        Self {
            site: Site {
                default_host_name: "app1.example.net".to_string(),
                state: Some("Running".to_string()),
            },
            function,
            app_settings,
            host_keys,
            function_keys,
            host_status: HostStatus {
                version: "2.0.12888.0".to_string(),
                extension_bundle: None,
            },
            host_json: HostConfig::default(),
            files: vec![
                VfsObject {
                    name: "function.json".to_string(),
                    mime: "application/json".to_string(),
                    href: "https://app1.example.net/admin/vfs/httpping/function.json".to_string(),
                    size: Some(220),
                },
                VfsObject {
                    name: "run.csx".to_string(),
                    mime: "text/plain".to_string(),
                    href: "https://app1.example.net/admin/vfs/httpping/run.csx".to_string(),
                    size: Some(512),
                },
            ],
            file_content: "// run.csx body".to_string(),
            href_body: r#"{"name":"World"}"#.to_string(),
            component: Some(ArmObj::new(
                FAKE_COMPONENT_ID,
                "c1",
                InsightsComponent {
                    app_id: Some("app-id".to_string()),
                    instrumentation_key: Some("ikey-1".to_string()),
                    connection_string: None,
                },
            )),
            token: "tok-1".to_string(),
            traces: vec![trace],
            details: vec![detail],
            binding_metadata: vec![BindingMetadata {
                binding_type: "httpTrigger".to_string(),
                display_name: Some("HTTP trigger".to_string()),
                direction: Some("trigger".to_string()),
            }],
            run_status: 200,
            run_body: "pong".to_string(),

            fail_site: false,
            forbid_app_settings: false,
            fail_host_keys: false,
            fail_function: false,
            fail_function_keys: false,
            fail_host_status: false,
            fail_host_json: false,
            fail_files: false,
            fail_file_content: false,
            fail_save: false,
            fail_sync: false,
            fail_update: false,
            fail_binding_metadata: false,
            fail_token: false,
            fail_traces: false,
            fail_details: false,

            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_function_keys(mut self) -> Self {
        self.fail_function_keys = true;
        self
    }

    pub fn failing_host_status(mut self) -> Self {
        self.fail_host_status = true;
        self
    }

    pub fn forbidden_app_settings(mut self) -> Self {
        self.forbid_app_settings = true;
        self
    }

    pub fn failing_sync_trigger(mut self) -> Self {
        self.fail_sync = true;
        self
    }

    pub fn failing_binding_metadata(mut self) -> Self {
        self.fail_binding_metadata = true;
        self
    }

    pub fn failing_invocations(mut self) -> Self {
        self.fail_traces = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_file_content(mut self) -> Self {
        self.fail_file_content = true;
        self
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, op: &str) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(op.to_string());
    }

    fn ok_or<T>(&self, fail: bool, op: &str, value: T) -> Envelope<T> {
        self.record(op);
        if fail {
            Envelope::failed(500, format!("{op} failed"))
        } else {
            Envelope::ok(200, value)
        }
    }
}

impl ManagementApi for FakeApi {
    async fn fetch_site(&self, _site_id: &str) -> Envelope<ArmObj<Site>> {
        self.ok_or(
            self.fail_site,
            "fetch_site",
            ArmObj::new(FAKE_SITE_ID, "app1", self.site.clone()),
        )
    }

    async fn fetch_function(&self, function_id: &str) -> Envelope<ArmObj<FunctionInfo>> {
        self.ok_or(
            self.fail_function,
            "fetch_function",
            ArmObj::new(function_id, self.function.name.clone(), self.function.clone()),
        )
    }

    async fn update_function(
        &self,
        function_id: &str,
        info: &ArmObj<FunctionInfo>,
    ) -> Envelope<ArmObj<FunctionInfo>> {
        self.record("update_function");
        if self.fail_update {
            Envelope::failed(500, "update_function failed")
        } else {
            Envelope::ok(
                200,
                ArmObj::new(function_id, info.name.clone(), info.properties.clone()),
            )
        }
    }

    async fn fetch_app_settings(&self, _site_id: &str) -> Envelope<AppSettings> {
        self.record("fetch_app_settings");
        if self.forbid_app_settings {
            Envelope::failed(403, "authorization failed")
        } else {
            Envelope::ok(200, self.app_settings.clone())
        }
    }

    async fn fetch_host_keys(&self, _site_id: &str) -> Envelope<HostKeys> {
        self.ok_or(self.fail_host_keys, "fetch_host_keys", self.host_keys.clone())
    }

    async fn fetch_function_keys(&self, _function_id: &str) -> Envelope<FunctionKeys> {
        self.ok_or(
            self.fail_function_keys,
            "fetch_function_keys",
            self.function_keys.clone(),
        )
    }

    async fn fetch_host_status(&self, _site_id: &str) -> Envelope<HostStatus> {
        self.ok_or(
            self.fail_host_status,
            "fetch_host_status",
            self.host_status.clone(),
        )
    }

    async fn fire_sync_trigger(&self, _site_id: &str) -> Envelope<()> {
        self.ok_or(self.fail_sync, "fire_sync_trigger", ())
    }
}

impl HostApi for FakeApi {
    async fn fetch_host_json(
        &self,
        _site_id: &str,
        _runtime_version: &str,
    ) -> Envelope<HostConfig> {
        self.ok_or(self.fail_host_json, "fetch_host_json", self.host_json.clone())
    }

    async fn list_files(
        &self,
        _site_id: &str,
        _function_name: &str,
        _runtime_version: &str,
    ) -> Envelope<Vec<VfsObject>> {
        self.ok_or(self.fail_files, "list_files", self.files.clone())
    }

    async fn fetch_file(
        &self,
        _site_id: &str,
        _function_name: &str,
        _runtime_version: &str,
        _file_name: &str,
    ) -> Envelope<String> {
        self.ok_or(
            self.fail_file_content,
            "fetch_file",
            self.file_content.clone(),
        )
    }

    async fn save_file(
        &self,
        _site_id: &str,
        _function_name: &str,
        _runtime_version: &str,
        _file_name: &str,
        _content: &str,
        _mime: &str,
    ) -> Envelope<()> {
        self.ok_or(self.fail_save, "save_file", ())
    }

    async fn fetch_binding_metadata(&self, _site_id: &str) -> Envelope<Vec<BindingMetadata>> {
        self.ok_or(
            self.fail_binding_metadata,
            "fetch_binding_metadata",
            self.binding_metadata.clone(),
        )
    }

    async fn fetch_href(
        &self,
        _href: &str,
        _headers: &BTreeMap<String, String>,
    ) -> Envelope<String> {
        self.record("fetch_href");
        Envelope::ok(200, self.href_body.clone())
    }

    async fn run_function(
        &self,
        _url: &str,
        _method: HttpMethod,
        _headers: &BTreeMap<String, String>,
        _body: &str,
    ) -> Envelope<String> {
        self.record("run_function");
        if self.run_status >= 400 {
            Envelope::failed(self.run_status, self.run_body.clone())
        } else {
            Envelope::ok(self.run_status, self.run_body.clone())
        }
    }
}

impl InsightsApi for FakeApi {
    async fn find_component_by_connection_string(
        &self,
        _connection_string: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>> {
        self.record("find_component_by_connection_string");
        Envelope::ok(200, self.component.clone())
    }

    async fn find_component_by_instrumentation_key(
        &self,
        _instrumentation_key: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>> {
        self.record("find_component_by_instrumentation_key");
        Envelope::ok(200, self.component.clone())
    }

    async fn fetch_component_token(&self, _component_id: &str) -> Envelope<InsightsToken> {
        self.ok_or(
            self.fail_token,
            "fetch_component_token",
            InsightsToken {
                token: self.token.clone(),
            },
        )
    }

    async fn list_invocation_traces(
        &self,
        _app_id: &str,
        _token: &str,
        _function_name: &str,
    ) -> Envelope<Vec<InvocationTrace>> {
        self.ok_or(self.fail_traces, "list_invocation_traces", self.traces.clone())
    }

    async fn fetch_invocation_details(
        &self,
        _app_id: &str,
        _token: &str,
        _operation_id: &str,
        _invocation_id: &str,
    ) -> Envelope<Vec<InvocationTraceDetail>> {
        self.ok_or(
            self.fail_details,
            "fetch_invocation_details",
            self.details.clone(),
        )
    }
}
