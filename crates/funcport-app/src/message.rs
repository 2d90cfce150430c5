//! Message types for the application (TEA pattern)

use std::collections::BTreeMap;

use funcport_core::HttpMethod;
use funcport_api::models::{
    ArmObj, BindingMetadata, FunctionInfo, InvocationTrace, InvocationTraceDetail, VfsObject,
};

use crate::input_key::InputKey;
use crate::loader::EditorSnapshot;
use crate::test_panel::ResponseContent;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────
    // Loader Completions
    // ─────────────────────────────────────────────────────────
    /// Full editor load (or refresh) resolved
    EditorLoaded(Box<EditorSnapshot>),

    /// Follow-up check for the telemetry token chain
    CheckInsightsToken,

    /// Telemetry token fetch resolved (None = failed, logged)
    InsightsTokenLoaded { token: Option<String> },

    /// File content fetch resolved (None = failed, logged)
    FileContentLoaded {
        file: VfsObject,
        content: Option<String>,
    },

    /// File save completed
    FileSaved { file_name: String, success: bool },

    /// Test invocation completed; `function_info` carries the persisted
    /// update when it succeeded, `response` the captured output
    RunCompleted {
        function_info: Option<Box<ArmObj<FunctionInfo>>>,
        response: Option<ResponseContent>,
    },

    /// Binding-type catalog load resolved (None = failed, logged)
    BindingMetadataLoaded {
        metadata: Option<Vec<BindingMetadata>>,
    },

    /// Wholesale function write-back resolved (binding edits); `None` means
    /// the update was rejected and the local copy stands
    FunctionUpdated {
        function_info: Option<Box<ArmObj<FunctionInfo>>>,
    },

    /// Invocation trace list resolved (None = failed, logged)
    InvocationsLoaded {
        traces: Option<Vec<InvocationTrace>>,
    },

    /// Invocation detail rows resolved (None = failed, logged)
    InvocationDetailsLoaded {
        details: Option<Vec<InvocationTraceDetail>>,
    },
}

/// Actions the event loop performs after an update.
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Kick off the full editor load
    LoadEditor,

    /// Fire the sync trigger, then reload
    Refresh,

    /// Issue a telemetry token for the resolved component
    FetchInsightsToken { component_id: String },

    /// Fetch one file's content from the VFS
    FetchFileContent {
        file: VfsObject,
        runtime_version: String,
    },

    /// Persist the edit buffer to the VFS
    SaveFile {
        file: VfsObject,
        content: String,
        runtime_version: String,
    },

    /// Persist updated test data, then invoke the function
    RunFunction {
        info: Box<ArmObj<FunctionInfo>>,
        url: String,
        method: HttpMethod,
        headers: BTreeMap<String, String>,
        body: String,
    },

    /// Load the binding-type catalog for the integrate view
    LoadBindingMetadata,

    /// Write the function resource back wholesale (binding edits)
    UpdateFunction { info: Box<ArmObj<FunctionInfo>> },

    /// Load recent invocation traces
    LoadInvocations { app_id: String, token: String },

    /// Load detail rows for one invocation
    LoadInvocationDetails {
        app_id: String,
        token: String,
        operation_id: String,
        invocation_id: String,
    },
}
