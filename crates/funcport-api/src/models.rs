//! Wire models for the management, host, and telemetry surfaces.
//!
//! Resources arrive wrapped in an ARM-style envelope (`id`/`name`/
//! `properties`); everything here is a transient view-model record, never
//! persisted locally. Unknown fields are ignored on the way in and optional
//! fields are skipped on the way out so wholesale write-backs stay faithful.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use funcport_core::invoke_url::HostConfig;

/// Mime type the VFS uses for directory entries.
pub const DIRECTORY_MIME: &str = "inode/directory";

// App setting names the loaders inspect.
pub const SETTING_INSIGHTS_INSTRUMENTATION_KEY: &str = "APPINSIGHTS_INSTRUMENTATIONKEY";
pub const SETTING_INSIGHTS_CONNECTION_STRING: &str = "APPLICATIONINSIGHTS_CONNECTION_STRING";
pub const SETTING_EXTENSION_VERSION: &str = "FUNCTIONS_EXTENSION_VERSION";

// ─────────────────────────────────────────────────────────────────────────────
// Resource envelope
// ─────────────────────────────────────────────────────────────────────────────

/// ARM-style resource wrapper: identity plus typed `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmObj<T> {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub properties: T,
}

impl<T> ArmObj<T> {
    pub fn new(id: impl Into<String>, name: impl Into<String>, properties: T) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: None,
            properties,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sites
// ─────────────────────────────────────────────────────────────────────────────

/// Function app site resource (reduced to what the front-end reads).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "defaultHostName", default)]
    pub default_host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Site {
    /// Public base URL of the app's runtime host.
    pub fn main_url(&self) -> String {
        format!("https://{}", self.default_host_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────────────

/// A single function resource within a Functions app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_href: Option<String>,
    #[serde(default)]
    pub config: FunctionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data_href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke_url_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "isDisabled", default)]
    pub is_disabled: bool,
}

impl FunctionInfo {
    /// File name referenced by `script_href`, lowercased for matching
    /// against the VFS listing.
    pub fn script_file_name(&self) -> Option<String> {
        self.script_href
            .as_deref()
            .and_then(|href| href.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_lowercase())
    }
}

/// The function.json content attached to a function resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionConfig {
    #[serde(default)]
    pub bindings: Vec<BindingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl FunctionConfig {
    /// The HTTP trigger binding, when the function has one.
    pub fn http_trigger(&self) -> Option<&BindingInfo> {
        self.bindings
            .iter()
            .find(|b| b.binding_type.eq_ignore_ascii_case("httpTrigger"))
    }

    /// The binding carrying a webhook type, when present.
    pub fn webhook_info(&self) -> Option<&BindingInfo> {
        self.bindings.iter().find(|b| b.web_hook_type.is_some())
    }

    /// The binding carrying an auth level, when present.
    pub fn auth_level(&self) -> Option<&str> {
        self.bindings
            .iter()
            .find_map(|b| b.auth_level.as_deref())
    }

    pub fn trigger_bindings(&self) -> Vec<&BindingInfo> {
        self.bindings.iter().filter(|b| b.is_trigger()).collect()
    }

    pub fn input_bindings(&self) -> Vec<&BindingInfo> {
        self.bindings
            .iter()
            .filter(|b| !b.is_trigger() && b.direction == Some(BindingDirection::In))
            .collect()
    }

    pub fn output_bindings(&self) -> Vec<&BindingInfo> {
        self.bindings
            .iter()
            .filter(|b| !b.is_trigger() && b.direction == Some(BindingDirection::Out))
            .collect()
    }

    /// Bindings missing a direction, surfaced in a warning banner.
    pub fn bindings_missing_direction(&self) -> Vec<&BindingInfo> {
        self.bindings
            .iter()
            .filter(|b| b.direction.is_none())
            .collect()
    }
}

/// Input/output/trigger wiring attached to a function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub binding_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<BindingDirection>,
    #[serde(rename = "authLevel", default, skip_serializing_if = "Option::is_none")]
    pub auth_level: Option<String>,
    #[serde(rename = "webHookType", default, skip_serializing_if = "Option::is_none")]
    pub web_hook_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Binding-specific settings preserved verbatim for wholesale write-back
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl BindingInfo {
    pub fn is_trigger(&self) -> bool {
        self.binding_type.to_lowercase().ends_with("trigger")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingDirection {
    In,
    Out,
}

/// Available binding type descriptor from the runtime's bindings catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingMetadata {
    #[serde(rename = "type", default)]
    pub binding_type: String,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Host status and keys
// ─────────────────────────────────────────────────────────────────────────────

/// Host runtime status (reduced to the fields the loaders read).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostStatus {
    #[serde(default)]
    pub version: String,
    #[serde(rename = "extensionBundle", default, skip_serializing_if = "Option::is_none")]
    pub extension_bundle: Option<ExtensionBundle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionBundle {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Host-level keys: the master key plus named host function/system keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostKeys {
    #[serde(rename = "masterKey", default, skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
    #[serde(rename = "functionKeys", default)]
    pub function_keys: BTreeMap<String, String>,
    #[serde(rename = "systemKeys", default)]
    pub system_keys: BTreeMap<String, String>,
}

impl HostKeys {
    /// Host function keys and system keys merged into one lookup.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.function_keys.clone();
        merged.extend(
            self.system_keys
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    /// Name of the key holding `value`, searching the merged lookup.
    pub fn name_of(&self, value: &str) -> Option<String> {
        self.merged()
            .into_iter()
            .find(|(_, v)| v == value)
            .map(|(k, _)| k)
    }
}

/// Per-function keys keyed by name.
pub type FunctionKeys = BTreeMap<String, String>;

/// App settings properties: a flat name/value map.
pub type AppSettings = BTreeMap<String, String>;

// ─────────────────────────────────────────────────────────────────────────────
// VFS
// ─────────────────────────────────────────────────────────────────────────────

/// A file entry from the host's virtual file system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VfsObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl VfsObject {
    pub fn is_directory(&self) -> bool {
        self.mime == DIRECTORY_MIME
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Telemetry
// ─────────────────────────────────────────────────────────────────────────────

/// Telemetry component resource wired to the function app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsComponent {
    #[serde(rename = "AppId", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(
        rename = "InstrumentationKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instrumentation_key: Option<String>,
    #[serde(
        rename = "ConnectionString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub connection_string: Option<String>,
}

/// Short-lived token for querying the telemetry API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsToken {
    #[serde(default)]
    pub token: String,
}

/// One row in the recent-invocations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationTrace {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub operation_id: String,
    #[serde(default)]
    pub invocation_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result_code: String,
    /// Wall-clock duration in milliseconds
    #[serde(default)]
    pub duration: f64,
}

/// One log row within a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationTraceDetail {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub log_level: String,
}
