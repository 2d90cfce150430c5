//! Derived invocation URLs and key selection.
//!
//! Every authorizing key (master, host function/system, per-function) maps
//! to a [`UrlObj`]: the full invocation URL it unlocks plus a display label.
//! The lists are regenerated whenever keys or host metadata change.

use std::collections::BTreeMap;

use funcport_core::invoke_url::{invoke_url_path, route_prefix};
use funcport_core::HostConfig;
use funcport_api::models::{FunctionInfo, FunctionKeys, HostKeys};

/// Which key store a [`UrlObj`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlType {
    Host,
    Function,
}

impl UrlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlType::Host => "Host",
            UrlType::Function => "Function",
        }
    }
}

/// A derived invocation URL plus the key that authorizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlObj {
    /// Unique display label: `"{name} - {type}"`
    pub key: String,
    /// Bare key name
    pub text: String,
    pub url_type: UrlType,
    /// Full invocation URL for this key
    pub url: String,
    /// The key value itself
    pub data: String,
}

/// Label used when no explicit key is selected.
pub fn default_key_label(host_keys: Option<&HostKeys>) -> String {
    match host_keys {
        Some(keys) if keys.master_key.is_some() => format!("master - {}", UrlType::Host.as_str()),
        _ => String::new(),
    }
}

/// Host-side key lookup: the master key under `master` plus the merged host
/// function/system keys.
pub fn host_key_lookup(host_keys: &HostKeys) -> BTreeMap<String, String> {
    let mut lookup = host_keys.merged();
    if let Some(master) = &host_keys.master_key {
        lookup.insert("master".to_string(), master.clone());
    }
    lookup
}

/// Build one [`UrlObj`] per key; `make_url` turns a key value into the full
/// invocation URL.
pub fn build_url_objs(
    keys: &BTreeMap<String, String>,
    url_type: UrlType,
    make_url: impl Fn(&str) -> String,
) -> Vec<UrlObj> {
    keys.iter()
        .map(|(name, value)| UrlObj {
            key: format!("{name} - {}", url_type.as_str()),
            text: name.clone(),
            url_type,
            url: make_url(value),
            data: value.clone(),
        })
        .collect()
}

/// Resolve a key label back to its key value through the URL lists,
/// function keys first.
pub fn resolve_key_value<'a>(
    label: &str,
    function_urls: &'a [UrlObj],
    host_urls: &'a [UrlObj],
) -> Option<&'a str> {
    function_urls
        .iter()
        .chain(host_urls.iter())
        .find(|obj| obj.key == label)
        .map(|obj| obj.data.as_str())
}

/// Build the invocation path for a function: trigger route + auth query
/// parameters. Returns an empty string for functions without an HTTP trigger.
///
/// `key_override` replaces the default function key as the `code` value;
/// webhook triggers swap the code for a `clientId` naming the matching host
/// key (keeping the code only for generic-JSON hooks), and an anonymous auth
/// level drops the code entirely.
pub fn function_invoke_path(
    info: &FunctionInfo,
    function_keys: &FunctionKeys,
    host_keys: Option<&HostKeys>,
    host_json: Option<&HostConfig>,
    runtime_version: &str,
    key_override: Option<&str>,
) -> String {
    let Some(trigger) = info.config.http_trigger() else {
        return String::new();
    };

    let prefix = route_prefix(host_json, runtime_version);
    let function_key = key_override
        .or_else(|| function_keys.get("default").map(String::as_str))
        .unwrap_or("");

    let mut code = function_key.to_string();
    let mut client_id = String::new();

    if let Some(webhook) = info.config.webhook_info() {
        if !function_key.is_empty() {
            if let Some(keys) = host_keys {
                client_id = keys.name_of(function_key).unwrap_or_default();
            }
            let generic_json = webhook
                .web_hook_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("genericjson"));
            if !generic_json {
                code.clear();
            }
        }
    }

    if info
        .config
        .auth_level()
        .is_some_and(|level| level.eq_ignore_ascii_case("anonymous"))
    {
        code.clear();
    }

    let mut query_params = Vec::new();
    if !code.is_empty() {
        query_params.push(format!("code={code}"));
    }
    if !client_id.is_empty() {
        query_params.push(format!("clientId={client_id}"));
    }

    invoke_url_path(&prefix, &info.name, trigger.route.as_deref(), &query_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use funcport_api::models::{BindingDirection, BindingInfo, FunctionConfig};

    fn http_function(route: Option<&str>, auth_level: Option<&str>) -> FunctionInfo {
        FunctionInfo {
            name: "foo".to_string(),
            config: FunctionConfig {
                bindings: vec![BindingInfo {
                    name: "req".to_string(),
                    binding_type: "httpTrigger".to_string(),
                    direction: Some(BindingDirection::In),
                    auth_level: auth_level.map(str::to_string),
                    route: route.map(str::to_string),
                    ..BindingInfo::default()
                }],
                disabled: None,
            },
            ..FunctionInfo::default()
        }
    }

    fn default_keys(value: &str) -> FunctionKeys {
        let mut keys = FunctionKeys::new();
        keys.insert("default".to_string(), value.to_string());
        keys
    }

    #[test]
    fn test_invoke_path_without_trigger_is_empty() {
        let info = FunctionInfo {
            name: "foo".to_string(),
            ..FunctionInfo::default()
        };
        let path = function_invoke_path(&info, &FunctionKeys::new(), None, None, "~2", None);
        assert_eq!(path, "");
    }

    #[test]
    fn test_invoke_path_default_key() {
        let info = http_function(None, None);
        let path =
            function_invoke_path(&info, &default_keys("abc"), None, None, "~2", None);
        assert_eq!(path, "/api/foo?code=abc");
    }

    #[test]
    fn test_invoke_path_without_any_key() {
        let info = http_function(None, None);
        let path =
            function_invoke_path(&info, &FunctionKeys::new(), None, None, "~2", None);
        assert_eq!(path, "/api/foo");
    }

    #[test]
    fn test_invoke_path_anonymous_drops_code() {
        let info = http_function(None, Some("anonymous"));
        let path =
            function_invoke_path(&info, &default_keys("abc"), None, None, "~2", None);
        assert_eq!(path, "/api/foo");
    }

    #[test]
    fn test_invoke_path_custom_route() {
        let info = http_function(Some("items/{id}"), None);
        let path =
            function_invoke_path(&info, &default_keys("abc"), None, None, "~2", None);
        assert_eq!(path, "/api/items/{id}?code=abc");
    }

    #[test]
    fn test_invoke_path_key_override() {
        let info = http_function(None, None);
        let path = function_invoke_path(
            &info,
            &default_keys("abc"),
            None,
            None,
            "~2",
            Some("override"),
        );
        assert_eq!(path, "/api/foo?code=override");
    }

    #[test]
    fn test_webhook_swaps_code_for_client_id() {
        let mut info = http_function(None, None);
        info.config.bindings.push(BindingInfo {
            name: "hook".to_string(),
            binding_type: "webHook".to_string(),
            web_hook_type: Some("github".to_string()),
            ..BindingInfo::default()
        });
        let mut host_keys = HostKeys::default();
        host_keys
            .system_keys
            .insert("github_key".to_string(), "abc".to_string());

        let path = function_invoke_path(
            &info,
            &default_keys("abc"),
            Some(&host_keys),
            None,
            "~2",
            None,
        );
        assert_eq!(path, "/api/foo?clientId=github_key");
    }

    #[test]
    fn test_generic_json_webhook_keeps_code() {
        let mut info = http_function(None, None);
        info.config.bindings.push(BindingInfo {
            name: "hook".to_string(),
            binding_type: "webHook".to_string(),
            web_hook_type: Some("genericJson".to_string()),
            ..BindingInfo::default()
        });
        let mut host_keys = HostKeys::default();
        host_keys
            .function_keys
            .insert("hookkey".to_string(), "abc".to_string());

        let path = function_invoke_path(
            &info,
            &default_keys("abc"),
            Some(&host_keys),
            None,
            "~2",
            None,
        );
        assert_eq!(path, "/api/foo?code=abc&clientId=hookkey");
    }

    #[test]
    fn test_url_obj_labels() {
        let mut keys = BTreeMap::new();
        keys.insert("master".to_string(), "m1".to_string());
        let objs = build_url_objs(&keys, UrlType::Host, |key| format!("https://x/api/foo?code={key}"));
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0].key, "master - Host");
        assert_eq!(objs[0].data, "m1");
        assert_eq!(objs[0].url, "https://x/api/foo?code=m1");
    }

    #[test]
    fn test_default_key_label() {
        let keys = HostKeys {
            master_key: Some("m".to_string()),
            ..HostKeys::default()
        };
        assert_eq!(default_key_label(Some(&keys)), "master - Host");
        assert_eq!(default_key_label(None), "");
        assert_eq!(default_key_label(Some(&HostKeys::default())), "");
    }

    #[test]
    fn test_resolve_key_value_prefers_function_urls() {
        let function_urls = vec![UrlObj {
            key: "default - Function".to_string(),
            text: "default".to_string(),
            url_type: UrlType::Function,
            url: String::new(),
            data: "fval".to_string(),
        }];
        let host_urls = vec![UrlObj {
            key: "master - Host".to_string(),
            text: "master".to_string(),
            url_type: UrlType::Host,
            url: String::new(),
            data: "hval".to_string(),
        }];

        assert_eq!(
            resolve_key_value("default - Function", &function_urls, &host_urls),
            Some("fval")
        );
        assert_eq!(
            resolve_key_value("master - Host", &function_urls, &host_urls),
            Some("hval")
        );
        assert_eq!(resolve_key_value("nope", &function_urls, &host_urls), None);
    }

    #[test]
    fn test_host_key_lookup_includes_master() {
        let mut keys = HostKeys {
            master_key: Some("m".to_string()),
            ..HostKeys::default()
        };
        keys.function_keys.insert("k1".to_string(), "v1".to_string());
        let lookup = host_key_lookup(&keys);
        assert_eq!(lookup.get("master").map(String::as_str), Some("m"));
        assert_eq!(lookup.get("k1").map(String::as_str), Some("v1"));
    }
}
