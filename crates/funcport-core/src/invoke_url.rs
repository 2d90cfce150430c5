//! Invocation URL construction.
//!
//! An HTTP-triggered function is reachable at
//! `/{route-prefix}/{route-or-name}?code=...&clientId=...`. The route prefix
//! comes out of host.json (location depends on the runtime generation), the
//! route template may carry `{param}` placeholders substituted from test
//! data, and sloppy concatenation artifacts (`//`, trailing `?`) are cleaned
//! up at the end.

use std::sync::OnceLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::runtime::{RuntimeMajorVersion, BETA_VERSION};
use crate::test_data::NameValuePair;

/// Route prefix used when host.json does not specify one.
pub const DEFAULT_ROUTE_PREFIX: &str = "api";

// Matches encodeURIComponent: everything but ASCII alphanumerics and -_.~
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ─────────────────────────────────────────────────────────────────────────────
// host.json
// ─────────────────────────────────────────────────────────────────────────────

/// Parsed host.json, reduced to the HTTP routing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpRouteConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<HostExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpRouteConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRouteConfig {
    #[serde(rename = "routePrefix", default, skip_serializing_if = "Option::is_none")]
    pub route_prefix: Option<String>,
}

/// Resolve the route prefix for a given runtime version label (`~1`, `~2`,
/// `~3`, `beta`, ...).
///
/// v2/v3 and beta hosts carry the prefix under `extensions.http`; v1 (and
/// anything unrecognized) under top-level `http`. Missing either way falls
/// back to [`DEFAULT_ROUTE_PREFIX`].
pub fn route_prefix(config: Option<&HostConfig>, runtime_version: &str) -> String {
    let from_extensions = runtime_version == BETA_VERSION
        || matches!(
            RuntimeMajorVersion::from_setting(Some(runtime_version)),
            RuntimeMajorVersion::V2 | RuntimeMajorVersion::V3
        );
    let configured = if from_extensions {
        config
            .and_then(|c| c.extensions.as_ref())
            .and_then(|e| e.http.as_ref())
            .and_then(|h| h.route_prefix.clone())
    } else {
        config
            .and_then(|c| c.http.as_ref())
            .and_then(|h| h.route_prefix.clone())
    };
    configured.unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Path assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Build the invocation path from prefix, function name, optional custom
/// route template and pre-formatted query parameters (`"code=..."`).
///
/// Doubled slashes collapse, `/?` collapses to `?`, and a trailing bare `?`
/// is stripped.
pub fn invoke_url_path(
    prefix: &str,
    function_name: &str,
    route: Option<&str>,
    query_params: &[String],
) -> String {
    let mut path = match route {
        Some(route) if !route.is_empty() => format!("/{prefix}/{route}"),
        _ => format!("/{prefix}/{function_name}"),
    };

    while path.contains("//") {
        path = path.replace("//", "/");
    }
    path = path.replacen("/?", "?", 1);

    if !path.ends_with('?') {
        path.push('?');
    }
    path.push_str(&query_params.join("&"));

    match path.strip_suffix('?') {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path parameters
// ─────────────────────────────────────────────────────────────────────────────

fn path_param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"))
}

/// Substitute `{name}` / `{name:default}` placeholders from the query rows
/// (case-insensitive name match).
///
/// Returns the substituted URL and the lowercased placeholder names, whether
/// or not a matching query row existed; callers exclude those names from the
/// appended query string.
pub fn substitute_path_params(
    url: &str,
    queries: &[NameValuePair],
) -> (String, Vec<String>) {
    let mut result = url.to_string();
    let mut processed = Vec::new();

    for caps in path_param_re().captures_iter(url) {
        let token = caps.get(0).expect("match").as_str();
        let name = caps[1]
            .split(':')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        processed.push(name.clone());

        if let Some(param) = queries.iter().find(|q| q.name.to_lowercase() == name) {
            result = result.replacen(token, &param.value, 1);
        }
    }

    (result, processed)
}

/// Extract `{name:default}` placeholders as seed rows for the test form.
///
/// Placeholder names keep their original casing; a missing `:default` part
/// seeds an empty value.
pub fn path_param_seeds(url: &str) -> Vec<NameValuePair> {
    path_param_re()
        .captures_iter(url)
        .map(|caps| {
            let mut parts = caps[1].splitn(2, ':');
            let name = parts.next().unwrap_or_default().to_string();
            let value = parts.next().unwrap_or_default().to_string();
            NameValuePair { name, value }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Query strings
// ─────────────────────────────────────────────────────────────────────────────

/// Percent-encode and join query rows into `a=1&b=2`.
pub fn query_string(queries: &[NameValuePair]) -> String {
    queries
        .iter()
        .map(|q| {
            format!(
                "{}={}",
                utf8_percent_encode(&q.name, QUERY_ENCODE),
                utf8_percent_encode(&q.value, QUERY_ENCODE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append a query string with `?` or `&` depending on what the URL already
/// carries. Empty query strings leave the URL untouched.
pub fn append_query_string(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_config(v1_prefix: Option<&str>, v2_prefix: Option<&str>) -> HostConfig {
        HostConfig {
            http: v1_prefix.map(|p| HttpRouteConfig {
                route_prefix: Some(p.to_string()),
            }),
            extensions: v2_prefix.map(|p| HostExtensions {
                http: Some(HttpRouteConfig {
                    route_prefix: Some(p.to_string()),
                }),
            }),
        }
    }

    #[test]
    fn test_route_prefix_v2_reads_extensions() {
        let config = host_config(Some("v1route"), Some("v2route"));
        assert_eq!(route_prefix(Some(&config), "~2"), "v2route");
        assert_eq!(route_prefix(Some(&config), "~3"), "v2route");
        assert_eq!(route_prefix(Some(&config), "beta"), "v2route");
    }

    #[test]
    fn test_route_prefix_v1_reads_http() {
        let config = host_config(Some("v1route"), Some("v2route"));
        assert_eq!(route_prefix(Some(&config), "~1"), "v1route");
        assert_eq!(route_prefix(Some(&config), "anything-else"), "v1route");
    }

    #[test]
    fn test_route_prefix_defaults_to_api() {
        assert_eq!(route_prefix(None, "~2"), "api");
        let empty = HostConfig::default();
        assert_eq!(route_prefix(Some(&empty), "~1"), "api");
        assert_eq!(route_prefix(Some(&empty), "~3"), "api");
    }

    #[test]
    fn test_invoke_path_plain() {
        let path = invoke_url_path("api", "foo", None, &[]);
        assert_eq!(path, "/api/foo");
    }

    #[test]
    fn test_invoke_path_custom_route() {
        let path = invoke_url_path("api", "foo", Some("items/{id}"), &[]);
        assert_eq!(path, "/api/items/{id}");
    }

    #[test]
    fn test_invoke_path_with_query_params() {
        let path = invoke_url_path("api", "foo", None, &["code=abc".to_string()]);
        assert_eq!(path, "/api/foo?code=abc");

        let path = invoke_url_path(
            "api",
            "foo",
            None,
            &["code=abc".to_string(), "clientId=k1".to_string()],
        );
        assert_eq!(path, "/api/foo?code=abc&clientId=k1");
    }

    #[test]
    fn test_invoke_path_collapses_double_slashes() {
        let path = invoke_url_path("api/", "foo", Some("/items//5"), &[]);
        assert_eq!(path, "/api/items/5");
    }

    #[test]
    fn test_invoke_path_empty_prefix() {
        let path = invoke_url_path("", "foo", None, &[]);
        assert_eq!(path, "/foo");
    }

    #[test]
    fn test_invoke_path_strips_bare_question_mark() {
        let path = invoke_url_path("api", "foo", Some("items/?"), &[]);
        assert_eq!(path, "/api/items");
    }

    #[test]
    fn test_substitute_path_params() {
        let queries = vec![NameValuePair::new("id", "5")];
        let (url, processed) = substitute_path_params("/api/items/{id}", &queries);
        assert_eq!(url, "/api/items/5");
        assert_eq!(processed, vec!["id".to_string()]);
    }

    #[test]
    fn test_substitute_is_case_insensitive() {
        let queries = vec![NameValuePair::new("ID", "5")];
        let (url, processed) = substitute_path_params("/api/items/{Id}", &queries);
        assert_eq!(url, "/api/items/5");
        assert_eq!(processed, vec!["id".to_string()]);
    }

    #[test]
    fn test_substitute_without_match_records_name() {
        let (url, processed) = substitute_path_params("/api/items/{id}", &[]);
        assert_eq!(url, "/api/items/{id}");
        assert_eq!(processed, vec!["id".to_string()]);
    }

    #[test]
    fn test_substitute_with_default_token() {
        let queries = vec![NameValuePair::new("id", "7")];
        let (url, processed) = substitute_path_params("/api/items/{id:int}", &queries);
        assert_eq!(url, "/api/items/7");
        assert_eq!(processed, vec!["id".to_string()]);
    }

    #[test]
    fn test_path_param_seeds() {
        let seeds = path_param_seeds("/api/items/{Id}/{tag:blue}");
        assert_eq!(
            seeds,
            vec![
                NameValuePair::new("Id", ""),
                NameValuePair::new("tag", "blue"),
            ]
        );
    }

    #[test]
    fn test_query_string_encodes() {
        let queries = vec![
            NameValuePair::new("name", "a b"),
            NameValuePair::new("x", "1&2"),
        ];
        assert_eq!(query_string(&queries), "name=a%20b&x=1%262");
    }

    #[test]
    fn test_query_string_empty() {
        assert_eq!(query_string(&[]), "");
    }

    #[test]
    fn test_append_query_string() {
        assert_eq!(append_query_string("/api/foo", "a=1"), "/api/foo?a=1");
        assert_eq!(
            append_query_string("/api/foo?code=x", "a=1"),
            "/api/foo?code=x&a=1"
        );
        assert_eq!(append_query_string("/api/foo", ""), "/api/foo");
    }
}
