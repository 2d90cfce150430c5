//! Persisted test-payload handling.
//!
//! A function's ad-hoc test payload is stored on the resource as a JSON
//! string: `{method, queryStringParams, headers, body}`. Older functions may
//! hold a bare request body instead, so parsing degrades to a POST with the
//! raw text as body rather than failing.

use serde::{Deserialize, Serialize};

use crate::envelope::LogCategory;

/// A single name/value row (query parameter or header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

impl NameValuePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// HTTP methods offered by the test form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: &'static [HttpMethod] = &[
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Case-insensitive parse; unknown methods fall back to GET.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "delete" => HttpMethod::Delete,
            "patch" => HttpMethod::Patch,
            "head" => HttpMethod::Head,
            "options" => HttpMethod::Options,
            _ => HttpMethod::Get,
        }
    }
}

/// Wire form of the persisted test payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TestDataWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(rename = "queryStringParams", default)]
    queries: Vec<NameValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    headers: Option<Vec<NameValuePair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

/// Fully-resolved test payload ready for the form or an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestData {
    pub method: HttpMethod,
    pub queries: Vec<NameValuePair>,
    pub headers: Vec<NameValuePair>,
    pub body: String,
}

impl TestData {
    /// Parse the persisted JSON string.
    ///
    /// Two degraded paths, neither an error:
    /// - JSON without a `headers` field is treated as a bare body (POST)
    /// - unparseable text becomes the POST body verbatim
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return TestData::default();
        }

        match serde_json::from_str::<TestDataWire>(raw) {
            Ok(wire) if wire.headers.is_some() => TestData {
                method: wire
                    .method
                    .as_deref()
                    .map(HttpMethod::parse)
                    .unwrap_or_default(),
                queries: wire.queries,
                headers: wire.headers.unwrap_or_default(),
                body: wire.body.unwrap_or_default(),
            },
            Ok(_) => TestData {
                method: HttpMethod::Post,
                body: raw.to_string(),
                ..TestData::default()
            },
            Err(err) => {
                tracing::warn!(
                    category = LogCategory::FunctionEdit.as_str(),
                    "invalid test data json, treating as raw body: {err}"
                );
                TestData {
                    method: HttpMethod::Post,
                    body: raw.to_string(),
                    ..TestData::default()
                }
            }
        }
    }

    /// Serialize back to the persisted wire form.
    pub fn to_json(&self) -> String {
        let wire = TestDataWire {
            method: Some(self.method.as_str().to_string()),
            queries: self.queries.clone(),
            headers: Some(self.headers.clone()),
            body: Some(self.body.clone()),
        };
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let raw = r#"{"method":"post","queryStringParams":[{"name":"id","value":"5"}],"headers":[{"name":"x-trace","value":"1"}],"body":"{}"}"#;
        let data = TestData::parse(raw);
        assert_eq!(data.method, HttpMethod::Post);
        assert_eq!(data.queries, vec![NameValuePair::new("id", "5")]);
        assert_eq!(data.headers, vec![NameValuePair::new("x-trace", "1")]);
        assert_eq!(data.body, "{}");
    }

    #[test]
    fn test_parse_json_without_headers_is_raw_body() {
        let raw = r#"{"name":"World"}"#;
        let data = TestData::parse(raw);
        assert_eq!(data.method, HttpMethod::Post);
        assert_eq!(data.body, raw);
        assert!(data.queries.is_empty());
        assert!(data.headers.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_is_raw_body() {
        let raw = "plain text payload";
        let data = TestData::parse(raw);
        assert_eq!(data.method, HttpMethod::Post);
        assert_eq!(data.body, raw);
    }

    #[test]
    fn test_parse_empty_is_default() {
        let data = TestData::parse("");
        assert_eq!(data, TestData::default());
        assert_eq!(data.method, HttpMethod::Get);
    }

    #[test]
    fn test_roundtrip() {
        let data = TestData {
            method: HttpMethod::Put,
            queries: vec![NameValuePair::new("q", "1")],
            headers: vec![NameValuePair::new("h", "2")],
            body: "body".to_string(),
        };
        let parsed = TestData::parse(&data.to_json());
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("POST"), HttpMethod::Post);
        assert_eq!(HttpMethod::parse("Delete"), HttpMethod::Delete);
        assert_eq!(HttpMethod::parse("bogus"), HttpMethod::Get);
    }
}
