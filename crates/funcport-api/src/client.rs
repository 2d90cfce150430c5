//! HTTP client shared by the management, host, and telemetry surfaces.
//!
//! One bearer token and one management base URL cover everything routed
//! through the management plane (host/VFS calls ride its `hostruntime`
//! proxy); telemetry queries go to a separate query endpoint with a
//! short-lived token. Every call resolves to an [`Envelope`] — transport
//! failures and non-2xx statuses are data for the loaders, not errors.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use funcport_core::prelude::*;
use funcport_core::HttpMethod;

/// API version sent with every management-plane call.
pub const MANAGEMENT_API_VERSION: &str = "2018-11-01";

/// API version for telemetry component resources.
pub const INSIGHTS_API_VERSION: &str = "2015-05-01";

/// Default telemetry query endpoint.
pub const DEFAULT_INSIGHTS_BASE: &str = "https://api.applicationinsights.io";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Typed wrapper over the remote management/host/telemetry surfaces.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    management_base: Url,
    insights_base: Url,
    bearer_token: String,
}

impl PortalClient {
    pub fn new(management_base: &str, bearer_token: impl Into<String>) -> Result<Self> {
        Self::with_insights_base(management_base, DEFAULT_INSIGHTS_BASE, bearer_token)
    }

    pub fn with_insights_base(
        management_base: &str,
        insights_base: &str,
        bearer_token: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::http(format!("failed to create HTTP client: {e}")))?;
        let management_base = Url::parse(management_base)
            .map_err(|e| Error::resource(format!("invalid management base url: {e}")))?;
        let insights_base = Url::parse(insights_base)
            .map_err(|e| Error::resource(format!("invalid telemetry base url: {e}")))?;

        Ok(Self {
            http,
            management_base,
            insights_base,
            bearer_token: bearer_token.into(),
        })
    }

    /// Build a management-plane request for a resource path, with the
    /// api-version and bearer token attached.
    pub(crate) fn arm_request(
        &self,
        method: Method,
        resource_path: &str,
        api_version: &str,
    ) -> RequestBuilder {
        let mut url = self.management_base.clone();
        url.set_path(resource_path);
        url.query_pairs_mut().append_pair("api-version", api_version);
        self.http
            .request(method, url)
            .bearer_auth(&self.bearer_token)
    }

    /// Build a telemetry-query request authorized with a short-lived token.
    pub(crate) fn insights_request(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> RequestBuilder {
        let mut url = self.insights_base.clone();
        url.set_path(path);
        self.http.request(method, url).bearer_auth(token)
    }

    /// Build a request against an absolute URL (invocation runs, href
    /// follow-ups). Invalid URLs surface as a transport-level envelope at
    /// send time via reqwest's own error.
    pub(crate) fn absolute_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Envelope plumbing
    // ─────────────────────────────────────────────────────────────────────

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Envelope<T> {
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if response.status().is_success() {
                    match response.json::<T>().await {
                        Ok(value) => Envelope::ok(status, value),
                        Err(e) => Envelope::failed(status, format!("decode error: {e}")),
                    }
                } else {
                    let error = response.text().await.unwrap_or_default();
                    Envelope::failed(status, error)
                }
            }
            Err(e) => Envelope::transport(e.to_string()),
        }
    }

    /// Send and return the raw body text. The body is returned for failures
    /// too: an invocation's error payload is part of the test output.
    pub(crate) async fn send_text(&self, request: RequestBuilder) -> Envelope<String> {
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let success = response.status().is_success();
                let text = response.text().await.unwrap_or_default();
                if success {
                    Envelope::ok(status, text)
                } else {
                    Envelope::failed(status, text)
                }
            }
            Err(e) => Envelope::transport(e.to_string()),
        }
    }

    /// Send and discard the body.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Envelope<()> {
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if response.status().is_success() {
                    Envelope::ok(status, ())
                } else {
                    let error = response.text().await.unwrap_or_default();
                    Envelope::failed(status, error)
                }
            }
            Err(e) => Envelope::transport(e.to_string()),
        }
    }
}

/// Map a test-form method to the transport method.
pub(crate) fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}
