//! Runtime host operations: VFS files, host.json, ad-hoc invocation.
//!
//! Host calls ride the management plane's `hostruntime` proxy, so they share
//! the management token. v1 hosts root their VFS at `site/wwwroot/`; later
//! generations serve function files directly under the runtime VFS root.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, IF_MATCH};
use reqwest::Method;

use funcport_core::prelude::*;
use funcport_core::{HostConfig, HttpMethod};

use crate::client::{to_reqwest_method, PortalClient, MANAGEMENT_API_VERSION};
use crate::models::{BindingMetadata, VfsObject};

/// Runtime host API surface.
#[trait_variant::make(HostApi: Send)]
pub trait LocalHostApi {
    /// Fetch and parse host.json.
    async fn fetch_host_json(&self, site_id: &str, runtime_version: &str)
        -> Envelope<HostConfig>;

    /// List the function's files from the VFS.
    async fn list_files(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
    ) -> Envelope<Vec<VfsObject>>;

    /// Read one file's raw content.
    async fn fetch_file(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
        file_name: &str,
    ) -> Envelope<String>;

    /// Write one file back (`If-Match: *` — last writer wins).
    async fn save_file(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
        file_name: &str,
        content: &str,
        mime: &str,
    ) -> Envelope<()>;

    /// Fetch the runtime's catalog of available binding types.
    async fn fetch_binding_metadata(&self, site_id: &str) -> Envelope<Vec<BindingMetadata>>;

    /// Follow an absolute href from a function resource (test data blobs).
    async fn fetch_href(
        &self,
        href: &str,
        headers: &BTreeMap<String, String>,
    ) -> Envelope<String>;

    /// Invoke a function at its public URL with the test payload.
    async fn run_function(
        &self,
        url: &str,
        method: HttpMethod,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> Envelope<String>;
}

/// VFS root for a runtime generation: v1 keeps function files under the
/// site's wwwroot, later hosts serve them at the VFS root.
fn vfs_root(runtime_version: &str) -> &'static str {
    if runtime_version == "~1" {
        "hostruntime/admin/vfs/site/wwwroot"
    } else {
        "hostruntime/admin/vfs"
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            warn!("skipping invalid header name: {name}");
            continue;
        };
        let Ok(value) = HeaderValue::from_str(value) else {
            warn!("skipping invalid header value for {name:?}");
            continue;
        };
        map.insert(name, value);
    }
    map
}

impl HostApi for PortalClient {
    async fn fetch_host_json(
        &self,
        site_id: &str,
        runtime_version: &str,
    ) -> Envelope<HostConfig> {
        let path = format!("{site_id}/{}/host.json", vfs_root(runtime_version));
        let request = self
            .arm_request(Method::GET, &path, MANAGEMENT_API_VERSION)
            .query(&[("relativePath", "1")]);
        self.send_json(request).await
    }

    async fn list_files(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
    ) -> Envelope<Vec<VfsObject>> {
        let path = format!("{site_id}/{}/{function_name}/", vfs_root(runtime_version));
        let request = self
            .arm_request(Method::GET, &path, MANAGEMENT_API_VERSION)
            .query(&[("relativePath", "1")]);
        self.send_json(request).await
    }

    async fn fetch_file(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
        file_name: &str,
    ) -> Envelope<String> {
        let path = format!(
            "{site_id}/{}/{function_name}/{file_name}",
            vfs_root(runtime_version)
        );
        let request = self
            .arm_request(Method::GET, &path, MANAGEMENT_API_VERSION)
            .query(&[("relativePath", "1")]);
        self.send_text(request).await
    }

    async fn save_file(
        &self,
        site_id: &str,
        function_name: &str,
        runtime_version: &str,
        file_name: &str,
        content: &str,
        mime: &str,
    ) -> Envelope<()> {
        let path = format!(
            "{site_id}/{}/{function_name}/{file_name}",
            vfs_root(runtime_version)
        );
        let request = self
            .arm_request(Method::PUT, &path, MANAGEMENT_API_VERSION)
            .query(&[("relativePath", "1")])
            .header(CONTENT_TYPE, mime)
            .header(IF_MATCH, "*")
            .body(content.to_string());
        self.send_unit(request).await
    }

    async fn fetch_binding_metadata(&self, site_id: &str) -> Envelope<Vec<BindingMetadata>> {
        let path = format!("{site_id}/hostruntime/admin/host/bindings");
        let request = self.arm_request(Method::GET, &path, MANAGEMENT_API_VERSION);
        self.send_json(request).await
    }

    async fn fetch_href(
        &self,
        href: &str,
        headers: &BTreeMap<String, String>,
    ) -> Envelope<String> {
        let request = self
            .absolute_request(Method::GET, href)
            .headers(header_map(headers));
        self.send_text(request).await
    }

    async fn run_function(
        &self,
        url: &str,
        method: HttpMethod,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> Envelope<String> {
        let request = self
            .absolute_request(to_reqwest_method(method), url)
            .headers(header_map(headers))
            .body(body.to_string());
        self.send_text(request).await
    }
}
