//! Management-plane operations: sites, functions, settings, keys, status.

use reqwest::Method;
use serde::Deserialize;

use funcport_core::Envelope;

use crate::client::{PortalClient, MANAGEMENT_API_VERSION};
use crate::models::{
    AppSettings, ArmObj, FunctionInfo, FunctionKeys, HostKeys, HostStatus, Site,
};

/// Management API surface the loaders orchestrate over.
///
/// Behind a trait so loader tests can script per-operation outcomes.
#[trait_variant::make(ManagementApi: Send)]
pub trait LocalManagementApi {
    /// Fetch the function app site resource.
    async fn fetch_site(&self, site_id: &str) -> Envelope<ArmObj<Site>>;

    /// Fetch a single function resource.
    async fn fetch_function(&self, function_id: &str) -> Envelope<ArmObj<FunctionInfo>>;

    /// Write a function resource back wholesale.
    async fn update_function(
        &self,
        function_id: &str,
        info: &ArmObj<FunctionInfo>,
    ) -> Envelope<ArmObj<FunctionInfo>>;

    /// List the app settings name/value map. 403 means the caller lacks
    /// write permission on the app.
    async fn fetch_app_settings(&self, site_id: &str) -> Envelope<AppSettings>;

    /// List host-level keys (master + host function/system keys).
    async fn fetch_host_keys(&self, site_id: &str) -> Envelope<HostKeys>;

    /// List per-function keys.
    async fn fetch_function_keys(&self, function_id: &str) -> Envelope<FunctionKeys>;

    /// Fetch the runtime host status (reports the exact runtime version).
    async fn fetch_host_status(&self, site_id: &str) -> Envelope<HostStatus>;

    /// Ask the platform to re-sync function triggers.
    async fn fire_sync_trigger(&self, site_id: &str) -> Envelope<()>;
}

/// ARM responses that only matter for their `properties` payload.
#[derive(Debug, Deserialize)]
struct PropertiesOnly<T> {
    properties: T,
}

impl ManagementApi for PortalClient {
    async fn fetch_site(&self, site_id: &str) -> Envelope<ArmObj<Site>> {
        let request = self.arm_request(Method::GET, site_id, MANAGEMENT_API_VERSION);
        self.send_json(request).await
    }

    async fn fetch_function(&self, function_id: &str) -> Envelope<ArmObj<FunctionInfo>> {
        let request = self.arm_request(Method::GET, function_id, MANAGEMENT_API_VERSION);
        self.send_json(request).await
    }

    async fn update_function(
        &self,
        function_id: &str,
        info: &ArmObj<FunctionInfo>,
    ) -> Envelope<ArmObj<FunctionInfo>> {
        let request = self
            .arm_request(Method::PUT, function_id, MANAGEMENT_API_VERSION)
            .json(info);
        self.send_json(request).await
    }

    async fn fetch_app_settings(&self, site_id: &str) -> Envelope<AppSettings> {
        let path = format!("{site_id}/config/appsettings/list");
        let request = self.arm_request(Method::POST, &path, MANAGEMENT_API_VERSION);
        self.send_json::<PropertiesOnly<AppSettings>>(request)
            .await
            .map(|wrapper| wrapper.properties)
    }

    async fn fetch_host_keys(&self, site_id: &str) -> Envelope<HostKeys> {
        let path = format!("{site_id}/host/default/listkeys");
        let request = self.arm_request(Method::POST, &path, MANAGEMENT_API_VERSION);
        self.send_json(request).await
    }

    async fn fetch_function_keys(&self, function_id: &str) -> Envelope<FunctionKeys> {
        let path = format!("{function_id}/listkeys");
        let request = self.arm_request(Method::POST, &path, MANAGEMENT_API_VERSION);
        self.send_json(request).await
    }

    async fn fetch_host_status(&self, site_id: &str) -> Envelope<HostStatus> {
        let path = format!("{site_id}/host/default/properties/status");
        let request = self.arm_request(Method::GET, &path, MANAGEMENT_API_VERSION);
        self.send_json::<PropertiesOnly<HostStatus>>(request)
            .await
            .map(|wrapper| wrapper.properties)
    }

    async fn fire_sync_trigger(&self, site_id: &str) -> Envelope<()> {
        let path = format!("{site_id}/syncfunctiontriggers");
        let request = self.arm_request(Method::POST, &path, MANAGEMENT_API_VERSION);
        self.send_unit(request).await
    }
}
