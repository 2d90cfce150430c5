//! Invocation telemetry operations.
//!
//! The telemetry component is an ARM resource discovered from the app's
//! settings (connection string or bare instrumentation key); invocation
//! queries then go to the telemetry query endpoint with a short-lived token.

use reqwest::Method;
use serde::Deserialize;

use funcport_core::Envelope;

use crate::client::{PortalClient, INSIGHTS_API_VERSION};
use crate::models::{
    ArmObj, InsightsComponent, InsightsToken, InvocationTrace, InvocationTraceDetail,
};

/// Telemetry API surface.
#[trait_variant::make(InsightsApi: Send)]
pub trait LocalInsightsApi {
    /// Locate the component matching a full connection string.
    async fn find_component_by_connection_string(
        &self,
        connection_string: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>>;

    /// Locate the component matching a bare instrumentation key.
    async fn find_component_by_instrumentation_key(
        &self,
        instrumentation_key: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>>;

    /// Issue a short-lived query token for a component.
    async fn fetch_component_token(&self, component_id: &str) -> Envelope<InsightsToken>;

    /// Recent invocation traces for one function.
    async fn list_invocation_traces(
        &self,
        app_id: &str,
        token: &str,
        function_name: &str,
    ) -> Envelope<Vec<InvocationTrace>>;

    /// Per-invocation log rows.
    async fn fetch_invocation_details(
        &self,
        app_id: &str,
        token: &str,
        operation_id: &str,
        invocation_id: &str,
    ) -> Envelope<Vec<InvocationTraceDetail>>;
}

/// Pull the `InstrumentationKey=` segment out of a connection string.
pub fn instrumentation_key_from_connection_string(connection_string: &str) -> Option<String> {
    connection_string
        .split(';')
        .find_map(|segment| segment.trim().strip_prefix("InstrumentationKey="))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct ComponentList {
    #[serde(default)]
    value: Vec<ArmObj<InsightsComponent>>,
}

#[derive(Debug, Deserialize)]
struct TraceList {
    #[serde(default)]
    value: Vec<InvocationTrace>,
}

#[derive(Debug, Deserialize)]
struct TraceDetailList {
    #[serde(default)]
    value: Vec<InvocationTraceDetail>,
}

impl PortalClient {
    async fn find_component(
        &self,
        instrumentation_key: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>> {
        let request = self.arm_request(
            Method::GET,
            "/providers/Microsoft.Insights/components",
            INSIGHTS_API_VERSION,
        );
        let key = instrumentation_key.to_string();
        self.send_json::<ComponentList>(request)
            .await
            .map(move |list| {
                list.value.into_iter().find(|component| {
                    component.properties.instrumentation_key.as_deref() == Some(key.as_str())
                })
            })
    }
}

impl InsightsApi for PortalClient {
    async fn find_component_by_connection_string(
        &self,
        connection_string: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>> {
        match instrumentation_key_from_connection_string(connection_string) {
            Some(key) => self.find_component(&key).await,
            None => Envelope::failed(0, "connection string has no InstrumentationKey segment"),
        }
    }

    async fn find_component_by_instrumentation_key(
        &self,
        instrumentation_key: &str,
    ) -> Envelope<Option<ArmObj<InsightsComponent>>> {
        self.find_component(instrumentation_key).await
    }

    async fn fetch_component_token(&self, component_id: &str) -> Envelope<InsightsToken> {
        let path = format!("{component_id}/getToken");
        let request = self.arm_request(Method::POST, &path, INSIGHTS_API_VERSION);
        self.send_json(request).await
    }

    async fn list_invocation_traces(
        &self,
        app_id: &str,
        token: &str,
        function_name: &str,
    ) -> Envelope<Vec<InvocationTrace>> {
        let path = format!("/v1/apps/{app_id}/invocations");
        let request = self
            .insights_request(Method::GET, &path, token)
            .query(&[("functionName", function_name)]);
        self.send_json::<TraceList>(request)
            .await
            .map(|list| list.value)
    }

    async fn fetch_invocation_details(
        &self,
        app_id: &str,
        token: &str,
        operation_id: &str,
        invocation_id: &str,
    ) -> Envelope<Vec<InvocationTraceDetail>> {
        let path = format!("/v1/apps/{app_id}/invocations/{operation_id}");
        let request = self
            .insights_request(Method::GET, &path, token)
            .query(&[("invocationId", invocation_id)]);
        self.send_json::<TraceDetailList>(request)
            .await
            .map(|list| list.value)
    }
}
