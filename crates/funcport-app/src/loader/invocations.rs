//! Invocation telemetry loaders.

use funcport_core::prelude::*;
use funcport_api::models::{InvocationTrace, InvocationTraceDetail};
use funcport_api::InsightsApi;

/// Issue a query token for the telemetry component.
pub async fn load_insights_token<C: InsightsApi + Sync>(
    client: &C,
    component_id: &str,
) -> Option<String> {
    client
        .fetch_component_token(component_id)
        .await
        .into_logged(LogCategory::FunctionMonitor, "fetch_component_token")
        .map(|t| t.token)
}

/// Recent invocation traces for the function.
pub async fn load_invocation_traces<C: InsightsApi + Sync>(
    client: &C,
    app_id: &str,
    token: &str,
    function_name: &str,
) -> Option<Vec<InvocationTrace>> {
    client
        .list_invocation_traces(app_id, token, function_name)
        .await
        .into_logged(LogCategory::FunctionMonitor, "list_invocation_traces")
}

/// Log rows for one selected invocation.
pub async fn load_invocation_details<C: InsightsApi + Sync>(
    client: &C,
    app_id: &str,
    token: &str,
    operation_id: &str,
    invocation_id: &str,
) -> Option<Vec<InvocationTraceDetail>> {
    client
        .fetch_invocation_details(app_id, token, operation_id, invocation_id)
        .await
        .into_logged(LogCategory::FunctionMonitor, "fetch_invocation_details")
}
