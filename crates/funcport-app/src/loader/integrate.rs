//! Bindings/integrate view loader.

use funcport_core::prelude::*;
use funcport_api::models::BindingMetadata;
use funcport_api::{HostApi, ResourceIds};

/// Fetch the runtime's binding-type catalog. `None` surfaces as the
/// non-fatal error banner on the integrate view.
pub async fn load_binding_metadata<C: HostApi + Sync>(
    client: &C,
    ids: &ResourceIds,
) -> Option<Vec<BindingMetadata>> {
    client
        .fetch_binding_metadata(&ids.site_id)
        .await
        .into_logged(LogCategory::FunctionIntegrate, "fetch_binding_metadata")
}
