//! # funcport-api - Remote Service Clients
//!
//! Typed request/response wrappers over the three remote surfaces the
//! front-end consumes:
//!
//! - **management** - sites, functions, settings, keys, host status
//! - **host** - VFS files, host.json, ad-hoc invocation
//! - **insights** - invocation telemetry components, tokens, traces
//!
//! Each surface is an async trait ([`ManagementApi`], [`HostApi`],
//! [`InsightsApi`]) implemented by the shared [`PortalClient`]; loaders
//! depend on the traits so tests can script per-operation outcomes. Every
//! operation resolves to a [`funcport_core::Envelope`] — remote failure is
//! data, not control flow.

pub mod client;
pub mod host;
pub mod insights;
pub mod management;
pub mod models;
pub mod resource;

pub use client::{PortalClient, DEFAULT_INSIGHTS_BASE, MANAGEMENT_API_VERSION};
pub use resource::ResourceIds;
pub use host::HostApi;
pub use insights::{instrumentation_key_from_connection_string, InsightsApi};
pub use management::ManagementApi;
pub use models::{
    AppSettings, ArmObj, BindingDirection, BindingInfo, BindingMetadata, ExtensionBundle,
    FunctionConfig, FunctionInfo, FunctionKeys, HostKeys, HostStatus, InsightsComponent,
    InsightsToken, InvocationTrace, InvocationTraceDetail, Site, VfsObject, DIRECTORY_MIME,
    SETTING_EXTENSION_VERSION, SETTING_INSIGHTS_CONNECTION_STRING,
    SETTING_INSIGHTS_INSTRUMENTATION_KEY,
};
