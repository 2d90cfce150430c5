//! Resource identifier handling.
//!
//! Management-plane resources are addressed by hierarchical path ids; a
//! function lives under its site
//! (`.../sites/{app}/functions/{name}`). Loaders need both the function id
//! and the trimmed site id it nests under.

use funcport_core::prelude::*;

/// Identifiers for the function being managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIds {
    /// The function app site resource id
    pub site_id: String,
    /// The function resource id (site id + `/functions/{name}`)
    pub function_id: String,
    /// The bare function name
    pub function_name: String,
}

impl ResourceIds {
    /// Build from a site id and function name.
    pub fn new(site_id: impl Into<String>, function_name: impl Into<String>) -> Self {
        let site_id = site_id.into().trim_end_matches('/').to_string();
        let function_name = function_name.into();
        let function_id = format!("{site_id}/functions/{function_name}");
        Self {
            site_id,
            function_id,
            function_name,
        }
    }

    /// Parse a full function resource id into its parts.
    pub fn from_function_id(function_id: &str) -> Result<Self> {
        let trimmed = function_id.trim_end_matches('/');
        let (site_id, function_name) = trimmed
            .rsplit_once("/functions/")
            .ok_or_else(|| Error::resource(format!("not a function resource id: {function_id}")))?;
        if site_id.is_empty() || function_name.is_empty() || function_name.contains('/') {
            return Err(Error::resource(format!(
                "not a function resource id: {function_id}"
            )));
        }
        Ok(Self::new(site_id, function_name))
    }
}
