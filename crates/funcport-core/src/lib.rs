//! # funcport-core - Core Domain Types
//!
//! Foundation crate for Funcport. Provides the remote-call envelope, error
//! handling, runtime-version classification, invocation URL derivation, and
//! the small pure view-model types the loaders and views share.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, regex, tracing, percent-encoding).
//!
//! ## Public API
//!
//! ### Envelope (`envelope`)
//! - [`Envelope`] - Success/failure wrapper every remote call resolves to
//! - [`LogCategory`] - Category tag attached to logged remote failures
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Runtime Versions (`runtime`)
//! - [`RuntimeMajorVersion`] - `~1`/`~2`/`~3`/custom buckets
//! - [`tilde_version()`] - Collapse an exact version string to its `~N` form
//!
//! ### Invocation URLs (`invoke_url`)
//! - [`HostConfig`] - host.json reduced to the HTTP routing surface
//! - [`route_prefix()`], [`invoke_url_path()`] - Path derivation
//! - [`substitute_path_params()`], [`path_param_seeds()`] - `{param}` handling
//!
//! ### View-model records
//! - [`FileContent`] - saved/latest pair with the dirty predicate
//! - [`TestData`] / [`NameValuePair`] - ad-hoc invocation payload
//! - [`EditorLanguage`] - syntax language inferred from a file name
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use funcport_core::prelude::*;
//! ```

pub mod editor_language;
pub mod envelope;
pub mod error;
pub mod file_content;
pub mod invoke_url;
pub mod logging;
pub mod runtime;
pub mod test_data;
pub mod validation;

/// Prelude for common imports used throughout all Funcport crates
pub mod prelude {
    pub use super::envelope::{Envelope, LogCategory};
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use editor_language::{language_for_file, EditorLanguage};
pub use envelope::{Envelope, LogCategory};
pub use error::{Error, Result, ResultExt};
pub use file_content::FileContent;
pub use invoke_url::{
    append_query_string, invoke_url_path, path_param_seeds, query_string, route_prefix,
    substitute_path_params, HostConfig, HostExtensions, HttpRouteConfig, DEFAULT_ROUTE_PREFIX,
};
pub use runtime::{tilde_version, RuntimeMajorVersion, BETA_VERSION};
pub use test_data::{HttpMethod, NameValuePair, TestData};
pub use validation::{
    is_reserved_header, is_valid_header, is_valid_query, FUNCTIONS_KEY_HEADER,
};
