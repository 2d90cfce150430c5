//! Functions runtime version classification.
//!
//! The host reports an exact version string (e.g. `"2.0.12888.0"`), while the
//! app-settings layer stores the pinned `~N` form. Both collapse to a small
//! set of major-version buckets; unrecognized input always maps to a default
//! bucket, never an error.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Custom (non-major) runtime version label for pre-release hosts.
pub const BETA_VERSION: &str = "beta";

/// Major runtime version buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMajorVersion {
    V1,
    V2,
    #[default]
    V3,
    /// Anything that is not a recognized `~N` pin (including `beta`/`latest`)
    Custom,
}

impl RuntimeMajorVersion {
    /// Classify an exact host version string by prefix.
    ///
    /// Unrecognized input maps to [`RuntimeMajorVersion::V3`].
    pub fn from_exact(exact: &str) -> Self {
        if exact.starts_with("1.") {
            RuntimeMajorVersion::V1
        } else if exact.starts_with("2.") {
            RuntimeMajorVersion::V2
        } else if exact.starts_with("3.") {
            RuntimeMajorVersion::V3
        } else {
            RuntimeMajorVersion::V3
        }
    }

    /// Classify a pinned app-setting value (`~1`/`~2`/`~3`).
    ///
    /// Anything else, including a missing setting, is [`RuntimeMajorVersion::Custom`].
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("~1") => RuntimeMajorVersion::V1,
            Some("~2") => RuntimeMajorVersion::V2,
            Some("~3") => RuntimeMajorVersion::V3,
            _ => RuntimeMajorVersion::Custom,
        }
    }
}

impl fmt::Display for RuntimeMajorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RuntimeMajorVersion::V1 => "~1",
            RuntimeMajorVersion::V2 => "~2",
            RuntimeMajorVersion::V3 => "~3",
            RuntimeMajorVersion::Custom => "custom",
        };
        f.write_str(label)
    }
}

fn dotted_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.\d+").expect("valid regex"))
}

/// Collapse an exact dotted version string to the `~N` form used on host API
/// routes (`"2.0.12888.0"` → `"~2"`).
///
/// Strings that do not look like a dotted numeric version (`"beta"`,
/// `"latest"`) pass through unchanged.
pub fn tilde_version(exact: &str) -> String {
    match dotted_version_re().captures(exact) {
        Some(caps) => format!("~{}", &caps[1]),
        None => exact.to_string(),
    }
}
