//! Settings parser for .funcport/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use funcport_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const FUNCPORT_DIR: &str = ".funcport";

/// User configuration, all fields optional with sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub portal: PortalSettings,
    pub target: TargetSettings,
}

/// Where the remote surfaces live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Management-plane base URL
    pub management_base: String,
    /// Telemetry query endpoint override
    pub insights_base: Option<String>,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            management_base: "https://management.azure.com".to_string(),
            insights_base: None,
        }
    }
}

/// Which function to open. CLI arguments override both fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Function app site resource id
    pub site_id: Option<String>,
    /// Function name within the app
    pub function_name: Option<String>,
}

/// Load settings from `.funcport/config.toml` under `base_dir`, falling back
/// to the user config dir, then to defaults. Parse errors are logged and
/// yield defaults; a missing file is not an error.
pub fn load_settings(base_dir: &Path) -> Settings {
    for path in candidate_paths(base_dir) {
        if !path.exists() {
            continue;
        }
        match read_settings(&path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                return settings;
            }
            Err(e) => {
                warn!("Ignoring unreadable config {}: {e}", path.display());
            }
        }
    }
    Settings::default()
}

fn candidate_paths(base_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![base_dir.join(FUNCPORT_DIR).join(CONFIG_FILENAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("funcport").join(CONFIG_FILENAME));
    }
    paths
}

fn read_settings(path: &Path) -> Result<Settings> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| Error::config(format!("{}: {e}", path.display())))
}
