use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{ServerError, ServerResult};
use crate::core::launch::LaunchConfig;
use crate::core::net::PUBLIC_IP_URL;
use crate::core::version::manifest::VERSION_MANIFEST_URL;

const APP_DIR_NAME: &str = "mc-server-manager";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted manager settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerSettings {
    pub server_dir: PathBuf,
    pub java_path: PathBuf,
    pub min_memory: String,
    pub max_memory: String,
    pub manifest_url: String,
    pub public_ip_url: String,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        let launch = LaunchConfig::default();
        Self {
            server_dir: PathBuf::from("minecraft_server"),
            java_path: launch.java_path,
            min_memory: launch.min_memory,
            max_memory: launch.max_memory,
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            public_ip_url: PUBLIC_IP_URL.to_string(),
        }
    }
}

impl ManagerSettings {
    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            java_path: self.java_path.clone(),
            min_memory: self.min_memory.clone(),
            max_memory: self.max_memory.clone(),
        }
    }
}

/// Default settings location: `<config dir>/mc-server-manager/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE))
}

/// Load settings from `explicit`, or from [`settings_path`] when `None`.
///
/// An explicit file must exist and parse. The default file is optional and
/// a broken one is ignored with a warning.
pub fn load_settings(explicit: Option<&Path>) -> ServerResult<ManagerSettings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    let Some(path) = settings_path() else {
        return Ok(ManagerSettings::default());
    };

    if !path.exists() {
        debug!("No settings file at {:?}; using defaults", path);
        return Ok(ManagerSettings::default());
    }

    match read_settings(&path) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!("Ignoring unreadable settings {:?}: {}", path, e);
            Ok(ManagerSettings::default())
        }
    }
}

fn read_settings(path: &Path) -> ServerResult<ManagerSettings> {
    let raw = std::fs::read_to_string(path).map_err(|e| ServerError::io(path, e))?;
    let settings = serde_json::from_str(&raw)?;
    debug!("Loaded settings from {:?}", path);
    Ok(settings)
}
