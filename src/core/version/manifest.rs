// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest.

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::ServerResult;

/// Default location of the Mojang version manifest.
pub const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    /// Location of the per-version metadata document.
    pub url: String,
    #[serde(rename = "type", default)]
    pub version_type: Option<String>,
}

impl VersionManifest {
    /// Fetch the version manifest from `manifest_url`.
    ///
    /// A non-success status is returned as an error; the manifest is never
    /// cached between calls.
    pub async fn fetch(client: &reqwest::Client, manifest_url: &str) -> ServerResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let manifest: VersionManifest = client
            .get(manifest_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by exact ID (e.g. "1.20.1").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}
