// ─── Version File ───
// Parses the per-version metadata document referenced by the manifest.

use serde::Deserialize;
use tracing::debug;

use crate::core::error::ServerResult;

/// The subset of a Mojang version JSON needed to provision a server.
#[derive(Debug, Deserialize)]
pub struct VersionMetadata {
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
}

impl VersionMetadata {
    /// Fetch and parse the metadata document at `url`.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> ServerResult<Self> {
        debug!("Fetching version metadata from {}", url);

        let metadata = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(metadata)
    }

    /// The `downloads.server.url` field, if the version ships a server.
    pub fn server_download_url(&self) -> Option<&str> {
        self.downloads
            .as_ref()
            .and_then(|d| d.server.as_ref())
            .map(|server| server.url.as_str())
    }
}
