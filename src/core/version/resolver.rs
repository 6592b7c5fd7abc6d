// ─── Manifest Resolver ───
// Maps a version identifier to the download URL of its server artifact.

use reqwest::Client;
use tracing::{info, warn};

use super::{VersionManifest, VersionMetadata};
use crate::core::error::{ServerError, ServerResult};

/// Resolves version identifiers against a remote manifest.
///
/// Holds no state beyond the client and endpoint: every call fetches the
/// manifest again. Any failure (transport, status, unexpected shape,
/// unknown id) is reported as [`ServerError::NotFound`].
#[derive(Debug, Clone)]
pub struct ManifestResolver {
    client: Client,
    manifest_url: String,
}

impl ManifestResolver {
    pub fn new(client: Client, manifest_url: impl Into<String>) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
        }
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Resolve `version_id` to its `downloads.server.url`.
    ///
    /// Performs one round-trip when the id is unknown and two when it is
    /// found. The returned URL is exactly the string found upstream.
    pub async fn resolve_download_url(&self, version_id: &str) -> ServerResult<String> {
        let not_found = || ServerError::NotFound(version_id.to_string());

        let manifest = VersionManifest::fetch(&self.client, &self.manifest_url)
            .await
            .map_err(|e| {
                warn!("Version manifest unavailable: {}", e);
                not_found()
            })?;

        let Some(entry) = manifest.find_version(version_id) else {
            info!("Version {} is not listed in the manifest", version_id);
            return Err(not_found());
        };

        let metadata = VersionMetadata::fetch(&self.client, &entry.url)
            .await
            .map_err(|e| {
                warn!("Metadata for {} unavailable: {}", version_id, e);
                not_found()
            })?;

        match metadata.server_download_url() {
            Some(url) => {
                info!("Resolved server download for {}: {}", version_id, url);
                Ok(url.to_string())
            }
            None => {
                warn!("Version {} does not provide a server download", version_id);
                Err(not_found())
            }
        }
    }
}
