use tracing::{info, warn};

use super::ServerLayout;
use crate::core::downloader::Downloader;
use crate::core::error::{ServerError, ServerResult};
use crate::core::version::ManifestResolver;

/// Downloads a server artifact into the managed directory and records
/// which version it is.
pub struct ArtifactInstaller {
    resolver: ManifestResolver,
    downloader: Downloader,
    layout: ServerLayout,
}

impl ArtifactInstaller {
    pub fn new(resolver: ManifestResolver, downloader: Downloader, layout: ServerLayout) -> Self {
        Self {
            resolver,
            downloader,
            layout,
        }
    }

    pub fn layout(&self) -> &ServerLayout {
        &self.layout
    }

    /// Resolve, download and mark `version_id` as installed.
    ///
    /// Every failure is reported as [`ServerError::DownloadFailed`]. When
    /// the version cannot be resolved nothing is written to disk. The
    /// version marker is only written after the artifact is in place.
    pub async fn install_version(&self, version_id: &str) -> ServerResult<()> {
        let url = self
            .resolver
            .resolve_download_url(version_id)
            .await
            .map_err(|e| download_failed(version_id, e))?;

        self.layout
            .ensure_structure()
            .await
            .map_err(|e| download_failed(version_id, e))?;

        info!("Downloading server {}...", version_id);
        let artifact = self.layout.artifact_path();
        self.downloader
            .download_file(&url, &artifact)
            .await
            .map_err(|e| download_failed(version_id, e))?;

        let marker = self.layout.version_marker_path();
        tokio::fs::write(&marker, version_id)
            .await
            .map_err(|e| download_failed(version_id, ServerError::io(&marker, e)))?;

        info!("Server {} installed at {:?}", version_id, self.layout.root());
        Ok(())
    }
}

fn download_failed(version_id: &str, cause: ServerError) -> ServerError {
    warn!("Install of {} failed: {}", version_id, cause);
    ServerError::DownloadFailed {
        version: version_id.to_string(),
        reason: cause.to_string(),
    }
}
