use reqwest::Client;

use super::ManagerSettings;
use crate::core::downloader::Downloader;
use crate::core::error::ServerResult;
use crate::core::http::build_http_client;
use crate::core::launch::ServerSupervisor;
use crate::core::net::PublicIpLookup;
use crate::core::server::{detect_installed, ArtifactInstaller, InstalledVersion, ServerLayout};
use crate::core::version::ManifestResolver;

/// Everything the operator menu drives, wired from one set of settings.
pub struct AppState {
    pub settings: ManagerSettings,
    pub layout: ServerLayout,
    pub http_client: Client,
    pub installer: ArtifactInstaller,
    pub supervisor: ServerSupervisor,
    pub public_ip: PublicIpLookup,
}

impl AppState {
    pub fn new(settings: ManagerSettings) -> ServerResult<Self> {
        let http_client = build_http_client()?;
        let layout = ServerLayout::new(settings.server_dir.clone());

        let resolver = ManifestResolver::new(http_client.clone(), settings.manifest_url.clone());
        let downloader = Downloader::new(http_client.clone());
        let installer = ArtifactInstaller::new(resolver, downloader, layout.clone());
        let supervisor = ServerSupervisor::new(layout.clone(), settings.launch_config());
        let public_ip = PublicIpLookup::new(http_client.clone(), settings.public_ip_url.clone());

        Ok(Self {
            settings,
            layout,
            http_client,
            installer,
            supervisor,
            public_ip,
        })
    }

    pub async fn installed_version(&self) -> InstalledVersion {
        detect_installed(&self.layout).await
    }
}
