use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use tracing::info;

use crate::core::error::{ServerError, ServerResult};

/// Subdirectories created under the managed root.
pub const SERVER_SUBDIRS: [&str; 6] = ["mods", "world", "datapacks", "config", "logs", "backups"];

const ARTIFACT_FILE: &str = "server.jar";
const VERSION_MARKER_FILE: &str = "version.txt";
const EULA_FILE: &str = "eula.txt";
const PROPERTIES_FILE: &str = "server.properties";

/// The managed directory tree the server lives in.
///
/// ```text
/// <root>/
///   server.jar          downloaded artifact
///   version.txt         installed version marker
///   eula.txt            licence acceptance marker
///   server.properties
///   mods/ world/ datapacks/ config/ logs/ backups/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    root: PathBuf,
}

impl ServerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_file_name(&self) -> &'static str {
        ARTIFACT_FILE
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(ARTIFACT_FILE)
    }

    pub fn version_marker_path(&self) -> PathBuf {
        self.root.join(VERSION_MARKER_FILE)
    }

    pub fn eula_path(&self) -> PathBuf {
        self.root.join(EULA_FILE)
    }

    pub fn properties_path(&self) -> PathBuf {
        self.root.join(PROPERTIES_FILE)
    }

    pub fn subdirs(&self) -> Vec<PathBuf> {
        SERVER_SUBDIRS.iter().map(|d| self.root.join(d)).collect()
    }

    /// Create the root and every subdirectory. Safe to call repeatedly.
    pub async fn ensure_structure(&self) -> ServerResult<()> {
        create_dir_safe(&self.root).await?;

        let subdirs = self.subdirs();
        try_join_all(subdirs.iter().map(|dir| create_dir_safe(dir))).await?;

        self.verify_structure().await?;
        info!("Server directory ready at {:?}", self.root);
        Ok(())
    }

    pub async fn verify_structure(&self) -> ServerResult<()> {
        for path in std::iter::once(self.root.clone()).chain(self.subdirs()) {
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|source| ServerError::io(&path, source))?;
            if !metadata.is_dir() {
                return Err(ServerError::Other(format!(
                    "Invalid server layout: {:?} is not a directory",
                    path
                )));
            }
        }

        Ok(())
    }
}

async fn create_dir_safe(path: &Path) -> ServerResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ServerError::io(path, source))
}
