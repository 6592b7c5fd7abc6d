use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::{ServerError, ServerResult};

/// Streaming downloader for single large artifacts.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // ── Single file download ────────────────────────────

    /// Stream `url` into `dest`, replacing any existing file.
    ///
    /// The body is written chunk by chunk into a sibling `.part` file which
    /// is renamed over `dest` only once the whole body arrived with a
    /// success status. On failure the previous `dest` is left untouched.
    /// Returns the number of bytes written.
    pub async fn download_file(&self, url: &str, dest: &Path) -> ServerResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ServerError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let partial = partial_path(dest);
        let written = match stream_to_file(response, &partial).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(e) = tokio::fs::remove_file(&partial).await {
                    warn!("Cannot remove partial download {:?}: {}", partial, e);
                }
                return Err(err);
            }
        };

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| ServerError::io(dest, e))?;

        info!("Downloaded {} bytes: {} -> {:?}", written, url, dest);
        Ok(written)
    }
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> ServerResult<u64> {
    // Scoped so the handle is closed before the rename.
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| ServerError::io(path, e))?;

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| ServerError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| ServerError::io(path, e))?;
    debug!("Wrote {} bytes to {:?}", written, path);
    Ok(written)
}

/// `server.jar` -> `server.jar.part`
pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
