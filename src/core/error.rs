use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the server manager.
/// Every module returns `Result<T, ServerError>`.
///
/// Precondition outcomes (already running, nothing installed, no process)
/// are not errors; they are reported through the outcome enums of the
/// modules that produce them.
#[derive(Debug, Error)]
pub enum ServerError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No server download found for version {0}")]
    NotFound(String),

    #[error("Request to {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Download of version {version} failed: {reason}")]
    DownloadFailed { version: String, reason: String },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Process ─────────────────────────────────────────
    #[error("Failed to launch server process: {0}")]
    LaunchFailed(String),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ServerError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(source: std::io::Error) -> Self {
        ServerError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
