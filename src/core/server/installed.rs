use std::fmt;

use tracing::debug;

use super::ServerLayout;

/// What the managed directory says about the installed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstalledVersion {
    /// No artifact on disk.
    Absent,
    /// Artifact present but the version marker is missing or unreadable.
    Unknown,
    Version(String),
}

impl InstalledVersion {
    pub fn is_installed(&self) -> bool {
        !matches!(self, InstalledVersion::Absent)
    }
}

impl fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstalledVersion::Absent => write!(f, "not installed"),
            InstalledVersion::Unknown => write!(f, "unknown"),
            InstalledVersion::Version(v) => write!(f, "{v}"),
        }
    }
}

/// Inspect the managed directory without touching the network.
///
/// A missing or unreadable marker next to an existing artifact degrades
/// to [`InstalledVersion::Unknown`]; this never fails.
pub async fn detect_installed(layout: &ServerLayout) -> InstalledVersion {
    let artifact = layout.artifact_path();
    if tokio::fs::metadata(&artifact).await.is_err() {
        return InstalledVersion::Absent;
    }

    let marker = layout.version_marker_path();
    match tokio::fs::read_to_string(&marker).await {
        Ok(raw) => InstalledVersion::Version(raw.trim().to_string()),
        Err(e) => {
            debug!("Version marker {:?} unreadable: {}", marker, e);
            InstalledVersion::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_without_artifact_even_with_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(tmp.path());
        std::fs::write(layout.version_marker_path(), "1.20.1").unwrap();

        assert_eq!(detect_installed(&layout).await, InstalledVersion::Absent);
    }

    #[tokio::test]
    async fn unknown_when_marker_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(tmp.path());
        std::fs::write(layout.artifact_path(), b"jar").unwrap();

        let installed = detect_installed(&layout).await;
        assert_eq!(installed, InstalledVersion::Unknown);
        assert_eq!(installed.to_string(), "unknown");
        assert!(installed.is_installed());
    }

    #[tokio::test]
    async fn marker_contents_are_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(tmp.path());
        std::fs::write(layout.artifact_path(), b"jar").unwrap();
        std::fs::write(layout.version_marker_path(), "  1.20.1\n").unwrap();

        assert_eq!(
            detect_installed(&layout).await,
            InstalledVersion::Version("1.20.1".into())
        );
    }

    #[tokio::test]
    async fn blank_marker_is_reported_as_is() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(tmp.path());
        std::fs::write(layout.artifact_path(), b"jar").unwrap();
        std::fs::write(layout.version_marker_path(), "  \n").unwrap();

        assert_eq!(
            detect_installed(&layout).await,
            InstalledVersion::Version(String::new())
        );
    }

    #[tokio::test]
    async fn unreadable_marker_is_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(tmp.path());
        std::fs::write(layout.artifact_path(), b"jar").unwrap();
        // A directory cannot be read as a string.
        std::fs::create_dir(layout.version_marker_path()).unwrap();

        assert_eq!(detect_installed(&layout).await, InstalledVersion::Unknown);
    }
}
