pub mod manifest;
pub mod resolver;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest};
pub use resolver::ManifestResolver;
pub use version_file::{DownloadArtifact, VersionDownloads, VersionMetadata};
