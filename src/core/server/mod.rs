pub mod installed;
pub mod installer;
pub mod layout;

pub use installed::{detect_installed, InstalledVersion};
pub use installer::ArtifactInstaller;
pub use layout::{ServerLayout, SERVER_SUBDIRS};
