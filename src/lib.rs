pub mod core;
pub mod menu;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{ServerError, ServerResult};
pub use crate::core::launch::{ServerSupervisor, StartOutcome, StopOutcome};
pub use crate::core::server::{ArtifactInstaller, InstalledVersion, ServerLayout};
pub use crate::core::state::{AppState, ManagerSettings};
pub use crate::core::version::ManifestResolver;

/// Structured logging to stderr. `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,mc_server_manager=debug"
    } else {
        "warn,mc_server_manager=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
