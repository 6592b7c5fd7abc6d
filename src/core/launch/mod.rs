pub mod output;
pub mod signal;
pub mod supervisor;
pub mod task;

pub use output::{ProcessExit, ServerOutput};
pub use supervisor::{ServerState, ServerStatus, ServerSupervisor, StartOutcome, StopOutcome};
pub use task::LaunchConfig;
