// ─── Server Supervisor ───
// Owns the single server process: start, relay output, stop.

use chrono::{DateTime, Utc};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn};

use super::output::{relay_lines, ProcessExit, ServerOutput, OUTPUT_BUFFER_LINES};
use super::signal;
use super::task::{spawn_server, LaunchConfig, SpawnedServer};
use crate::core::config::accept_eula;
use crate::core::error::{ServerError, ServerResult};
use crate::core::server::ServerLayout;

/// Lifecycle state of the supervised server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { pid: u32 },
    /// A live process exists; it was left untouched.
    AlreadyRunning { pid: u32 },
    /// No artifact in the managed directory.
    NotInstalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NoProcess,
}

/// Snapshot of the live process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

struct ServerHandle {
    pid: u32,
    started_at: DateTime<Utc>,
    exit: watch::Receiver<Option<ProcessExit>>,
    /// Stop request for the waiter task, which owns the child.
    stop: Option<oneshot::Sender<()>>,
    output: Option<ServerOutput>,
}

impl ServerHandle {
    fn exit(&self) -> Option<ProcessExit> {
        *self.exit.borrow()
    }
}

/// Supervises at most one server process.
///
/// Not synchronised: callers serialise `start`, `stop` and friends
/// themselves (the menu drives everything from one task).
pub struct ServerSupervisor {
    layout: ServerLayout,
    config: LaunchConfig,
    state: ServerState,
    handle: Option<ServerHandle>,
}

impl ServerSupervisor {
    pub fn new(layout: ServerLayout, config: LaunchConfig) -> Self {
        Self {
            layout,
            config,
            state: ServerState::Stopped,
            handle: None,
        }
    }

    pub fn layout(&self) -> &ServerLayout {
        &self.layout
    }

    pub fn state(&mut self) -> ServerState {
        self.reap_exited();
        self.state
    }

    pub fn status(&mut self) -> Option<ServerStatus> {
        self.reap_exited();
        self.handle.as_ref().map(|h| ServerStatus {
            pid: h.pid,
            started_at: h.started_at,
        })
    }

    /// Launch the server unless one is live or nothing is installed.
    ///
    /// Accepts the EULA, then spawns the JVM in the managed root. A spawn
    /// failure is [`ServerError::LaunchFailed`] and leaves no handle behind.
    pub async fn start(&mut self) -> ServerResult<StartOutcome> {
        self.reap_exited();

        if let Some(handle) = &self.handle {
            info!("Server already running (PID {})", handle.pid);
            return Ok(StartOutcome::AlreadyRunning { pid: handle.pid });
        }

        let artifact = self.layout.artifact_path();
        if tokio::fs::metadata(&artifact).await.is_err() {
            warn!("No server artifact at {:?}; download a version first", artifact);
            return Ok(StartOutcome::NotInstalled);
        }

        self.state = ServerState::Starting;
        match self.launch().await {
            Ok(handle) => {
                let pid = handle.pid;
                self.handle = Some(handle);
                self.state = ServerState::Running;
                info!("Minecraft server running (PID {})", pid);
                Ok(StartOutcome::Started { pid })
            }
            Err(err) => {
                self.state = ServerState::Stopped;
                error!("Cannot start Minecraft server: {}", err);
                Err(err)
            }
        }
    }

    async fn launch(&self) -> ServerResult<ServerHandle> {
        accept_eula(&self.layout)
            .await
            .map_err(|e| ServerError::LaunchFailed(e.to_string()))?;

        let SpawnedServer { mut child, output } = spawn_server(&self.layout, &self.config)?;
        let pid = child.id().ok_or_else(|| {
            ServerError::LaunchFailed("process exited before it could be tracked".into())
        })?;

        let (exit_tx, exit_rx) = watch::channel(None);
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(watch_process(child, pid, stop_rx, exit_tx));

        let (line_tx, line_rx) = mpsc::channel(OUTPUT_BUFFER_LINES);
        tokio::task::spawn_blocking(move || relay_lines(output, line_tx));

        Ok(ServerHandle {
            pid,
            started_at: Utc::now(),
            exit: exit_rx.clone(),
            stop: Some(stop_tx),
            output: Some(ServerOutput::new(line_rx, exit_rx)),
        })
    }

    /// Output of the current launch. Handed out once per launch.
    pub fn take_output(&mut self) -> Option<ServerOutput> {
        self.handle.as_mut().and_then(|h| h.output.take())
    }

    /// Ask the server to terminate and release the handle.
    ///
    /// Does not wait for the process to go away. A process that already
    /// exited on its own still counts as [`StopOutcome::Stopped`].
    pub fn stop(&mut self) -> StopOutcome {
        let Some(mut handle) = self.handle.take() else {
            info!("No server process to stop");
            return StopOutcome::NoProcess;
        };
        self.state = ServerState::Stopped;

        if handle.exit().is_some() {
            info!("Server (PID {}) had already exited", handle.pid);
            return StopOutcome::Stopped;
        }

        info!("Stopping Minecraft server (PID {})...", handle.pid);
        if let Some(stop) = handle.stop.take() {
            // Fails only if the waiter already finished, i.e. the process is gone.
            let _ = stop.send(());
        }
        StopOutcome::Stopped
    }

    /// Release the handle of a process whose exit was already observed.
    fn reap_exited(&mut self) {
        if let Some(handle) = &self.handle {
            if let Some(exit) = handle.exit() {
                info!("Server (PID {}) is gone: {:?}", handle.pid, exit);
                self.handle = None;
                self.state = ServerState::Stopped;
            }
        }
    }
}

/// Waits on the child and publishes its exit. A stop request is turned
/// into a termination signal here, while the child is not yet reaped, so
/// the pid cannot belong to another process.
async fn watch_process(
    mut child: Child,
    pid: u32,
    stop: oneshot::Receiver<()>,
    exit_tx: watch::Sender<Option<ProcessExit>>,
) {
    let waited = tokio::select! {
        waited = child.wait() => waited,
        request = stop => {
            if request.is_ok() {
                if let Err(err) = signal::terminate(pid) {
                    warn!("Cannot signal server (PID {}): {}", pid, err);
                }
            }
            child.wait().await
        }
    };

    let exit = match waited {
        Ok(status) => {
            info!("Minecraft server (PID {}) exited with {}", pid, status);
            ProcessExit::Exited(status)
        }
        Err(err) => {
            error!("Waiting on Minecraft server (PID {}) failed: {}", pid, err);
            ProcessExit::Lost
        }
    };
    exit_tx.send_replace(Some(exit));
}
