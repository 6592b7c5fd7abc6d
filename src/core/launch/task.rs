// ─── Launch Task ───
// Spawns the server JVM with fixed memory flags inside the managed root.

use std::io::PipeReader;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::core::error::{ServerError, ServerResult};
use crate::core::server::ServerLayout;

/// How the server JVM is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub java_path: PathBuf,
    /// Value for `-Xms`, e.g. `2G`.
    pub min_memory: String,
    /// Value for `-Xmx`, e.g. `2G`.
    pub max_memory: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            java_path: PathBuf::from("java"),
            min_memory: "2G".into(),
            max_memory: "2G".into(),
        }
    }
}

impl LaunchConfig {
    /// `-Xmx<max> -Xms<min> -jar <artifact> nogui`
    pub fn jvm_args(&self, artifact: &str) -> Vec<String> {
        vec![
            format!("-Xmx{}", self.max_memory),
            format!("-Xms{}", self.min_memory),
            "-jar".into(),
            artifact.into(),
            "nogui".into(),
        ]
    }
}

pub(crate) struct SpawnedServer {
    pub child: Child,
    /// Read end of the pipe shared by the child's stdout and stderr.
    pub output: PipeReader,
}

/// Spawn the server process. The child gets no stdin, and its stdout and
/// stderr share one pipe so their lines keep the order they were written.
pub(crate) fn spawn_server(
    layout: &ServerLayout,
    config: &LaunchConfig,
) -> ServerResult<SpawnedServer> {
    let (reader, writer) = std::io::pipe()
        .map_err(|e| ServerError::LaunchFailed(format!("cannot create output pipe: {e}")))?;
    let stderr_writer = writer
        .try_clone()
        .map_err(|e| ServerError::LaunchFailed(format!("cannot share output pipe: {e}")))?;

    let mut cmd = Command::new(&config.java_path);
    cmd.args(config.jvm_args(layout.artifact_file_name()))
        .current_dir(layout.root())
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer);
    configure_platform_spawn(&mut cmd);

    info!("Launching Minecraft server with Java: {:?}", config.java_path);
    debug!("Command: {}", command_line(&cmd));

    let child = cmd
        .spawn()
        .map_err(|e| ServerError::LaunchFailed(format!("{:?}: {e}", config.java_path)))?;

    // The command still holds the pipe's write ends; EOF only arrives once
    // the parent's copies are closed.
    drop(cmd);

    Ok(SpawnedServer {
        child,
        output: reader,
    })
}

fn configure_platform_spawn(cmd: &mut Command) {
    #[cfg(target_os = "windows")]
    {
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

/// Program and arguments joined for the debug log; parts containing
/// whitespace are single-quoted.
fn command_line(cmd: &Command) -> String {
    let cmd = cmd.as_std();
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| quote_spaced(&part.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_spaced(part: &str) -> String {
    if part.is_empty() || part.contains(char::is_whitespace) {
        format!("'{part}'")
    } else {
        part.to_string()
    }
}
