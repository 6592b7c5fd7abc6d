// ─── Operator Menu ───
// Numbered menus on stdin/stdout driving install, configuration and the
// server lifecycle.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::core::config::{write_difficulty, Difficulty};
use crate::core::error::{ServerError, ServerResult};
use crate::core::launch::{StartOutcome, StopOutcome};
use crate::core::state::AppState;

const RULE: &str = "============================================";

/// Where to go after a menu returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one trimmed line. `None` on end of input.
    async fn ask(&mut self, question: &str) -> ServerResult<Option<String>> {
        print!("{question}");
        std::io::stdout().flush()?;
        self.next_line().await
    }

    async fn next_line(&mut self) -> ServerResult<Option<String>> {
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

fn header(title: &str) {
    println!("\n{RULE}");
    println!(" {title}");
    println!("{RULE}");
}

/// Run the menus until the operator exits. A server still running at that
/// point is stopped.
pub async fn run(state: &mut AppState) -> ServerResult<()> {
    let mut prompt = Prompt::new();
    let result = initial_menu(state, &mut prompt).await;

    if state.supervisor.stop() == StopOutcome::Stopped {
        println!("Server stopped.");
    }
    println!("Exiting...");
    result
}

async fn initial_menu(state: &mut AppState, prompt: &mut Prompt) -> ServerResult<()> {
    loop {
        header("Initial Server Setup");

        let installed = state.installed_version().await;
        let flow = if installed.is_installed() {
            println!("An installed server was detected. Version: {installed}.");
            println!("1. Go to general configuration");
            println!("2. Download a new version");
            println!("3. Exit");
            println!("{RULE}");
            let Some(choice) = prompt.ask("Select an option (1-3): ").await? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => configuration_menu(state, prompt).await?,
                "2" => match select_version(state, prompt).await? {
                    Some(Flow::Exit) => Flow::Exit,
                    Some(Flow::Back) => Flow::Back,
                    None => configuration_menu(state, prompt).await?,
                },
                "3" => Flow::Exit,
                _ => {
                    println!("Invalid option. Try again.");
                    Flow::Back
                }
            }
        } else {
            println!("1. Select Minecraft version");
            println!("2. Exit");
            println!("{RULE}");
            let Some(choice) = prompt.ask("Select an option (1-2): ").await? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => match select_version(state, prompt).await? {
                    Some(Flow::Exit) => Flow::Exit,
                    Some(Flow::Back) => Flow::Back,
                    None => configuration_menu(state, prompt).await?,
                },
                "2" => Flow::Exit,
                _ => {
                    println!("Invalid option. Try again.");
                    Flow::Back
                }
            }
        };

        if flow == Flow::Exit {
            return Ok(());
        }
    }
}

/// Ask for a version and install it. `None` means it was installed.
async fn select_version(state: &mut AppState, prompt: &mut Prompt) -> ServerResult<Option<Flow>> {
    header("Minecraft Version");
    println!("Example: 1.20.1 (leave empty to go back)");
    let Some(version) = prompt.ask("Enter the Minecraft version: ").await? else {
        return Ok(Some(Flow::Exit));
    };
    if version.is_empty() {
        return Ok(Some(Flow::Back));
    }

    println!("Preparing server for version {version}...");
    match state.installer.install_version(&version).await {
        Ok(()) => {
            println!("Download complete.");
            Ok(None)
        }
        Err(ServerError::DownloadFailed { reason, .. }) => {
            println!("Could not install version {version}: {reason}");
            Ok(Some(Flow::Back))
        }
        Err(e) => Err(e),
    }
}

async fn configuration_menu(state: &mut AppState, prompt: &mut Prompt) -> ServerResult<Flow> {
    loop {
        header("General Server Configuration");
        if let Some(status) = state.supervisor.status() {
            println!(
                "Server running (PID {}) since {}",
                status.pid,
                status.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        println!("1. Configure difficulty");
        println!("2. Show public IP");
        println!("3. Start server");
        println!("4. Stop server");
        println!("5. Back to initial setup");
        println!("6. Exit");
        println!("{RULE}");
        let Some(choice) = prompt.ask("Select an option (1-6): ").await? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                if difficulty_menu(state, prompt).await? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
            }
            "2" => {
                let ip = state.public_ip.public_ip().await;
                println!("\n{RULE}");
                println!("Server IP: {ip}");
                println!("{RULE}");
            }
            "3" => start_server(state, prompt).await?,
            "4" => match state.supervisor.stop() {
                StopOutcome::Stopped => println!("Server stopped."),
                StopOutcome::NoProcess => println!("No server is running."),
            },
            "5" => return Ok(Flow::Back),
            "6" => return Ok(Flow::Exit),
            _ => println!("Invalid option. Try again."),
        }
    }
}

async fn difficulty_menu(state: &mut AppState, prompt: &mut Prompt) -> ServerResult<Flow> {
    header("Select difficulty");
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, difficulty);
    }
    println!("5. Back to general configuration");
    println!("6. Exit");
    println!("{RULE}");
    let Some(choice) = prompt.ask("Select an option (1-6): ").await? else {
        return Ok(Flow::Exit);
    };

    let difficulty = match choice.as_str() {
        "5" => return Ok(Flow::Back),
        "6" => return Ok(Flow::Exit),
        other => Difficulty::from_choice(other).unwrap_or_else(|| {
            println!("Invalid option. Using 'normal'.");
            Difficulty::Normal
        }),
    };

    write_difficulty(&state.layout, difficulty).await?;
    println!("Difficulty set to {difficulty}.");
    Ok(Flow::Back)
}

/// Start the server and relay its log until it exits. Typing `stop`
/// requests shutdown; the relay keeps going until the process is gone.
async fn start_server(state: &mut AppState, prompt: &mut Prompt) -> ServerResult<()> {
    println!("Starting the Minecraft server...");
    match state.supervisor.start().await {
        Ok(StartOutcome::Started { pid }) => println!("Server started (PID {pid})."),
        Ok(StartOutcome::AlreadyRunning { pid }) => {
            println!("The server is already running (PID {pid}).");
            return Ok(());
        }
        Ok(StartOutcome::NotInstalled) => {
            println!("No server has been downloaded. Select a version first.");
            return Ok(());
        }
        Err(e @ ServerError::LaunchFailed(_)) => {
            println!("Error starting the server: {e}");
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    let Some(mut output) = state.supervisor.take_output() else {
        return Ok(());
    };

    println!("\n=== Server log (type 'stop' to stop the server) ===");
    let mut input_open = true;
    loop {
        tokio::select! {
            line = output.next_line() => match line {
                Some(line) => println!("{line}"),
                None => break,
            },
            command = prompt.next_line(), if input_open => match command? {
                Some(command) if command.eq_ignore_ascii_case("stop") => {
                    if state.supervisor.stop() == StopOutcome::Stopped {
                        println!("Stopping the server...");
                    }
                }
                Some(command) => debug!("Ignoring console input {:?}", command),
                None => {
                    input_open = false;
                    state.supervisor.stop();
                }
            },
        }
    }
    println!("=== End of log ===");

    if let Some(exit) = output.exit() {
        debug!("Server exit: {:?}", exit);
    }
    Ok(())
}
