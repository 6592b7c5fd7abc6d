use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mc_server_manager::core::state::load_settings;
use mc_server_manager::{init_tracing, menu, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the server is installed into
    #[arg(long)]
    server_dir: Option<PathBuf>,

    /// Java binary used to run the server
    #[arg(long)]
    java: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = args.server_dir {
        settings.server_dir = dir;
    }
    if let Some(java) = args.java {
        settings.java_path = java;
    }

    tracing::info!("Managing server in {:?}", settings.server_dir);

    let mut state = match AppState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match menu::run(&mut state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
