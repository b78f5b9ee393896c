//! Tabshell replay driver.
//!
//! Reads newline-delimited JSON actions (one `{"actionType": ...}` object per
//! line), folds them through a [`Shell`] backed by an in-memory host and prints
//! the resulting state as JSON on stdout. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use tabshell::host::MemoryHost;
use tabshell::logging;
use tabshell::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabshell::shell::Shell;
use tabshell::types::errors::ReplayError;
use tabshell::types::tab::WindowId;

#[derive(Parser, Debug)]
#[command(name = "tabshell-replay", version, about = "Replay tab actions and print the resulting state")]
struct Args {
    /// Action stream to read; stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Settings file; the platform config path when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Window reported as focused by the simulated window manager.
    #[arg(long, allow_hyphen_values = true)]
    active_window: Option<i32>,

    /// Pretty-print the final state.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "replay failed");
            eprintln!("tabshell-replay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ReplayError> {
    let mut engine = SettingsEngine::new(args.settings);
    let settings = engine.load()?;
    info!(config = %engine.get_config_path().display(), "starting replay");

    let mut host = MemoryHost::new();
    if let Some(window_id) = args.active_window {
        host = host.with_active_window(WindowId(window_id));
    }
    let mut shell = Shell::new(settings, host);

    match args.input {
        Some(path) => shell.replay(BufReader::new(File::open(path)?))?,
        None => shell.replay(io::stdin().lock())?,
    };

    let state = shell.state().as_ref();
    let json = if args.pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    }?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}
