//! taskscan — scan an email batch for completed deal tasks.
//!
//! Usage:
//!   taskscan scan --emails emails.json --tasks tasks.json [--min-confidence 60]
//!   taskscan validate --signal signal.json
//!
//! Results go to stdout as JSON; logs go to stderr (RUST_LOG overrides the
//! default `info` level).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use taskscan_lib::error::{DetectionError, ErrorReport};
use taskscan_lib::json_loader::{load_emails_json, load_signals_json, load_tasks_json};
use taskscan_lib::services::completions::CompletionService;
use taskscan_lib::state::{load_config, load_config_from};
use taskscan_lib::types::{DetectionConfig, ValidationResult};

#[derive(Debug, Parser)]
#[command(name = "taskscan", version, about = "Detect completed deal tasks from email")]
struct Cli {
    /// Config file (defaults to ~/.taskscan/config.json)
    #[arg(long, global = true, env = "TASKSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan emails against open tasks and print bucketed suggestions
    Scan {
        #[arg(long)]
        emails: PathBuf,
        #[arg(long)]
        tasks: PathBuf,
        /// Hide suggestions below this confidence
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_confidence: Option<u8>,
    },
    /// Check one or more signals before acting on them
    Validate {
        #[arg(long)]
        signal: PathBuf,
    },
}

fn resolve_config(path: Option<&Path>) -> Result<DetectionConfig, DetectionError> {
    match path {
        Some(p) => load_config_from(p),
        None => load_config(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize output: {}", e),
    }
}

async fn run(cli: Cli) -> Result<(), DetectionError> {
    let config = resolve_config(cli.config.as_deref())?;
    let service = CompletionService::new(config);

    match cli.command {
        Command::Scan {
            emails,
            tasks,
            min_confidence,
        } => {
            let emails = load_emails_json(&emails)?;
            let tasks = load_tasks_json(&tasks)?;
            let suggestions = service.scan(&emails, &tasks, min_confidence).await;
            print_json(&suggestions);
        }
        Command::Validate { signal } => {
            let signals = load_signals_json(&signal)?;
            let results: Vec<ValidationResult> = signals
                .iter()
                .map(|s| service.detector().validate_signal(s))
                .collect();
            if let [single] = results.as_slice() {
                print_json(single);
            } else {
                print_json(&results);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            match serde_json::to_string_pretty(&ErrorReport::from(&e)) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}
