//! Scripted driver for the Waypoint history controller
//!
//! Runs a sequence of stack operations and user gestures against an
//! in-memory navigation log and prints the stack after every step.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use waypoint_core::HistoryConfig;

mod script;

use script::{Session, Step};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Waypoint - application stacks kept in the navigation log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script of steps against a fresh navigation log
    ///
    /// Steps: push, push=<word>, pop, drop, back, forward, show
    Run {
        /// Steps to run, in order
        #[arg(required = true)]
        steps: Vec<Step>,

        /// Seed for the random words pushed by a bare `push`
        #[arg(long)]
        seed: Option<u64>,

        /// Print the whole navigation log after the last step
        #[arg(long)]
        dump_log: bool,
    },

    /// Print the effective configuration
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<HistoryConfig> {
    let mut config = match path {
        Some(path) => HistoryConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HistoryConfig::default(),
    };
    config
        .merge_with_env()
        .context("applying WAYPOINT_* overrides")?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run {
            steps,
            seed,
            dump_log,
        } => {
            let mut session = Session::new(config, seed)?;
            for step in &steps {
                let line = session.run_step(step).await;
                println!("{line}");
            }
            if dump_log {
                for line in session.describe_log() {
                    println!("{line}");
                }
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
