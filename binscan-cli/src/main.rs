//! BinScan CLI
//!
//! Browse registered e-waste bins, scan items for credits, and manage the
//! bin registry from the command line.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::admin::AdminCommands;
use commands::bins::BinsCommands;
use commands::config::ConfigCommands;
use commands::scan::ScanArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "binscan", version = binscan::VERSION, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse registered bins
    Bins {
        #[command(subcommand)]
        command: BinsCommands,
    },

    /// Photograph an item at a nearby bin and claim credits
    Scan(ScanArgs),

    /// Create, update or delete bins (requires an admin token)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// View or change settings in ~/.binscan/config.ini
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let log_level = cli.log_level.as_deref();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Bins { command } => {
            let runner = CliRunner::new(log_level)?;
            commands::bins::run(&runner, command).await
        }
        Commands::Scan(args) => {
            let runner = CliRunner::new(log_level)?;
            commands::scan::run(&runner, args).await
        }
        Commands::Admin { command } => {
            let runner = CliRunner::new(log_level)?;
            commands::admin::run(&runner, command).await
        }
    }
}
