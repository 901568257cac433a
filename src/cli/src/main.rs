//! Scenario runner for the transfer-and-notify ledger.

use anyhow::Result;
use cli::commands::{init, run, supports, tokens};
use colored::Colorize;
use ledger::{LedgerConfig, TokenInfo};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the scenario runner.
#[derive(Debug, StructOpt)]
#[structopt(name = "volt-notify", about = "Transfer-and-notify ledger scenario runner")]
struct Opt {
    /// Path to a ledger configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the scenario runner.
#[derive(Debug, StructOpt)]
enum Command {
    /// Run a scenario file
    #[structopt(name = "run")]
    Run {
        /// Scenario file
        #[structopt(short, long, parse(from_os_str))]
        scenario: PathBuf,
    },

    /// Check whether the ledger supports an interface
    #[structopt(name = "supports")]
    Supports {
        /// 4-byte interface id in hex
        #[structopt(short, long)]
        interface: String,
    },

    /// Print the confirmation tokens and interface ids
    #[structopt(name = "tokens")]
    Tokens,

    /// Write a sample scenario
    #[structopt(name = "init")]
    Init {
        /// Output file
        #[structopt(short, long, parse(from_os_str), default_value = "scenario.json")]
        output: PathBuf,

        /// Token metadata as SYMBOL|Name|decimals
        #[structopt(short, long)]
        token: Option<TokenInfo>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    match opt.cmd {
        Command::Run { scenario } => {
            let report = run::run(&scenario, opt.config.as_deref())?;
            println!(
                "{} {} steps",
                "Scenario passed:".green(),
                report.steps.len()
            );
        }
        Command::Supports { interface } => {
            let config = match &opt.config {
                Some(path) => LedgerConfig::from_file(path)?,
                None => LedgerConfig::default(),
            };
            let (id, supported) = supports::run(&config, &interface)?;
            if supported {
                println!("{} 0x{}", "Supported:".green(), hex::encode(id));
            } else {
                println!("{} 0x{}", "Not supported:".red(), hex::encode(id));
            }
        }
        Command::Tokens => {
            for (name, id) in tokens::run() {
                println!("{:<24} 0x{}", format!("{}:", name).green(), hex::encode(id));
            }
        }
        Command::Init { output, token } => {
            init::run(&output, token)?;
            println!("{} {}", "Scenario written:".green(), output.display());
        }
    }

    Ok(())
}
