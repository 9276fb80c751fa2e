//! tallyrs - track money, debts and a short note in an encrypted save file.

mod commands;
mod config;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// tallyrs - a personal money tracker with an encrypted save file
#[derive(Parser, Debug)]
#[command(name = "tallyrs", author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the save file (overrides config)
    #[arg(short, long, value_name = "FILE", global = true)]
    save_file: Option<PathBuf>,

    /// Save file password. Prefer TALLYRS_PASSWORD; when neither is given
    /// the password is prompted for without echo
    #[arg(
        short,
        long,
        env = "TALLYRS_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new account
    Init {
        /// Starting balance
        #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
        initial: Option<String>,
        /// Replace an existing save file
        #[arg(long)]
        force: bool,
    },
    /// Show the balance, last transaction, note and records
    Show,
    /// Apply an income, or an expense with --expense
    Transaction {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        expense: bool,
    },
    /// Set the short note; clears it when TEXT is omitted
    Note { text: Option<String> },
    /// Record money borrowed from or lent to someone
    #[command(group(ArgGroup::new("direction").required(true).args(["borrowed", "lent"])))]
    Record {
        name: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// You borrowed the money and now owe them
        #[arg(long)]
        borrowed: bool,
        /// You lent the money and they now owe you
        #[arg(long)]
        lent: bool,
    },
    /// Delete the save file
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Pick up TALLYRS_PASSWORD from a .env file before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging. Logs go to stderr so stdout stays scriptable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tallyrs=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load(args.config)?;

    // Override save path if provided via CLI
    if let Some(save_file) = args.save_file {
        tracing::info!("Overriding save path from CLI: {}", save_file.display());
        config.save_path = save_file;
    }

    tracing::info!("Save path: {}", config.save_path.display());

    let session = commands::Session::new(config, args.password);
    commands::run(&session, args.command)
}
