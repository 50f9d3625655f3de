mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, delete, init, list, migrate, new, show, validate, ApplyArgs, DeleteArgs, InitArgs,
    MigrateArgs, NewArgs, ShowArgs, ValidateArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - Email templates as structured documents
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailcraft workspace
    Init(InitArgs),

    /// Create an empty email
    New(NewArgs),

    /// List stored emails, most recent first
    List,

    /// Print an email as JSON
    Show(ShowArgs),

    /// Delete a stored email
    Delete(DeleteArgs),

    /// Convert a legacy document file to the sectioned schema
    Migrate(MigrateArgs),

    /// Apply a mutation script to an email and save it
    Apply(ApplyArgs),

    /// Check an email's structural invariants
    Validate(ValidateArgs),
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()
        .context("Cannot get current directory")?
        .display()
        .to_string();

    let config = Config::load(&cwd)?;
    init_tracing(&config.log_level);

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new(args, &config, &cwd).await,
        Command::List => list(&config, &cwd).await,
        Command::Show(args) => show(args, &config, &cwd).await,
        Command::Delete(args) => delete(args, &config, &cwd).await,
        Command::Migrate(args) => migrate(args, &cwd),
        Command::Apply(args) => apply(args, &config, &cwd).await,
        Command::Validate(args) => validate(args, &config, &cwd).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
