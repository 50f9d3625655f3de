use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory documents are stored in
    #[arg(short, long, default_value = ".mailcraft/documents")]
    pub store_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Mailcraft workspace...".bright_blue().bold()
    );

    let config = Config {
        store_dir: args.store_dir.clone(),
        ..Config::default()
    };

    // Create store directory if it doesn't exist
    let store_dir = config.get_store_dir(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), args.store_dir);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    info!(
        config = %config_path.display(),
        store_dir = %store_dir.display(),
        "Initialized workspace"
    );

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: mailcraft new \"My first email\"");
    println!("  2. Run: mailcraft apply <id> edits.json");

    Ok(())
}
