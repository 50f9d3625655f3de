use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_common::validate as validate_document;
use mailcraft_workspace::DocumentStore;

use crate::commands::open_workspace;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document id
    pub id: String,
}

pub async fn validate(args: ValidateArgs, config: &Config, cwd: &str) -> Result<()> {
    let workspace = open_workspace(config, cwd).await?;
    let doc = workspace
        .store()
        .get_document(&args.id)
        .await?
        .ok_or_else(|| anyhow!("Document not found: {}", args.id))?;

    let violations = validate_document(&doc);
    if violations.is_empty() {
        println!("{} {} is valid", "✓".green(), doc.name.bright_white());
        return Ok(());
    }

    println!("{}", doc.name.bright_white());
    for violation in &violations {
        println!("  {} {}", "error".red().bold(), violation);
    }
    println!();

    Err(anyhow!("{} violation(s) found", violations.len()))
}
