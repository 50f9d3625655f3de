//! Commands that create, list, print and delete stored documents

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_workspace::DocumentStore;
use tracing::debug;

use crate::commands::open_workspace;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Name of the email
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document id
    pub id: String,
}

pub async fn new(args: NewArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut workspace = open_workspace(config, cwd).await?;
    let session = workspace.create(&args.name).await?;

    println!(
        "{} Created {} ({})",
        "✓".green(),
        args.name.bright_white(),
        session.document().id
    );
    Ok(())
}

pub async fn list(config: &Config, cwd: &str) -> Result<()> {
    let workspace = open_workspace(config, cwd).await?;
    let docs = workspace.list().await?;
    debug!(count = docs.len(), "Listed documents");

    if docs.is_empty() {
        println!("No documents yet. Run: mailcraft new <name>");
        return Ok(());
    }

    for doc in &docs {
        println!(
            "{}  {}  {} blocks  {}",
            doc.id.dimmed(),
            doc.name.bright_white(),
            doc.block_count(),
            doc.last_modified.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("   Total: {}", docs.len());
    Ok(())
}

pub async fn show(args: ShowArgs, config: &Config, cwd: &str) -> Result<()> {
    let workspace = open_workspace(config, cwd).await?;
    let doc = workspace
        .store()
        .get_document(&args.id)
        .await?
        .ok_or_else(|| anyhow!("Document not found: {}", args.id))?;

    println!("{}", doc.to_json_pretty()?);
    Ok(())
}

pub async fn delete(args: DeleteArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut workspace = open_workspace(config, cwd).await?;
    workspace.delete(&args.id).await?;

    println!("{} Deleted {}", "✓".green(), args.id);
    Ok(())
}
