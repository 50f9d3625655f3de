use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_editor::{ApplyOutcome, Mutation};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::commands::open_workspace;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Document id
    pub id: String,

    /// JSON file with one mutation or a list of them
    pub mutations: PathBuf,

    /// Apply and report without saving
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MutationScript {
    Many(Vec<Mutation>),
    One(Mutation),
}

/// Parse a mutation script: a single mutation object or an array of them
pub fn parse_mutations(source: &str) -> Result<Vec<Mutation>> {
    let script: MutationScript = serde_json::from_str(source)?;
    Ok(match script {
        MutationScript::Many(mutations) => mutations,
        MutationScript::One(mutation) => vec![mutation],
    })
}

pub async fn apply(args: ApplyArgs, config: &Config, cwd: &str) -> Result<()> {
    let source = fs::read_to_string(&args.mutations)
        .with_context(|| format!("Cannot read {}", args.mutations.display()))?;
    let mutations = parse_mutations(&source)?;
    debug!(
        script = %args.mutations.display(),
        count = mutations.len(),
        "Parsed mutation script"
    );

    let config = Config {
        auto_save: config.auto_save && !args.dry_run,
        ..config.clone()
    };
    let mut workspace = open_workspace(&config, cwd).await?;
    workspace.open(&args.id).await?;

    let mut applied = 0;
    for mutation in &mutations {
        match workspace.apply(mutation).await? {
            ApplyOutcome::Applied { effects } => {
                applied += 1;
                info!(
                    document_id = %args.id,
                    mutation = mutation.name(),
                    effects = effects.len(),
                    "Applied"
                );
                println!("  {} {}", "✓".green(), mutation.describe());
            }
            ApplyOutcome::Refused(notice) => {
                warn!(document_id = %args.id, mutation = mutation.name(), "Refused");
                println!("  {} {}", "⚠️".yellow(), notice.message);
            }
            ApplyOutcome::Ignored(reason) => {
                info!(
                    document_id = %args.id,
                    mutation = mutation.name(),
                    %reason,
                    "Ignored stale mutation"
                );
                println!("  {} {} ({})", "-".dimmed(), mutation.describe(), reason);
            }
        }
    }

    let dirty = workspace.session().is_some_and(|s| s.is_dirty());
    if dirty && !args.dry_run {
        workspace.save().await?;
    } else if args.dry_run {
        info!(document_id = %args.id, "Dry run, changes discarded");
    }

    println!();
    println!(
        "{} {} of {} mutations applied{}",
        "✨".green(),
        applied,
        mutations.len(),
        if args.dry_run { " (not saved)" } else { "" }
    );
    Ok(())
}
