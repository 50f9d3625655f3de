use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_document::{is_legacy, migrate_str};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Document JSON file in any supported schema
    pub input: PathBuf,

    /// Write the migrated document here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn migrate(args: MigrateArgs, _cwd: &str) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let legacy = is_legacy(&serde_json::from_str(&source)?);
    let doc = migrate_str(&source)?;
    let json = doc.to_json_pretty()?;
    info!(
        input = %args.input.display(),
        document_id = %doc.id,
        legacy,
        "Migrated document"
    );

    match &args.out {
        Some(out) => {
            fs::write(out, json)?;
            let status = if legacy { "Migrated" } else { "Already current" };
            eprintln!(
                "{} {} {} → {}",
                "✓".green(),
                status,
                args.input.display(),
                out.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
