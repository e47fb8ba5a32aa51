//! Classify command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use changebump_core::{ReleaseManager, classify, resolve};
use clap::Args;
use tracing::debug;

use super::BUMP_TYPE_ENV;

/// Arguments for the classify command.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Changelog to classify (defaults to the configured changelog)
    #[arg(short, long)]
    pub changelog: Option<PathBuf>,

    /// Override the bump type (major, minor, patch)
    #[arg(short = 't', long, env = BUMP_TYPE_ENV)]
    pub bump_type: Option<String>,

    /// Also print the unreleased changes block
    #[arg(long)]
    pub show_block: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the classify command.
pub fn run(args: &ClassifyArgs) -> Result<()> {
    let path = match &args.changelog {
        Some(path) => path.clone(),
        None => {
            let (root, config) = super::load_config()?;
            ReleaseManager::new(root, config).changelog_path()
        }
    };
    debug!(path = %path.display(), "classifying changelog");

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read changelog {}", path.display()))?;

    let classification = classify(&text)?;
    let resolution = resolve(&classification, args.bump_type.as_deref())?;

    if args.json {
        let output = serde_json::json!({
            "bump": resolution.bump,
            "recommended": resolution.recommended,
            "overridden": resolution.overridden,
            "unreleased": classification.unreleased,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", resolution.bump);

    if args.show_block {
        println!();
        println!("{}", classification.unreleased.trim_end());
    }

    Ok(())
}
