//! Bump command.

use anyhow::{Context, Result};
use changebump_core::ReleaseManager;
use changebump_git::Repository;
use clap::Args;
use tracing::{debug, info};

use super::BUMP_TYPE_ENV;

/// Arguments for the bump command.
#[derive(Debug, Args)]
pub struct BumpArgs {
    /// Perform a dry run without making changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Override the bump type (major, minor, patch)
    #[arg(short = 't', long, env = BUMP_TYPE_ENV)]
    pub bump_type: Option<String>,
}

/// Runs the bump command.
pub fn run(args: &BumpArgs) -> Result<()> {
    let (root, config) = super::load_config()?;

    // Tags are only a fallback for the current version.
    let repo = match Repository::discover() {
        Ok(repo) => Some(repo),
        Err(e) => {
            debug!(error = %e, "no git repository, ignoring tags");
            None
        }
    };

    let manager = ReleaseManager::new(root, config);
    let plan = manager
        .plan(repo.as_ref(), args.bump_type.as_deref())
        .context("failed to plan version bump")?;

    if manager.version_files().is_empty() {
        println!(
            "No version files configured. Would bump {} -> {}",
            plan.previous, plan.next
        );
        return Ok(());
    }

    let updated = manager
        .apply_version(&plan.next, args.dry_run)
        .context("failed to update version files")?;

    for file in &updated {
        let file = file.strip_prefix(manager.root()).unwrap_or(file);
        if args.dry_run {
            println!("Would update {} to version {}", file.display(), plan.next);
        } else {
            println!("Updated {} to version {}", file.display(), plan.next);
        }
    }

    if args.dry_run {
        println!(
            "\nDry run: would bump version {} -> {} ({})",
            plan.previous,
            plan.next,
            plan.bump()
        );
    } else {
        info!(version = %plan.next, "version bumped");
        println!(
            "\nBumped version {} -> {} ({}, {} file(s) updated)",
            plan.previous,
            plan.next,
            plan.bump(),
            updated.len()
        );
    }

    Ok(())
}
