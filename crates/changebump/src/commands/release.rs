//! Release command.

use anyhow::{Context, Result};
use changebump_core::{ReleaseManager, ReleaseOptions};
use changebump_git::Repository;
use clap::Args;
use tracing::info;

use super::BUMP_TYPE_ENV;

/// Arguments for the release command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReleaseArgs {
    /// Perform a dry run without making changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Override the bump type (major, minor, patch)
    #[arg(short = 't', long, env = BUMP_TYPE_ENV)]
    pub bump_type: Option<String>,

    /// Skip the test step
    #[arg(long)]
    pub skip_tests: bool,

    /// Skip git commit
    #[arg(long)]
    pub no_commit: bool,

    /// Skip git tag creation
    #[arg(long)]
    pub no_tag: bool,

    /// Skip the publish and docs steps
    #[arg(long)]
    pub no_publish: bool,
}

impl From<ReleaseArgs> for ReleaseOptions {
    fn from(args: ReleaseArgs) -> Self {
        Self {
            dry_run: args.dry_run,
            bump_override: args.bump_type,
            skip_tests: args.skip_tests,
            no_commit: args.no_commit,
            no_tag: args.no_tag,
            no_publish: args.no_publish,
        }
    }
}

/// Runs the release command.
pub fn run(args: ReleaseArgs) -> Result<()> {
    let repo = Repository::discover().context("failed to open git repository")?;
    let (root, config) = super::load_config()?;
    let tag_prefix = config.version.tag_prefix.clone();

    let options = ReleaseOptions::from(args);
    let manager = ReleaseManager::new(root, config);

    info!(root = %manager.root().display(), repo = %repo.path().display(), "starting release");
    let plan = manager.release(&repo, &options)?;

    println!(
        "Version: {} -> {} ({})",
        plan.previous,
        plan.next,
        plan.bump()
    );
    if let Some(note) = plan.resolution.disagreement() {
        println!("Note: {note}");
    }

    if options.dry_run {
        println!("\nDry run completed. No changes were made.");
    } else {
        println!("\nRelease {} completed successfully!", plan.next);
        if !options.no_tag {
            println!("  Tagged {tag_prefix}{}", plan.next);
        }
        println!("\nNext steps:");
        match repo.current_branch() {
            Some(branch) => println!("  git push origin {branch} --follow-tags"),
            None => println!("  git push --follow-tags"),
        }
    }

    Ok(())
}
