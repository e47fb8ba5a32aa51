//! Subcommand implementations.

pub mod bump;
pub mod classify;
pub mod init;
pub mod release;

use std::path::PathBuf;

use anyhow::{Context, Result};
use changebump_config::{Config, load_project_config};

/// Environment variable that can supply the bump type override.
pub const BUMP_TYPE_ENV: &str = "RELEASE_TYPE";

/// Loads configuration from the current directory or its parents.
///
/// Returns the project root the configured paths are relative to.
pub(crate) fn load_config() -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    load_project_config(&cwd).context("failed to load configuration")
}
