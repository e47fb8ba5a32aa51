//! Initialize command.

use std::fs;

use anyhow::{Context, Result, bail};
use changebump_config::{CONFIG_FILE_NAME, Config, StepsConfig};
use clap::Args;
use tracing::info;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Configuration written by `init`, set up for an npm package.
fn starter_config() -> Config {
    Config {
        steps: StepsConfig {
            test: vec!["npm test".to_string()],
            build: vec!["npm run build".to_string()],
            publish: vec!["npm publish".to_string()],
            docs: Vec::new(),
        },
        ..Config::default()
    }
}

/// Runs the init command.
pub fn run(args: &InitArgs) -> Result<()> {
    let path = std::env::current_dir()
        .context("failed to read current directory")?
        .join(CONFIG_FILE_NAME);

    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = starter_config();
    let content = toml::to_string_pretty(&config).context("failed to serialize configuration")?;
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote configuration");

    println!("Created {CONFIG_FILE_NAME}");
    for (step, commands) in config.steps.iter() {
        if commands.is_empty() {
            println!("  {step}: (none)");
        } else {
            println!("  {step}: {}", commands.join(" && "));
        }
    }

    Ok(())
}
