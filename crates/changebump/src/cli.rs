//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Classify changelog entries into semantic version bumps and cut releases.
#[derive(Debug, Parser)]
#[command(name = "changebump")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default changebump.toml
    Init(commands::init::InitArgs),

    /// Print the bump the changelog calls for
    Classify(commands::classify::ClassifyArgs),

    /// Bump the version files based on the changelog
    Bump(commands::bump::BumpArgs),

    /// Run the full release (test, build, bump, commit, tag, publish)
    Release(commands::release::ReleaseArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args) => commands::init::run(&args),
            Commands::Classify(args) => commands::classify::run(&args),
            Commands::Bump(args) => commands::bump::run(&args),
            Commands::Release(args) => commands::release::run(args),
        }
    }
}
