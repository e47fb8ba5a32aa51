//! Configuration management for changebump.
//!
//! This crate handles loading and validating the `changebump.toml` configuration file.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_config_file, load_config, load_project_config};
pub use schema::{ChangelogConfig, Config, StepsConfig, VersionConfig};
