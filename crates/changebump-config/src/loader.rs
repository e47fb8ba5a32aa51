//! Configuration loader.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "changebump.toml";

/// Loads and validates configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

/// Loads the project configuration, falling back to defaults when no file exists.
///
/// Returns the project root along with the configuration: the directory
/// holding the configuration file, or `start_dir` when there is none.
///
/// # Errors
///
/// Returns an error if a configuration file exists but cannot be parsed.
pub fn load_project_config(start_dir: impl AsRef<Path>) -> ConfigResult<(PathBuf, Config)> {
    let start_dir = start_dir.as_ref();

    let Some(path) = find_config_file(start_dir) else {
        debug!(?start_dir, "no configuration file, using defaults");
        return Ok((start_dir.to_path_buf(), Config::default()));
    };

    let config = load_config(&path)?;
    let root = path
        .parent()
        .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
    Ok((root, config))
}

/// Returns the nearest configuration file at or above `start_dir`.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.exists())
}
