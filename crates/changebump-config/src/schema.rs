//! Configuration schema.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Changelog configuration.
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// Version configuration.
    #[serde(default)]
    pub version: VersionConfig,

    /// Shell commands run at each release step.
    #[serde(default)]
    pub steps: StepsConfig,
}

impl Config {
    /// Checks values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.changelog.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "changelog.path must not be empty".to_string(),
            ));
        }

        if let Some(file) = self.version.files.iter().find(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "version.files contains an empty entry: {file:?}"
            )));
        }

        for (step, commands) in self.steps.iter() {
            if commands.iter().any(|c| c.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "steps.{step} contains an empty command"
                )));
            }
        }

        Ok(())
    }
}

/// Changelog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Path of the changelog, relative to the repository root.
    #[serde(default = "default_changelog_path")]
    pub path: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            path: default_changelog_path(),
        }
    }
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

/// Version configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Files containing version information.
    #[serde(default = "default_version_files")]
    pub files: Vec<String>,

    /// Tag prefix (e.g., "v").
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            files: default_version_files(),
            tag_prefix: default_tag_prefix(),
        }
    }
}

fn default_version_files() -> Vec<String> {
    vec!["package.json".to_string()]
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Release step commands.
///
/// Each command runs through `sh -c` from the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepsConfig {
    /// Commands run before anything is changed.
    #[serde(default)]
    pub test: Vec<String>,

    /// Commands that build the package.
    #[serde(default)]
    pub build: Vec<String>,

    /// Commands run after tagging to publish the package.
    #[serde(default)]
    pub publish: Vec<String>,

    /// Commands run last, e.g. to sync documentation.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl StepsConfig {
    /// Iterates over `(step name, commands)` in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("test", self.test.as_slice()),
            ("build", self.build.as_slice()),
            ("publish", self.publish.as_slice()),
            ("docs", self.docs.as_slice()),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.changelog.path, "CHANGELOG.md");
        assert_eq!(config.version.tag_prefix, "v");
        assert_eq!(config.version.files, vec!["package.json".to_string()]);
        assert!(config.steps.test.is_empty());
        assert!(config.steps.publish.is_empty());
    }

    #[test]
    fn test_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.changelog.path, "CHANGELOG.md");
        assert_eq!(config.version.files, vec!["package.json".to_string()]);
    }

    #[test]
    fn test_deserialize_partial_section_keeps_defaults() {
        let toml = r#"
            [version]
            tag_prefix = "release-"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.version.tag_prefix, "release-");
        assert_eq!(config.version.files, vec!["package.json".to_string()]);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            [changelog]
            path = "docs/CHANGES.md"

            [version]
            files = ["package.json", "Cargo.toml"]
            tag_prefix = ""

            [steps]
            test = ["npm test", "npm run lint"]
            build = ["npm run build"]
            publish = ["npm publish"]
            docs = ["npm run docs:deploy"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.changelog.path, "docs/CHANGES.md");
        assert_eq!(config.version.files.len(), 2);
        assert_eq!(config.version.tag_prefix, "");
        assert_eq!(config.steps.test.len(), 2);
        assert_eq!(config.steps.build, vec!["npm run build".to_string()]);
        assert_eq!(config.steps.publish, vec!["npm publish".to_string()]);
        assert_eq!(config.steps.docs.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_steps_iter_order() {
        let steps = StepsConfig::default();
        let names: Vec<_> = steps.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["test", "build", "publish", "docs"]);
    }

    #[test]
    fn test_validate_empty_changelog_path() {
        let mut config = Config::default();
        config.changelog.path = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("changelog.path"));
    }

    #[test]
    fn test_validate_empty_command() {
        let mut config = Config::default();
        config.steps.build = vec!["npm run build".to_string(), String::new()];

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: steps.build contains an empty command"
        );
    }

    #[test]
    fn test_serialize_config() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[changelog]"));
        assert!(toml_str.contains("path = \"CHANGELOG.md\""));
    }
}
