//! Release step execution.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use changebump_config::StepsConfig;
use tracing::{debug, info};

use crate::{CoreError, CoreResult};

/// A configurable stage of the release pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run the test suite before touching anything.
    Test,
    /// Build the package.
    Build,
    /// Publish the tagged release.
    Publish,
    /// Sync documentation after publishing.
    Docs,
}

impl Step {
    /// Returns the commands configured for this step.
    #[must_use]
    pub fn commands(self, steps: &StepsConfig) -> &[String] {
        match self {
            Self::Test => &steps.test,
            Self::Build => &steps.build,
            Self::Publish => &steps.publish,
            Self::Docs => &steps.docs,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Test => "test",
            Self::Build => "build",
            Self::Publish => "publish",
            Self::Docs => "docs",
        })
    }
}

/// Runs step commands through `sh -c` in a working directory.
#[derive(Debug, Clone)]
pub struct StepRunner {
    workdir: PathBuf,
    dry_run: bool,
}

impl StepRunner {
    /// Creates a runner for the given directory.
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            dry_run: false,
        }
    }

    /// Sets the dry run flag. Dry runs only log the commands.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the step's commands in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StepSpawn`] if a command cannot be started and
    /// [`CoreError::StepFailed`] if one exits unsuccessfully.
    pub fn run(&self, step: Step, steps: &StepsConfig) -> CoreResult<()> {
        let commands = step.commands(steps);
        if commands.is_empty() {
            debug!(%step, "no commands configured");
            return Ok(());
        }

        for command in commands {
            if self.dry_run {
                info!(%step, %command, "would run");
                continue;
            }

            info!(%step, %command, "running");
            let status = Command::new("sh")
                .arg("-c")
                .arg(command)
                .current_dir(&self.workdir)
                .status()
                .map_err(|source| CoreError::StepSpawn {
                    step: step.to_string(),
                    command: command.clone(),
                    source,
                })?;

            if !status.success() {
                return Err(CoreError::StepFailed {
                    step: step.to_string(),
                    command: command.clone(),
                    status,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn steps_with(step: Step, commands: &[&str]) -> StepsConfig {
        let commands: Vec<String> = commands.iter().map(ToString::to_string).collect();
        let mut steps = StepsConfig::default();
        match step {
            Step::Test => steps.test = commands,
            Step::Build => steps.build = commands,
            Step::Publish => steps.publish = commands,
            Step::Docs => steps.docs = commands,
        }
        steps
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::Test.to_string(), "test");
        assert_eq!(Step::Docs.to_string(), "docs");
    }

    #[test]
    fn test_commands_lookup() {
        let steps = steps_with(Step::Publish, &["npm publish"]);
        assert_eq!(Step::Publish.commands(&steps), ["npm publish".to_string()]);
        assert!(Step::Build.commands(&steps).is_empty());
    }

    #[test]
    fn test_run_no_commands() {
        let dir = TempDir::new().unwrap();
        let runner = StepRunner::new(dir.path());
        assert!(runner.run(Step::Build, &StepsConfig::default()).is_ok());
    }

    #[test]
    fn test_run_in_workdir() {
        let dir = TempDir::new().unwrap();
        let runner = StepRunner::new(dir.path());
        let steps = steps_with(Step::Build, &["echo built > out.txt"]);

        runner.run(Step::Build, &steps).unwrap();

        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out.trim(), "built");
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let runner = StepRunner::new(dir.path());
        let steps = steps_with(Step::Test, &["true", "exit 3", "touch after"]);

        let err = runner.run(Step::Test, &steps).unwrap_err();

        match err {
            CoreError::StepFailed {
                step,
                command,
                status,
            } => {
                assert_eq!(step, "test");
                assert_eq!(command, "exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("after").exists());
    }

    #[test]
    fn test_dry_run_executes_nothing() {
        let dir = TempDir::new().unwrap();
        let runner = StepRunner::new(dir.path()).dry_run(true);
        let steps = steps_with(Step::Publish, &["touch published"]);

        runner.run(Step::Publish, &steps).unwrap();

        assert!(!dir.path().join("published").exists());
    }
}
