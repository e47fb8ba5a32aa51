//! Release orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use changebump_config::Config;
use changebump_git::Repository;
use chrono::{Local, NaiveDate};
use semver::Version;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    BumpType, Classification, CoreError, CoreResult, Resolution, Step, StepRunner,
    VersionManager, classify, read_version_from_file, resolve, stamp_release, update_version_file,
};

/// What a release will do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    /// Version before the release.
    pub previous: Version,

    /// Version after the release.
    pub next: Version,

    /// Bump decision after applying any override.
    pub resolution: Resolution,

    /// Unreleased changes the decision came from.
    pub unreleased: String,
}

impl ReleasePlan {
    /// Bump applied by this plan.
    #[must_use]
    pub fn bump(&self) -> BumpType {
        self.resolution.bump
    }
}

/// Switches for a release run.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReleaseOptions {
    /// Log every action without executing or writing anything.
    pub dry_run: bool,

    /// Bump type supplied by the operator.
    pub bump_override: Option<String>,

    /// Skip the test step.
    pub skip_tests: bool,

    /// Skip the release commit.
    pub no_commit: bool,

    /// Skip tag creation.
    pub no_tag: bool,

    /// Skip the publish and docs steps.
    pub no_publish: bool,
}

/// Manages the release process.
pub struct ReleaseManager {
    root: PathBuf,
    config: Config,
    version_manager: VersionManager,
}

impl ReleaseManager {
    /// Creates a release manager for the project at `root`.
    ///
    /// Paths in `config` are resolved against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            version_manager: VersionManager::new(),
        }
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the changelog path.
    #[must_use]
    pub fn changelog_path(&self) -> PathBuf {
        self.root.join(&self.config.changelog.path)
    }

    /// Returns the configured version files.
    #[must_use]
    pub fn version_files(&self) -> Vec<PathBuf> {
        self.config
            .version
            .files
            .iter()
            .map(|f| self.root.join(f))
            .collect()
    }

    /// Reads and classifies the changelog.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or classified.
    pub fn classify(&self) -> CoreResult<Classification> {
        let text = self.read_changelog()?;
        Ok(classify(&text)?)
    }

    /// Determines the current version.
    ///
    /// Tries the first readable version file, then the latest version tag,
    /// and finally falls back to `0.0.0`.
    pub fn current_version(&self, repo: Option<&Repository>) -> Version {
        for file in self.version_files() {
            match read_version_from_file(&file) {
                Ok(version) => {
                    debug!(file = %file.display(), %version, "read current version");
                    return version;
                }
                Err(e) => debug!(file = %file.display(), error = %e, "no version in file"),
            }
        }

        let prefix = &self.config.version.tag_prefix;
        let from_tag = repo
            .and_then(|r| match r.latest_version_tag(prefix) {
                Ok(tag) => tag,
                Err(e) => {
                    warn!(error = %e, "failed to read version tags");
                    None
                }
            })
            .and_then(|tag| self.version_manager.from_tag(&tag, prefix));

        from_tag.unwrap_or_else(|| {
            info!("no current version found, starting from 0.0.0");
            Version::new(0, 0, 0)
        })
    }

    /// Classifies the changelog, applies the override and computes the next version.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or classified, or the
    /// override is invalid.
    pub fn plan(
        &self,
        repo: Option<&Repository>,
        bump_override: Option<&str>,
    ) -> CoreResult<ReleasePlan> {
        let classification = self.classify()?;
        info!(recommended = %classification.bump, "classified changelog");

        let resolution = resolve(&classification, bump_override)?;

        let previous = self.current_version(repo);
        let next = self.version_manager.bump(&previous, resolution.bump)?;
        info!(%previous, %next, bump = %resolution.bump, "calculated new version");

        Ok(ReleasePlan {
            previous,
            next,
            resolution,
            unreleased: classification.unreleased,
        })
    }

    /// Writes the new version into every configured version file.
    ///
    /// Every file is checked before any is written, so a file without a
    /// usable version leaves all of them untouched. Returns the files that
    /// were (or, in a dry run, would be) updated.
    ///
    /// # Errors
    ///
    /// Returns the first file update error.
    pub fn apply_version(&self, version: &Version, dry_run: bool) -> CoreResult<Vec<PathBuf>> {
        let files = self.version_files();

        for file in &files {
            update_version_file(file, version, true)?;
        }

        for file in &files {
            if dry_run {
                info!(file = %file.display(), %version, "would update version file");
            } else {
                update_version_file(file, version, false)?;
                info!(file = %file.display(), %version, "updated version file");
            }
        }

        Ok(files)
    }

    /// Moves the unreleased section under the new version's heading.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read, stamped or written.
    pub fn stamp_changelog(
        &self,
        version: &Version,
        date: NaiveDate,
        dry_run: bool,
    ) -> CoreResult<PathBuf> {
        let path = self.changelog_path();
        let stamped = stamp_release(&self.read_changelog()?, version, date)?;

        if dry_run {
            info!(path = %path.display(), %version, "would stamp changelog");
        } else {
            fs::write(&path, stamped).map_err(|source| CoreError::Changelog {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), %version, "stamped changelog");
        }

        Ok(path)
    }

    /// Executes a full release.
    ///
    /// Order: test, build, classify, bump version files, stamp changelog,
    /// commit, tag, publish, docs.
    ///
    /// # Errors
    ///
    /// Returns the first failure; later steps are not run.
    pub fn release(&self, repo: &Repository, options: &ReleaseOptions) -> CoreResult<ReleasePlan> {
        info!(dry_run = options.dry_run, "starting release process");

        let runner = StepRunner::new(&self.root).dry_run(options.dry_run);
        let steps = &self.config.steps;

        if options.skip_tests {
            info!("skipping test step");
        } else {
            runner.run(Step::Test, steps)?;
        }
        runner.run(Step::Build, steps)?;

        let plan = self.plan(Some(repo), options.bump_override.as_deref())?;

        let mut touched = self.apply_version(&plan.next, options.dry_run)?;
        touched.push(self.stamp_changelog(&plan.next, Local::now().date_naive(), options.dry_run)?);

        if options.no_commit {
            info!("skipping release commit");
        } else {
            let message = format!("chore(release): {}", plan.next);
            if options.dry_run {
                info!(%message, "would create commit");
            } else {
                let oid = repo.commit_paths(&touched, &message)?;
                info!(%oid, %message, "created commit");
            }
        }

        if options.no_tag {
            info!("skipping tag");
        } else {
            let tag_name = self
                .version_manager
                .to_tag(&plan.next, &self.config.version.tag_prefix);
            if options.dry_run {
                info!(%tag_name, "would create tag");
            } else {
                repo.create_tag(&tag_name, &format!("Release {}", plan.next))?;
                info!(%tag_name, "created tag");
            }
        }

        if options.no_publish {
            info!("skipping publish and docs steps");
        } else {
            runner.run(Step::Publish, steps)?;
            runner.run(Step::Docs, steps)?;
        }

        info!(version = %plan.next, "release completed");
        Ok(plan)
    }

    fn read_changelog(&self) -> CoreResult<String> {
        let path = self.changelog_path();
        fs::read_to_string(&path).map_err(|source| CoreError::Changelog { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassifyError;
    use tempfile::TempDir;

    const CHANGELOG: &str = "# Changelog\n\n## Unreleased\n\n**Bug fixes**\n- Fixed cell alignment\n\n## 1.4.0 (2026-09-01)\n\n- Added mobile rows\n";

    fn project(changelog: &str) -> (TempDir, ReleaseManager) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), changelog).unwrap();
        fs::write(
            dir.path().join("package.json"),
            "{\n  \"name\": \"@acme/table\",\n  \"version\": \"1.4.0\"\n}\n",
        )
        .unwrap();
        let manager = ReleaseManager::new(dir.path(), Config::default());
        (dir, manager)
    }

    #[test]
    fn test_plan_uses_recommendation() {
        let (_dir, manager) = project(CHANGELOG);

        let plan = manager.plan(None, None).unwrap();

        assert_eq!(plan.bump(), BumpType::Patch);
        assert_eq!(plan.previous, Version::new(1, 4, 0));
        assert_eq!(plan.next, Version::new(1, 4, 1));
        assert!(plan.unreleased.contains("Fixed cell alignment"));
    }

    #[test]
    fn test_plan_with_override() {
        let (_dir, manager) = project(CHANGELOG);

        let plan = manager.plan(None, Some("major")).unwrap();

        assert_eq!(plan.next, Version::new(2, 0, 0));
        assert_eq!(plan.resolution.recommended, BumpType::Patch);
        assert!(plan.resolution.disagreement().is_some());
    }

    #[test]
    fn test_plan_invalid_override() {
        let (_dir, manager) = project(CHANGELOG);

        let err = manager.plan(None, Some("mega")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Classify(ClassifyError::InvalidOverride(ref v)) if v == "mega"
        ));
    }

    #[test]
    fn test_plan_nothing_to_release() {
        let (_dir, manager) =
            project("## Unreleased\n\nNo public interface changes\n\n## 1.4.0\n");

        let err = manager.plan(None, None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Classify(ClassifyError::NothingToRelease)
        ));
    }

    #[test]
    fn test_plan_version_overflow() {
        let (dir, manager) =
            project("## Unreleased\n\n**Breaking changes**\n- Dropped IE\n\n## 1.4.0\n");
        fs::write(
            dir.path().join("package.json"),
            "{\n  \"version\": \"18446744073709551615.0.0\"\n}\n",
        )
        .unwrap();

        let err = manager.plan(None, None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::VersionOverflow {
                bump: BumpType::Major,
                ..
            }
        ));
    }

    #[test]
    fn test_plan_missing_changelog() {
        let dir = TempDir::new().unwrap();
        let manager = ReleaseManager::new(dir.path(), Config::default());

        let err = manager.plan(None, None).unwrap_err();
        assert!(matches!(err, CoreError::Changelog { .. }));
    }

    #[test]
    fn test_current_version_falls_back_to_zero() {
        let dir = TempDir::new().unwrap();
        let manager = ReleaseManager::new(dir.path(), Config::default());

        assert_eq!(manager.current_version(None), Version::new(0, 0, 0));
    }

    #[test]
    fn test_apply_version_and_stamp() {
        let (dir, manager) = project(CHANGELOG);
        let next = Version::new(1, 4, 1);
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let updated = manager.apply_version(&next, false).unwrap();
        manager.stamp_changelog(&next, date, false).unwrap();

        assert_eq!(updated, vec![dir.path().join("package.json")]);
        assert_eq!(manager.current_version(None), next);

        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(changelog.contains("## Unreleased\n\n## 1.4.1 (2026-10-18)\n\n**Bug fixes**"));
    }

    #[test]
    fn test_apply_version_checks_every_file_first() {
        let (dir, _) = project(CHANGELOG);
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"table\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.version.files = vec!["package.json".to_string(), "Cargo.toml".to_string()];
        let manager = ReleaseManager::new(dir.path(), config);

        let err = manager
            .apply_version(&Version::new(1, 5, 0), false)
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::File(crate::FileUpdateError::VersionNotFound(_))
        ));
        assert_eq!(manager.current_version(None), Version::new(1, 4, 0));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (dir, manager) = project(CHANGELOG);
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        manager.apply_version(&Version::new(9, 9, 9), true).unwrap();
        manager
            .stamp_changelog(&Version::new(9, 9, 9), date, true)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            CHANGELOG
        );
        assert_eq!(manager.current_version(None), Version::new(1, 4, 0));
    }
}
