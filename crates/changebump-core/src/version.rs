//! Version management.

use semver::Version;

use crate::{BumpType, CoreError, CoreResult};

/// Manages version operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionManager;

impl VersionManager {
    /// Creates a new version manager.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Bumps a version according to the bump type.
    ///
    /// Every bump drops pre-release and build metadata.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::VersionOverflow`] if the bumped component is
    /// already `u64::MAX`.
    pub fn bump(&self, version: &Version, bump_type: BumpType) -> CoreResult<Version> {
        let overflow = || CoreError::VersionOverflow {
            version: version.clone(),
            bump: bump_type,
        };

        let next = match bump_type {
            BumpType::Major => {
                Version::new(version.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            BumpType::Minor => Version::new(
                version.major,
                version.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            BumpType::Patch => Version::new(
                version.major,
                version.minor,
                version.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }

    /// Extracts version from a tag string.
    #[must_use]
    pub fn from_tag(&self, tag: &str, prefix: &str) -> Option<Version> {
        let version_str = tag.strip_prefix(prefix)?;
        Version::parse(version_str).ok()
    }

    /// Formats the tag for a version.
    #[must_use]
    pub fn to_tag(&self, version: &Version, prefix: &str) -> String {
        format!("{prefix}{version}")
    }
}
