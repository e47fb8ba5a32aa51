//! Version bump decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ClassifyError;

/// Semantic-version bump category for the next release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Major version bump (breaking changes).
    Major,
    /// Minor version bump (new features).
    Minor,
    /// Patch version bump (bug fixes).
    Patch,
}

impl BumpType {
    /// All bump types, most severe first.
    pub const ALL: [Self; 3] = [Self::Major, Self::Minor, Self::Patch];

    /// Returns the literal used on the command line and in output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = ClassifyError;

    /// Parses `major`, `minor` or `patch`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|bump| bump.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClassifyError::InvalidOverride(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BumpType::Major.to_string(), "major");
        assert_eq!(BumpType::Minor.to_string(), "minor");
        assert_eq!(BumpType::Patch.to_string(), "patch");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("major".parse::<BumpType>(), Ok(BumpType::Major));
        assert_eq!("Minor".parse::<BumpType>(), Ok(BumpType::Minor));
        assert_eq!(" PATCH\n".parse::<BumpType>(), Ok(BumpType::Patch));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "prerelease".parse::<BumpType>(),
            Err(ClassifyError::InvalidOverride("prerelease".to_string()))
        );
        assert!("".parse::<BumpType>().is_err());
        assert!("none".parse::<BumpType>().is_err());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&BumpType::Major).unwrap();
        assert_eq!(json, "\"major\"");

        let bump: BumpType = serde_json::from_str("\"patch\"").unwrap();
        assert_eq!(bump, BumpType::Patch);
    }
}
