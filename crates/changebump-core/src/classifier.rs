//! Release classification from a changelog.
//!
//! The changelog is expected to look like:
//!
//! ```markdown
//! ## Unreleased
//!
//! - Added column resizing
//!
//! **Bug fixes**
//! - Fixed sticky header offset
//!
//! ## 1.2.0
//! ...
//! ```
//!
//! Only the block between the first two level-2 headings is inspected.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{BumpType, ClassifyError, ClassifyResult};

/// Phrase that marks a changelog as having nothing to release.
pub const NOTHING_TO_RELEASE_MARKER: &str = "No public interface changes";

// First `##` heading line (not `###`), the blank lines after it, then the
// shortest run of text up to the next `##` heading.
static UNRELEASED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##(?:[^#\n][^\n]*)?\n+((?s:.*?))^##(?:[^#]|$)").expect("invalid regex")
});

static BUG_FIXES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*bug fixes\*\*").expect("invalid regex"));

static BREAKING_CHANGES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*breaking changes\*\*").expect("invalid regex"));

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-").expect("invalid regex"));

/// Outcome of classifying a changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Recommended bump.
    pub bump: BumpType,

    /// The unreleased changes block the recommendation was derived from.
    pub unreleased: String,
}

/// Recommends a bump from the changelog's unreleased changes.
///
/// Rules, in increasing precedence:
/// 1. minor by default;
/// 2. patch when the block has a `**Bug fixes**` marker and no list item
///    before it;
/// 3. major when the block has a `**Breaking changes**` marker.
///
/// Markers match case-insensitively.
///
/// # Errors
///
/// - [`ClassifyError::NothingToRelease`] if the text anywhere contains
///   [`NOTHING_TO_RELEASE_MARKER`] (checked first, case-sensitive).
/// - [`ClassifyError::MalformedChangelog`] if the text has fewer than two
///   `##` headings.
pub fn classify(changelog: &str) -> ClassifyResult<Classification> {
    if changelog.contains(NOTHING_TO_RELEASE_MARKER) {
        return Err(ClassifyError::NothingToRelease);
    }

    let unreleased = extract_unreleased(changelog).ok_or(ClassifyError::MalformedChangelog)?;
    let bump = classify_block(unreleased);
    debug!(%bump, block_len = unreleased.len(), "classified unreleased changes");

    Ok(Classification {
        bump,
        unreleased: unreleased.to_string(),
    })
}

/// Returns the text between the first two `##` headings.
pub fn extract_unreleased(changelog: &str) -> Option<&str> {
    UNRELEASED_RE
        .captures(changelog)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn classify_block(block: &str) -> BumpType {
    let mut bump = BumpType::Minor;

    if let Some(marker) = BUG_FIXES_RE.find(block)
        && !LIST_ITEM_RE.is_match(&block[..marker.start()])
    {
        bump = BumpType::Patch;
    }

    if BREAKING_CHANGES_RE.is_match(block) {
        bump = BumpType::Major;
    }

    bump
}

/// The bump a release will actually use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Bump to apply.
    pub bump: BumpType,

    /// What the changelog recommended.
    pub recommended: BumpType,

    /// Whether an override supplied `bump`.
    pub overridden: bool,
}

impl Resolution {
    /// Returns a warning when an override contradicts the recommendation.
    #[must_use]
    pub fn disagreement(&self) -> Option<String> {
        (self.bump != self.recommended).then(|| {
            format!(
                "bump type overridden to {} but the changelog suggests {}",
                self.bump, self.recommended
            )
        })
    }
}

/// Applies an optional override to a classification.
///
/// A missing or blank override keeps the recommendation. A disagreeing
/// override wins and is logged as a warning.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidOverride`] if the override is not
/// `major`, `minor` or `patch`.
pub fn resolve(
    classification: &Classification,
    override_value: Option<&str>,
) -> ClassifyResult<Resolution> {
    let recommended = classification.bump;

    let Some(raw) = override_value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Resolution {
            bump: recommended,
            recommended,
            overridden: false,
        });
    };

    let resolution = Resolution {
        bump: raw.parse()?,
        recommended,
        overridden: true,
    };

    if let Some(message) = resolution.disagreement() {
        warn!(
            bump = %resolution.bump,
            recommended = %recommended,
            "{message}"
        );
    }

    Ok(resolution)
}
