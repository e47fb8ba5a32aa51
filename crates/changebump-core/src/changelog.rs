//! Changelog rewriting at release time.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use semver::Version;

use crate::{ClassifyError, ClassifyResult};

/// Heading that collects changes for the next release.
pub const UNRELEASED_HEADING: &str = "## Unreleased";

static FIRST_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##(?:[^#\n][^\n]*)?$").expect("invalid regex"));

/// Turns the unreleased section into the section for `version`.
///
/// The first `##` heading becomes `## <version> (<date>)` and a fresh
/// [`UNRELEASED_HEADING`] is inserted above it.
///
/// # Errors
///
/// Returns [`ClassifyError::MalformedChangelog`] if there is no `##` heading.
pub fn stamp_release(changelog: &str, version: &Version, date: NaiveDate) -> ClassifyResult<String> {
    let heading = FIRST_HEADING_RE
        .find(changelog)
        .ok_or(ClassifyError::MalformedChangelog)?;

    let replacement = format!(
        "{UNRELEASED_HEADING}\n\n## {version} ({})",
        date.format("%Y-%m-%d")
    );

    let mut stamped = String::with_capacity(changelog.len() + replacement.len());
    stamped.push_str(&changelog[..heading.start()]);
    stamped.push_str(&replacement);
    stamped.push_str(&changelog[heading.end()..]);
    Ok(stamped)
}
