//! Version file updaters.
//!
//! Supports reading and rewriting the version in:
//! - `package.json` (and any `.json` manifest)
//! - `Cargo.toml` (and any `.toml` manifest)
//!
//! Both are rewritten in place with a targeted substitution so key order,
//! indentation and comments survive the bump.

use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use thiserror::Error;

// Any `version = "..."` assignment at line start.
static TOML_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*version[ \t]*=[ \t]*"(?P<value>[^"\n]+)""#)
        .expect("invalid regex")
});

// Table headers; `array` is set for `[[...]]`.
static TOML_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\[(?P<array>\[)?(?P<name>[^\[\]\n]*)\]").expect("invalid regex")
});

// Any `"version": "..."` entry, at whatever depth.
static JSON_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""version"\s*:\s*"(?P<value>[^"]*)""#).expect("invalid regex")
});

/// Tables that may own a TOML manifest's version, in lookup order.
const TOML_VERSION_TABLES: [&str; 3] = ["package", "project", "tool.poetry"];

/// Errors that can occur when updating version files.
#[derive(Debug, Error)]
pub enum FileUpdateError {
    /// File not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Failed to read or write file.
    #[error("failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse file.
    #[error("failed to parse {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Version not found in file.
    #[error("version not found in {0}")]
    VersionNotFound(String),

    /// Unsupported file type.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileUpdateError>;

/// Manifest formats that carry a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFile {
    /// `package.json` style manifest.
    Json,
    /// `Cargo.toml` style manifest.
    Toml,
}

impl VersionFile {
    /// Detects the format from the file name, then the extension.
    ///
    /// # Errors
    ///
    /// Returns [`FileUpdateError::UnsupportedFileType`] for other files.
    pub fn detect(path: &Path) -> FileResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match filename {
            "package.json" => Ok(Self::Json),
            "Cargo.toml" => Ok(Self::Toml),
            _ => match path.extension().and_then(|e| e.to_str()) {
                Some("json") => Ok(Self::Json),
                Some("toml") => Ok(Self::Toml),
                _ => Err(FileUpdateError::UnsupportedFileType(
                    path.display().to_string(),
                )),
            },
        }
    }

    /// Finds the manifest's own version.
    ///
    /// Returns the parsed version and the byte range of its text in `content`.
    fn locate(self, file: &Path, content: &str) -> FileResult<(Version, Range<usize>)> {
        let (current, span) = match self {
            Self::Json => locate_json_version(file, content)?,
            Self::Toml => locate_toml_version(file, content)?,
        };

        let version = Version::parse(&current).map_err(|e| parse_error(file, e))?;

        Ok((version, span))
    }

    /// Returns manifest content with the version replaced.
    fn rewrite(self, file: &Path, content: &str, version: &Version) -> FileResult<String> {
        let (_, span) = self.locate(file, content)?;

        let mut rewritten = String::with_capacity(content.len());
        rewritten.push_str(&content[..span.start]);
        rewritten.push_str(&version.to_string());
        rewritten.push_str(&content[span.end..]);
        Ok(rewritten)
    }
}

fn parse_error(file: &Path, reason: impl std::fmt::Display) -> FileUpdateError {
    FileUpdateError::ParseError {
        file: file.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Reads the top-level `version` with `serde_json`, then finds where it is
/// written so only that entry is replaced.
fn locate_json_version(file: &Path, content: &str) -> FileResult<(String, Range<usize>)> {
    let json: serde_json::Value = serde_json::from_str(content).map_err(|e| parse_error(file, e))?;

    let Some(obj) = json.as_object() else {
        return Err(parse_error(file, "not a JSON object"));
    };

    let current = obj
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FileUpdateError::VersionNotFound(file.display().to_string()))?;

    let span = JSON_VERSION_RE
        .captures_iter(content)
        .filter(|caps| caps.get(0).is_some_and(|m| json_depth_at(content, m.start()) == Some(1)))
        .filter_map(|caps| caps.name("value"))
        .find(|value| value.as_str() == current)
        .map(|value| value.range())
        .ok_or_else(|| FileUpdateError::VersionNotFound(file.display().to_string()))?;

    Ok((current.to_string(), span))
}

/// Object and array nesting depth at `offset`, or `None` inside a string.
fn json_depth_at(content: &str, offset: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in content[..offset].chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (!in_string).then_some(depth)
}

/// Reads the version of the `[package]` (or `[project]`, `[tool.poetry]`)
/// table with `toml`, then finds the assignment inside that table.
fn locate_toml_version(file: &Path, content: &str) -> FileResult<(String, Range<usize>)> {
    let manifest: toml::Table = toml::from_str(content).map_err(|e| parse_error(file, e))?;

    let (table, current) = TOML_VERSION_TABLES
        .iter()
        .find_map(|&name| {
            let version = name
                .split('.')
                .try_fold(&manifest, |table, key| table.get(key)?.as_table())?
                .get("version")?
                .as_str()?;
            Some((name, version))
        })
        .ok_or_else(|| FileUpdateError::VersionNotFound(file.display().to_string()))?;

    let span = TOML_VERSION_RE
        .captures_iter(content)
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| toml_table_at(content, m.start()).as_deref() == Some(table))
        })
        .filter_map(|caps| caps.name("value"))
        .find(|value| value.as_str() == current)
        .map(|value| value.range())
        .ok_or_else(|| FileUpdateError::VersionNotFound(file.display().to_string()))?;

    Ok((current.to_string(), span))
}

/// Name of the table a line at `offset` belongs to, `None` for the root
/// table and arrays of tables.
fn toml_table_at(content: &str, offset: usize) -> Option<String> {
    let header = TOML_HEADER_RE.captures_iter(&content[..offset]).last()?;
    if header.name("array").is_some() {
        return None;
    }

    let name = header.name("name")?.as_str();
    Some(
        name.split('.')
            .map(|part| part.trim().trim_matches('"'))
            .collect::<Vec<_>>()
            .join("."),
    )
}

fn read_existing(path: &Path) -> FileResult<String> {
    if !path.exists() {
        return Err(FileUpdateError::NotFound(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Updates version in a file based on its type.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file type is not supported
/// - The version field is not found in the file
/// - The file cannot be read or written
pub fn update_version_file(path: &Path, new_version: &Version, dry_run: bool) -> FileResult<()> {
    let kind = VersionFile::detect(path)?;
    let content = read_existing(path)?;
    let new_content = kind.rewrite(path, &content, new_version)?;

    if !dry_run {
        fs::write(path, new_content)?;
    }

    Ok(())
}

/// Reads the current version from a file.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file type is not supported
/// - The version field is not found in the file
/// - The version string is not valid semver
pub fn read_version_from_file(path: &Path) -> FileResult<Version> {
    let kind = VersionFile::detect(path)?;
    let content = read_existing(path)?;
    let (version, _) = kind.locate(path, &content)?;
    Ok(version)
}
