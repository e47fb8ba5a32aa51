//! Core library for changebump.
//!
//! This crate classifies a changelog's unreleased changes into a semantic
//! version bump and orchestrates the release around that decision.

mod bump;
mod changelog;
mod classifier;
mod error;
mod files;
mod pipeline;
mod release;
mod version;

pub use bump::BumpType;
pub use changelog::{UNRELEASED_HEADING, stamp_release};
pub use classifier::{
    Classification, NOTHING_TO_RELEASE_MARKER, Resolution, classify, extract_unreleased, resolve,
};
pub use error::{ClassifyError, ClassifyResult, CoreError, CoreResult};
pub use files::{
    FileResult, FileUpdateError, VersionFile, read_version_from_file, update_version_file,
};
pub use pipeline::{Step, StepRunner};
pub use release::{ReleaseManager, ReleaseOptions, ReleasePlan};
pub use version::VersionManager;
