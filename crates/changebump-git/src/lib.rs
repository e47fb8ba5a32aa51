//! Git abstraction layer for changebump.
//!
//! This crate provides the Git operations a release needs:
//! - Repository discovery
//! - Version tag lookup and creation
//! - The release commit

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::Repository;
