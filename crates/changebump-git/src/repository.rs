//! Git repository wrapper.

use std::path::{Path, PathBuf};

use git2::Repository as Git2Repo;
use tracing::debug;

use crate::{GitError, GitResult};

/// A Git repository wrapper.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Discovers the repository from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover() -> GitResult<Self> {
        let inner = Git2Repo::discover(".")?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Returns the checked-out branch, or `None` for a detached or unborn `HEAD`.
    pub fn current_branch(&self) -> Option<String> {
        let head = self.inner.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(String::from)
    }

    /// Returns all tags in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if tags cannot be read.
    pub fn tags(&self) -> GitResult<Vec<String>> {
        let tags = self.inner.tag_names(None)?;
        Ok(tags.iter().flatten().map(String::from).collect())
    }

    /// Returns the latest tag matching a version pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if tags cannot be read.
    pub fn latest_version_tag(&self, prefix: &str) -> GitResult<Option<String>> {
        let tags = self.tags()?;

        let mut version_tags: Vec<_> = tags
            .into_iter()
            .filter_map(|t| {
                let version_str = t.strip_prefix(prefix)?;
                semver::Version::parse(version_str).ok().map(|v| (t, v))
            })
            .collect();

        version_tags.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(version_tags.into_iter().next().map(|(tag, _)| tag))
    }

    /// Stages the given files and creates a commit on `HEAD`.
    ///
    /// Paths may be absolute (inside the working directory) or relative to it.
    /// Returns the new commit id.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be staged or the commit fails.
    pub fn commit_paths(&self, paths: &[PathBuf], message: &str) -> GitResult<String> {
        let workdir = self.inner.workdir().ok_or(GitError::BareRepo)?;

        let mut index = self.inner.index()?;
        for path in paths {
            let relative = relative_to(workdir, path)?;
            debug!(path = %relative.display(), "staging file");
            index.add_path(&relative)?;
        }
        index.write()?;

        let tree = self.inner.find_tree(index.write_tree()?)?;
        let sig = self.inner.signature()?;
        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        Ok(oid.to_string())
    }

    /// Creates a new annotated tag on `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag already exists or cannot be created.
    pub fn create_tag(&self, name: &str, message: &str) -> GitResult<()> {
        if self
            .inner
            .find_reference(&format!("refs/tags/{name}"))
            .is_ok()
        {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.inner.head()?;
        let commit = head.peel_to_commit()?;
        let sig = self.inner.signature()?;

        self.inner
            .tag(name, commit.as_object(), &sig, message, false)?;

        Ok(())
    }
}

/// Makes `path` relative to `workdir`, as the index expects.
fn relative_to(workdir: &Path, path: &Path) -> GitResult<PathBuf> {
    if path.is_relative() {
        return Ok(path.to_path_buf());
    }

    if let Ok(rel) = path.strip_prefix(workdir) {
        return Ok(rel.to_path_buf());
    }

    // Symlinked temp dirs (macOS /var -> /private/var)
    let canonical_workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    canonical_path
        .strip_prefix(&canonical_workdir)
        .map(Path::to_path_buf)
        .map_err(|_| GitError::OutsideWorkdir(path.to_path_buf()))
}
