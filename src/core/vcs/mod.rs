//! Version-control collaborator
//!
//! The pipeline only talks to the `Vcs` trait; `SystemGit` is the production
//! implementation backed by the `git` binary.

pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};

/// Information about a commit
#[derive(Debug, Clone)]
pub struct CommitInfo {
  pub sha: String,
  pub author: String,
  pub message: String,
}

/// Operations the release pipeline needs from version control
pub trait Vcs {
  /// Porcelain status; empty when the working tree is clean
  fn status_porcelain(&self) -> ReleaseResult<String>;

  /// Tracked files below `dir`, as absolute paths, in the tool's native order
  fn list_files(&self, dir: &Path) -> ReleaseResult<Vec<PathBuf>>;

  /// Unified diff of the working tree against the index for `paths`
  fn diff(&self, paths: &[PathBuf]) -> ReleaseResult<String>;

  /// Stage every change, including new files
  fn add_all(&self) -> ReleaseResult<()>;

  fn commit(&self, message: &str) -> ReleaseResult<()>;

  fn tag(&self, name: &str) -> ReleaseResult<()>;

  fn tag_exists(&self, name: &str) -> ReleaseResult<bool>;

  /// Push the current branch to its upstream
  fn push(&self) -> ReleaseResult<()>;

  fn push_tags(&self) -> ReleaseResult<()>;

  /// Discard all local modifications of tracked files
  fn reset_hard(&self) -> ReleaseResult<()>;

  /// Commits touching `path`, oldest first, optionally only those after `since`
  fn commit_messages(&self, since: Option<&str>, path: &Path) -> ReleaseResult<Vec<CommitInfo>>;
}
