//! Changelog generation
//!
//! `GitChangelog` collects the commits touching the package directory since the
//! previous release tag, renders them as a Markdown section and the pipeline
//! prepends that section to the changelog file.

pub mod conventional;

use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::vcs::Vcs;
use conventional::ChangelogEntry;
use std::fs;
use std::io;
use std::path::Path;

/// Produces the changelog text for a release
pub trait ChangelogGenerator {
  /// Markdown for the release of the package in `dir` from `old` to `new`
  fn generate(&self, dir: &Path, old: &str, new: &str) -> ReleaseResult<String>;
}

/// Conventional-commit changelog built from version-control history
pub struct GitChangelog<'a> {
  vcs: &'a dyn Vcs,
  date: String,
}

impl<'a> GitChangelog<'a> {
  /// Changelog stamped with today's local date
  pub fn new(vcs: &'a dyn Vcs) -> Self {
    Self::with_date(vcs, chrono::Local::now().format("%Y-%m-%d").to_string())
  }

  pub fn with_date(vcs: &'a dyn Vcs, date: impl Into<String>) -> Self {
    Self {
      vcs,
      date: date.into(),
    }
  }
}

impl ChangelogGenerator for GitChangelog<'_> {
  fn generate(&self, dir: &Path, old: &str, new: &str) -> ReleaseResult<String> {
    let previous_tag = format!("v{}", old);
    let since = if self.vcs.tag_exists(&previous_tag)? {
      Some(previous_tag.as_str())
    } else {
      tracing::debug!(tag = %previous_tag, "previous release tag missing, using full history");
      None
    };

    let mut entry = ChangelogEntry::new(new, self.date.clone());
    for commit in self.vcs.commit_messages(since, dir)? {
      if !entry.add_message(&commit.message) {
        tracing::debug!(sha = %commit.sha, author = %commit.author, "skipping non-conventional commit");
      }
    }
    if entry.is_empty() {
      tracing::warn!(version = new, "no conventional commits since the previous release");
    }

    Ok(entry.to_markdown())
  }
}

/// Put `entry` in front of the existing changelog content (file created if missing)
pub fn prepend(path: &Path, entry: &str) -> ReleaseResult<()> {
  let existing = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
    Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
  };

  fs::write(path, format!("{}{}", entry, existing)).with_context(|| format!("Failed to write {}", path.display()))
}
