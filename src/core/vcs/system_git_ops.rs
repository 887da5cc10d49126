//! `Vcs` implementation for SystemGit (status, staging, tagging, pushing, history)

use super::system_git::SystemGit;
use super::{CommitInfo, Vcs};
use crate::core::error::{ReleaseError, ReleaseResult};
use std::path::{Path, PathBuf};

impl Vcs for SystemGit {
  fn status_porcelain(&self) -> ReleaseResult<String> {
    self.run(self.git_cmd(), &["status", "--porcelain"])
  }

  fn list_files(&self, dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
    self.ls_files(dir)
  }

  fn diff(&self, paths: &[PathBuf]) -> ReleaseResult<String> {
    let paths: Vec<String> = paths.iter().map(|p| p.to_string_lossy().to_string()).collect();
    let mut args = vec!["diff", "--"];
    args.extend(paths.iter().map(String::as_str));
    self.run(self.git_cmd(), &args)
  }

  fn add_all(&self) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["add", "-A"])?;
    Ok(())
  }

  fn commit(&self, message: &str) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["commit", "-m", message])?;
    Ok(())
  }

  fn tag(&self, name: &str) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["tag", name])?;
    Ok(())
  }

  fn tag_exists(&self, name: &str) -> ReleaseResult<bool> {
    let reference = format!("refs/tags/{}", name);
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", &reference])
      .output()
      .map_err(|e| ReleaseError::message(format!("Failed to run git rev-parse: {}", e)))?;
    Ok(output.status.success())
  }

  fn push(&self) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["push"])?;
    Ok(())
  }

  fn push_tags(&self) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["push", "--tags"])?;
    Ok(())
  }

  fn reset_hard(&self) -> ReleaseResult<()> {
    self.run(self.git_cmd(), &["reset", "--hard"])?;
    Ok(())
  }

  fn commit_messages(&self, since: Option<&str>, path: &Path) -> ReleaseResult<Vec<CommitInfo>> {
    let shas = self.get_commits_touching_path(path, since)?;
    shas.iter().map(|sha| self.get_commit(sha)).collect()
  }
}

impl SystemGit {
  /// Get commits touching a path, oldest first
  ///
  /// Uses `git rev-list` with path filtering for efficient traversal.
  fn get_commits_touching_path(&self, path: &Path, since: Option<&str>) -> ReleaseResult<Vec<String>> {
    let range = match since {
      Some(since_ref) => format!("{}..HEAD", since_ref),
      None => "HEAD".to_string(),
    };

    let path = path.to_string_lossy();
    let stdout = self.run(self.git_cmd(), &["rev-list", "--no-merges", "--reverse", &range, "--", &path])?;

    Ok(
      stdout
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Get commit metadata for a single SHA
  fn get_commit(&self, sha: &str) -> ReleaseResult<CommitInfo> {
    // %H (hash) %an (author name) %B (body)
    let format = "--format=%H%n%an%n%B";
    let stdout = self.run(self.git_cmd(), &["log", "-1", format, sha])?;
    parse_commit_output(&stdout)
  }
}

/// Parse git log output into CommitInfo
///
/// Format is %H%n%an%n%B: hash, author name, body
fn parse_commit_output(output: &str) -> ReleaseResult<CommitInfo> {
  let mut lines = output.lines();

  let sha = lines
    .next()
    .ok_or_else(|| ReleaseError::message("Missing commit SHA"))?
    .to_string();
  let author = lines
    .next()
    .ok_or_else(|| ReleaseError::message("Missing author name"))?
    .to_string();
  let message = lines.collect::<Vec<_>>().join("\n").trim().to_string();

  Ok(CommitInfo {
    sha,
    author,
    message,
  })
}
