//! System git backend
//!
//! Uses the git CLI for every operation:
//! - Safe subprocess execution (isolated environment)
//! - NUL-separated output where paths are involved
//! - One subprocess per query, no caching

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Directory git commands run in
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ReleaseError::with_help(
          format!("Git repository not found at: {}", path.display()),
          "release-me must run inside a git working tree",
        ));
      }
      return Err(ReleaseError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root (the repository top-level directory)
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to `dir`
  /// - Clears environment variables
  /// - Whitelists only PATH, HOME and SSH_AUTH_SOCK
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd_in(&self, dir: &Path) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(dir);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    for key in ["PATH", "HOME", "SSH_AUTH_SOCK"] {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }

  pub(crate) fn git_cmd(&self) -> Command {
    self.git_cmd_in(&self.repo_path)
  }

  /// Run a git command and return stdout, mapping failures to `Subprocess`
  pub(crate) fn run(&self, mut cmd: Command, args: &[&str]) -> ReleaseResult<String> {
    let command_line = format!("git {}", args.join(" "));
    tracing::debug!(command = %command_line, "spawning");

    let output = cmd
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute {}", command_line))?;

    if !output.status.success() {
      return Err(ReleaseError::Subprocess {
        command: command_line,
        code: output.status.code(),
        output: String::from_utf8_lossy(&output.stderr).to_string(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// List tracked files below `dir` (relative to `dir`, NUL separated)
  pub(crate) fn ls_files(&self, dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
    let stdout = self.run(self.git_cmd_in(dir), &["ls-files", "-z"])?;
    Ok(parse_nul_separated(&stdout).map(|rel| dir.join(rel)).collect())
  }
}

/// Split `git ... -z` output into entries
pub(crate) fn parse_nul_separated(output: &str) -> impl Iterator<Item = &str> {
  output.split('\0').filter(|s| !s.is_empty())
}
