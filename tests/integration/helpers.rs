//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A git repository with a bare `origin` and a fake registry CLI
pub struct TestWorkspace {
  _root: TempDir,
  _tools: TempDir,
  pub path: PathBuf,
  pub origin: PathBuf,
  registry_log: PathBuf,
  registry_bin: PathBuf,
}

impl TestWorkspace {
  /// Create an empty repository pushed to its origin
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let tools = TempDir::new()?;
    let path = root.path().join("repo");
    let origin = root.path().join("origin.git");
    std::fs::create_dir_all(&path)?;

    git(root.path(), &["init", "--bare", "--initial-branch=main", "origin.git"])?;
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["remote", "add", "origin", &origin.to_string_lossy()])?;

    // Registry stand-in: records its arguments, one call per line
    let registry_log = tools.path().join("registry.log");
    let registry_bin = tools.path().join("fake-npm");
    std::fs::write(
      &registry_bin,
      format!("#!/bin/sh\necho \"$*\" >> \"{}\"\n", registry_log.display()),
    )?;
    make_executable(&registry_bin)?;

    let ws = Self {
      _root: root,
      _tools: tools,
      path,
      origin,
      registry_log,
      registry_bin,
    };

    ws.write_config(&["true"])?;
    ws.write_file(".gitignore", "node_modules/\n")?;
    ws.commit("chore: initial setup")?;
    git(&ws.path, &["push", "-u", "origin", "main"])?;

    Ok(ws)
  }

  /// Write release.toml with `build` as the build command
  pub fn write_config(&self, build: &[&str]) -> Result<()> {
    let build = build.iter().map(|arg| format!("{:?}", arg)).collect::<Vec<_>>().join(", ");
    self.write_file(
      "release.toml",
      &format!(
        "[commands]\nbuild = [{}]\ninstall = [\"true\"]\nregistry = {:?}\n",
        build,
        self.registry_bin.display().to_string()
      ),
    )
  }

  /// Write a package.json below `dir` ("" for the repository root)
  pub fn add_package(&self, dir: &str, name: &str, version: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let deps = deps
      .iter()
      .map(|(dep, spec)| format!("    \"{}\": \"{}\"", dep, spec))
      .collect::<Vec<_>>()
      .join(",\n");
    let content = format!(
      "{{\n  \"name\": \"{}\",\n  \"version\": \"{}\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
      name, version, deps
    );
    let rel = if dir.is_empty() {
      "package.json".to_string()
    } else {
      format!("{}/package.json", dir)
    };
    self.write_file(&rel, &content)?;
    Ok(self.path.join(dir))
  }

  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    let path = self.path.join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Read a file
  pub fn read_file(&self, rel: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(rel))?)
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "-A"])?;
    git(&self.path, &["commit", "-m", message])?;
    self.git_stdout(&["rev-parse", "HEAD"])
  }

  /// Trimmed stdout of a git command in the repository
  pub fn git_stdout(&self, args: &[&str]) -> Result<String> {
    let output = git(&self.path, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Subject of the latest commit
  pub fn head_subject(&self) -> Result<String> {
    self.git_stdout(&["log", "-1", "--format=%s"])
  }

  pub fn tags(&self) -> Result<Vec<String>> {
    Ok(self.git_stdout(&["tag", "--list"])?.lines().map(String::from).collect())
  }

  /// Tags that reached the origin
  pub fn origin_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.origin, &["tag", "--list"])?;
    Ok(String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect())
  }

  pub fn is_clean(&self) -> Result<bool> {
    Ok(self.git_stdout(&["status", "--porcelain"])?.is_empty())
  }

  /// Calls the fake registry received, in order
  pub fn registry_calls(&self) -> Vec<String> {
    std::fs::read_to_string(&self.registry_log)
      .map(|log| log.lines().map(String::from).collect())
      .unwrap_or_default()
  }

  /// Content of every tracked file, for before/after comparisons
  pub fn tracked_snapshot(&self) -> Result<Vec<(String, Vec<u8>)>> {
    self
      .git_stdout(&["ls-files"])?
      .lines()
      .map(|rel| Ok((rel.to_string(), std::fs::read(self.path.join(rel))?)))
      .collect()
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run release-me in `cwd`, feeding `stdin` to the confirmation prompt
///
/// Does not fail on a non-zero exit; tests assert on the status themselves.
pub fn run_release_me(cwd: &Path, args: &[&str], stdin: &str) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-me");

  let mut child = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RELEASE_ME_LOG")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to run release-me")?;

  if let Some(mut input) = child.stdin.take() {
    // The process may exit before reading (e.g. dirty workspace)
    let _ = input.write_all(stdin.as_bytes());
  }

  Ok(child.wait_with_output()?)
}

/// Assert success and return stdout
pub fn expect_success(output: &Output) -> String {
  let stdout = String::from_utf8_lossy(&output.stdout).to_string();
  assert!(
    output.status.success(),
    "release-me failed\nstdout: {}\nstderr: {}",
    stdout,
    String::from_utf8_lossy(&output.stderr)
  );
  stdout
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  let mut perms = std::fs::metadata(path)?.permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms)?;
  Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
  Ok(())
}
