//! Blocking subprocess execution
//!
//! Every external tool (git, the registry CLI, the build and install scripts) runs
//! to completion before the pipeline moves on. A non-zero exit becomes
//! `ReleaseError::Subprocess`; callers decide whether a specific failure is tolerable.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a finished command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// stdout and stderr joined, for error reports and signature matching
  pub fn combined(&self) -> String {
    match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
      (true, _) => self.stderr.clone(),
      (false, true) => self.stdout.clone(),
      (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
    }
  }
}

/// A program invocation: program, arguments, working directory and env changes
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
  pub program: &'a str,
  pub args: Vec<String>,
  pub cwd: &'a Path,
  pub env: &'a BTreeMap<String, Option<String>>,
}

impl<'a> Invocation<'a> {
  pub fn new(program: &'a str, cwd: &'a Path, env: &'a BTreeMap<String, Option<String>>) -> Self {
    Self {
      program,
      args: Vec::new(),
      cwd,
      env,
    }
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Human-readable command line
  pub fn display(&self) -> String {
    std::iter::once(self.program.to_string())
      .chain(self.args.iter().cloned())
      .collect::<Vec<_>>()
      .join(" ")
  }

  fn command(&self) -> Command {
    let mut cmd = Command::new(self.program);
    cmd.args(&self.args).current_dir(self.cwd);
    for (key, value) in self.env {
      match value {
        Some(value) => {
          cmd.env(key, value);
        }
        None => {
          cmd.env_remove(key);
        }
      }
    }
    cmd
  }

  /// Run with the terminal attached (build and publish output streams to the user)
  pub fn run_inherit(&self) -> ReleaseResult<()> {
    tracing::debug!(command = %self.display(), cwd = %self.cwd.display(), "spawning");
    let status = self
      .command()
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .with_context(|| format!("Failed to execute `{}`", self.display()))?;

    if !status.success() {
      return Err(ReleaseError::Subprocess {
        command: self.display(),
        code: status.code(),
        output: String::new(),
      });
    }
    Ok(())
  }

  /// Run and capture output; never fails on a non-zero exit
  pub fn run_capture(&self) -> ReleaseResult<CommandOutput> {
    tracing::debug!(command = %self.display(), cwd = %self.cwd.display(), "spawning (captured)");
    let output = self
      .command()
      .stdin(Stdio::null())
      .output()
      .with_context(|| format!("Failed to execute `{}`", self.display()))?;

    Ok(CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
  }
}
