//! Build and lockfile scripts of the package manager

use crate::core::context::RunContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::process::Invocation;
use std::path::Path;

/// Package-manager scripts the pipeline runs
pub trait PackageScripts {
  /// Build the package in `dir`
  fn build(&self, dir: &Path) -> ReleaseResult<()>;

  /// Refresh the workspace lockfile from `dir`
  fn update_lockfile(&self, dir: &Path) -> ReleaseResult<()>;
}

/// Runs the configured `commands.build` / `commands.install`
pub struct ConfiguredScripts<'a> {
  ctx: &'a RunContext,
}

impl<'a> ConfiguredScripts<'a> {
  pub fn new(ctx: &'a RunContext) -> Self {
    Self { ctx }
  }

  fn invocation<'b>(&'b self, command: &'b [String], cwd: &'b Path) -> ReleaseResult<Invocation<'b>> {
    let (program, args) = command
      .split_first()
      .ok_or_else(|| ReleaseError::message("Empty command in configuration"))?;
    Ok(Invocation::new(program, cwd, &self.ctx.env_overrides).args(args.iter().cloned()))
  }
}

impl PackageScripts for ConfiguredScripts<'_> {
  fn build(&self, dir: &Path) -> ReleaseResult<()> {
    self.invocation(&self.ctx.config.commands.build, dir)?.run_inherit()
  }

  fn update_lockfile(&self, dir: &Path) -> ReleaseResult<()> {
    let invocation = self.invocation(&self.ctx.config.commands.install, dir)?;
    let output = invocation.run_capture()?;
    if output.success() {
      return Ok(());
    }

    let combined = output.combined();
    if let Some(signature) = tolerated_signature(&combined, &self.ctx.config.tolerated_install_errors) {
      tracing::warn!(signature, "lockfile update reported a tolerated error");
      println!("   ⚠️  Ignoring {} from `{}`", signature, invocation.display());
      return Ok(());
    }

    Err(ReleaseError::Subprocess {
      command: invocation.display(),
      code: output.code,
      output: combined,
    })
  }
}

/// First tolerated signature contained in `output`
pub fn tolerated_signature<'s>(output: &str, signatures: &'s [String]) -> Option<&'s str> {
  signatures
    .iter()
    .map(String::as_str)
    .find(|signature| !signature.is_empty() && output.contains(signature))
}
