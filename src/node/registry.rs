//! Package registry collaborator

use crate::core::context::RunContext;
use crate::core::error::ReleaseResult;
use crate::core::process::Invocation;
use std::path::Path;

/// Publishing operations against the package registry
pub trait Registry {
  /// Publish the package in `dir`, optionally under a dist-tag
  fn publish(&self, dir: &Path, tag: Option<&str>) -> ReleaseResult<()>;

  /// Remove a dist-tag from a published package
  fn remove_dist_tag(&self, package: &str, tag: &str) -> ReleaseResult<()>;
}

/// npm-compatible registry CLI (`<program> publish`, `<program> dist-tag rm`)
pub struct NpmRegistry<'a> {
  ctx: &'a RunContext,
}

impl<'a> NpmRegistry<'a> {
  pub fn new(ctx: &'a RunContext) -> Self {
    Self { ctx }
  }

  fn invocation<'b>(&'b self, cwd: &'b Path) -> Invocation<'b> {
    Invocation::new(&self.ctx.config.commands.registry, cwd, &self.ctx.env_overrides)
  }
}

impl Registry for NpmRegistry<'_> {
  fn publish(&self, dir: &Path, tag: Option<&str>) -> ReleaseResult<()> {
    let mut args = vec!["publish".to_string()];
    if let Some(tag) = tag {
      args.push("--tag".to_string());
      args.push(tag.to_string());
    }
    self.invocation(dir).args(args).run_inherit()
  }

  fn remove_dist_tag(&self, package: &str, tag: &str) -> ReleaseResult<()> {
    self
      .invocation(&self.ctx.root)
      .args(["dist-tag", "rm", package, tag])
      .run_inherit()
  }
}
