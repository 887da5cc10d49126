//! Run context - build once, pass everywhere
//!
//! # Design
//!
//! `RunContext` replaces ambient process state. The invocation directory, the
//! repository root, the permissive flag and the environment overrides for child
//! processes are resolved once in main.rs and then passed by reference to every
//! step of the release pipeline. No step reads the current directory or the
//! process environment on its own.
//!
//! ```text
//! main.rs:
//!   RunContext::build() -> &RunContext
//!   |
//!   v
//! release::pipeline, node::*, core::vcs:
//!   fn step(ctx: &RunContext, ...)
//! ```

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything a release run needs to know about where and how it runs.
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Package root: the directory release-me was invoked in (absolute path)
  pub root: PathBuf,

  /// Repository top-level directory; dependents are searched below it
  pub repo_root: PathBuf,

  /// Permissive mode: tolerate macro drift and dependency version mismatches
  pub dev_mode: bool,

  /// Environment changes for registry invocations (`None` removes the variable)
  pub env_overrides: BTreeMap<String, Option<String>>,

  /// Loaded or default configuration
  pub config: ReleaseConfig,
}

impl RunContext {
  /// Build the context for a run started in `root`.
  ///
  /// `repo_root` is the top-level directory reported by the version-control tool.
  /// Config is looked up in the package root first, then in the repository root.
  pub fn build(root: &Path, repo_root: &Path, dev_mode: bool) -> ReleaseResult<Self> {
    let config = ReleaseConfig::load(&[root, repo_root])?;
    Ok(Self::with_config(root, repo_root, dev_mode, config))
  }

  /// Build a context from an already loaded config
  pub fn with_config(root: &Path, repo_root: &Path, dev_mode: bool, config: ReleaseConfig) -> Self {
    let env_overrides = config.unset_env.iter().map(|name| (name.clone(), None)).collect();

    Self {
      root: root.to_path_buf(),
      repo_root: repo_root.to_path_buf(),
      dev_mode,
      env_overrides,
      config,
    }
  }

  /// Absolute path of the package manifest
  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(crate::node::manifest::MANIFEST_FILE)
  }

  /// Absolute path of the changelog file
  pub fn changelog_path(&self) -> PathBuf {
    self.root.join(&self.config.changelog)
  }
}
