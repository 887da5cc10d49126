//! Workspace scanning backed by the version-control tracked-file list
//!
//! Ignored and generated files never show up here, so a stray `node_modules`
//! package.json cannot be rewritten by accident.

use crate::core::context::RunContext;
use crate::core::error::{ManifestError, ReleaseError, ReleaseResult};
use crate::core::vcs::Vcs;
use crate::node::manifest::{self, Manifest};
use std::path::{Path, PathBuf};

/// The package being released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
  pub name: String,
  pub dir: PathBuf,
  /// `version` field as written; empty when absent
  pub version: String,
}

/// Resolve the package from the manifest in the package root
///
/// Only `ctx.root` is consulted; running from the repository root of a
/// monorepo does not select a sub-package.
pub fn find_package(ctx: &RunContext) -> ReleaseResult<Package> {
  let path = ctx.manifest_path();
  let manifest = Manifest::load(&path).map_err(|err| match err {
    ReleaseError::Manifest(ManifestError::NotFound { .. }) => ReleaseError::PackageNotFound {
      dir: ctx.root.clone(),
      reason: format!("no {} here", manifest::MANIFEST_FILE),
    },
    other => other,
  })?;

  let name = manifest.name().ok_or_else(|| ReleaseError::PackageNotFound {
    dir: ctx.root.clone(),
    reason: format!("{} has no \"name\" field", manifest::MANIFEST_FILE),
  })?;

  Ok(Package {
    name: name.to_string(),
    dir: ctx.root.clone(),
    version: manifest.version().unwrap_or_default().to_string(),
  })
}

/// Tracked files below `dir` as absolute paths, in the tool's order
pub fn list_files(vcs: &dyn Vcs, dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
  vcs.list_files(dir)
}

/// Tracked package.json files below `dir`
pub fn list_manifests(vcs: &dyn Vcs, dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
  Ok(
    list_files(vcs, dir)?
      .into_iter()
      .filter(|path| manifest::is_manifest(path))
      .collect(),
  )
}

/// Tracked files below `dir` whose file name is exactly `file_name`
pub fn list_named(vcs: &dyn Vcs, dir: &Path, file_name: &str) -> ReleaseResult<Vec<PathBuf>> {
  Ok(
    list_files(vcs, dir)?
      .into_iter()
      .filter(|path| path.file_name().is_some_and(|name| name == file_name))
      .collect(),
  )
}
