//! Boilerplate (`create-<package>`) package with its own patch counter

use crate::core::error::{ReleaseError, ReleaseResult};
use crate::node::manifest::{self, Manifest};
use std::path::{Path, PathBuf};

/// A boilerplate package found next to the released package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
  pub name: String,
  pub manifest_path: PathBuf,
  pub version_old: String,
  pub version_new: String,
}

impl Boilerplate {
  /// Directory the boilerplate package is published from
  pub fn dir(&self) -> &Path {
    self.manifest_path.parent().unwrap_or(Path::new("."))
  }

  /// Persist the bumped version
  pub fn bump(&self) -> ReleaseResult<()> {
    manifest::set_version(&self.manifest_path, &self.version_new)
  }
}

/// Look for a manifest named `<prefix><package>` among `manifests`
pub fn find(manifests: &[PathBuf], prefix: &str, package: &str) -> ReleaseResult<Option<Boilerplate>> {
  let wanted = format!("{}{}", prefix, package);

  for path in manifests {
    let manifest = Manifest::load(path)?;
    if manifest.name() != Some(wanted.as_str()) {
      continue;
    }

    let version_old = manifest.version().unwrap_or_default().to_string();
    let version_new = next_version(&version_old)?;
    return Ok(Some(Boilerplate {
      name: wanted,
      manifest_path: path.clone(),
      version_old,
      version_new,
    }));
  }

  Ok(None)
}

/// `0.0.<n>` -> `0.0.<n+1>`; any other shape is rejected
pub fn next_version(version: &str) -> ReleaseResult<String> {
  let invalid = |reason: &str| ReleaseError::InvalidVersion {
    version: version.to_string(),
    reason: reason.to_string(),
  };

  let counter = version
    .strip_prefix("0.0.")
    .ok_or_else(|| invalid("boilerplate versions must look like 0.0.<n>"))?;
  let n: u64 = counter
    .parse()
    .map_err(|_| invalid("boilerplate patch counter must be a plain number"))?;

  Ok(format!("0.0.{}", n + 1))
}
