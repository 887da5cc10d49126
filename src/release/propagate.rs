//! Dependency propagation across workspace manifests
//!
//! For every manifest that lists the released package in `dependencies` or
//! `devDependencies`, the entry is rewritten to the new version, keeping its
//! range style (`^x.y.z` stays caret, `x.y.z` stays bare). `link:` entries are
//! never touched. A manifest is only written when its content actually changed.

use crate::core::error::{ReleaseError, ReleaseResult};
use crate::node::manifest::{DependencyGroup, Manifest};
use std::path::{Path, PathBuf};

/// Local-link dependency marker; such entries are never rewritten
pub const LINK_PREFIX: &str = "link:";

const CARET: char = '^';

/// One propagation run: `package` moves from `old` to `new`
#[derive(Debug, Clone, Copy)]
pub struct Propagation<'a> {
  pub package: &'a str,
  pub old: &'a str,
  pub new: &'a str,
  /// Fail on dependents that do not pin `old` (lockstep check)
  pub strict: bool,
}

impl<'a> Propagation<'a> {
  pub fn new(package: &'a str, old: &'a str, new: &'a str, strict: bool) -> Self {
    Self {
      package,
      old,
      new,
      strict,
    }
  }

  /// Rewrite every manifest in `paths`, returning the ones that were written.
  ///
  /// `on_visit` is called once per manifest after it has been processed.
  pub fn apply_all(&self, paths: &[PathBuf], mut on_visit: impl FnMut(&Path)) -> ReleaseResult<Vec<PathBuf>> {
    let mut changed = Vec::new();
    for path in paths {
      if self.apply_to(path)? {
        changed.push(path.clone());
      }
      on_visit(path);
    }
    Ok(changed)
  }

  /// Rewrite a single manifest on disk; true when it was written
  pub fn apply_to(&self, path: &Path) -> ReleaseResult<bool> {
    let original = Manifest::load(path)?;
    let mut manifest = original.clone();
    self.rewrite(path, &mut manifest)?;

    if manifest == original {
      return Ok(false);
    }

    tracing::debug!(manifest = %path.display(), package = self.package, version = self.new, "updated dependent");
    manifest.save(path)?;
    Ok(true)
  }

  /// Rewrite the in-memory manifest; `path` is only used for error reports
  pub fn rewrite(&self, path: &Path, manifest: &mut Manifest) -> ReleaseResult<()> {
    for group in DependencyGroup::ALL {
      let Some(stored) = manifest.dependency(group, self.package) else {
        continue;
      };
      if stored.starts_with(LINK_PREFIX) {
        continue;
      }

      let caret = stored.starts_with(CARET);
      let expected = with_range_style(self.old, caret);
      if self.strict && stored != expected {
        return Err(ReleaseError::VersionMismatch {
          manifest: path.to_path_buf(),
          dependency: self.package.to_string(),
          expected,
          found: stored.to_string(),
        });
      }

      let replacement = with_range_style(self.new, caret);
      manifest.set_dependency(group, self.package, &replacement);
    }
    Ok(())
  }
}

fn with_range_style(version: &str, caret: bool) -> String {
  if caret {
    format!("{}{}", CARET, version)
  } else {
    version.to_string()
  }
}
