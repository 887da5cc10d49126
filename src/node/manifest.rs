//! package.json store
//!
//! A manifest is read, mutated and written back within a single step. Writes are
//! whole-file rewrites in canonical form: 2-space indentation, original key order,
//! exactly one trailing newline.

use crate::core::error::{ManifestError, ReleaseResult};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

/// Dependency sections whose entries propagation rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyGroup {
  Dependencies,
  DevDependencies,
}

impl DependencyGroup {
  pub const ALL: [DependencyGroup; 2] = [DependencyGroup::Dependencies, DependencyGroup::DevDependencies];

  pub fn key(self) -> &'static str {
    match self {
      DependencyGroup::Dependencies => "dependencies",
      DependencyGroup::DevDependencies => "devDependencies",
    }
  }
}

/// A parsed package.json
///
/// Fields release-me does not understand are kept verbatim and in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
  document: Map<String, Value>,
}

impl Manifest {
  /// Parse manifest text; the top level must be a JSON object
  pub fn parse(path: &Path, content: &str) -> ReleaseResult<Self> {
    let document: Map<String, Value> = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self { document })
  }

  /// Load a manifest from disk
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let content = fs::read_to_string(path).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        ManifestError::NotFound {
          path: path.to_path_buf(),
        }
      } else {
        ManifestError::Io {
          path: path.to_path_buf(),
          source,
        }
      }
    })?;
    Self::parse(path, &content)
  }

  /// Canonical serialization
  pub fn render(&self) -> ReleaseResult<String> {
    let mut out = serde_json::to_string_pretty(&self.document)?;
    out.push('\n');
    Ok(out)
  }

  /// Write the manifest to disk, replacing the whole file
  pub fn save(&self, path: &Path) -> ReleaseResult<()> {
    let content = self.render()?;
    fs::write(path, content).map_err(|source| ManifestError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(())
  }

  pub fn name(&self) -> Option<&str> {
    self.document.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())
  }

  pub fn version(&self) -> Option<&str> {
    self.document.get("version").and_then(Value::as_str)
  }

  pub fn set_version(&mut self, version: &str) {
    self.document.insert("version".to_string(), Value::String(version.to_string()));
  }

  /// Version spec of `name` in a dependency group, if present and a string
  pub fn dependency(&self, group: DependencyGroup, name: &str) -> Option<&str> {
    self
      .document
      .get(group.key())
      .and_then(Value::as_object)
      .and_then(|deps| deps.get(name))
      .and_then(Value::as_str)
  }

  /// Overwrite an existing dependency entry in place (order preserved).
  ///
  /// Returns false when the group or entry does not exist.
  pub fn set_dependency(&mut self, group: DependencyGroup, name: &str, spec: &str) -> bool {
    match self
      .document
      .get_mut(group.key())
      .and_then(Value::as_object_mut)
      .and_then(|deps| deps.get_mut(name))
    {
      Some(slot) => {
        *slot = Value::String(spec.to_string());
        true
      }
      None => false,
    }
  }
}

/// Load, set `version`, save
pub fn set_version(path: &Path, version: &str) -> ReleaseResult<()> {
  let mut manifest = Manifest::load(path)?;
  manifest.set_version(version);
  manifest.save(path)
}

/// True for paths whose file name is package.json
pub fn is_manifest(path: &Path) -> bool {
  path.file_name().is_some_and(|name| name == MANIFEST_FILE)
}
