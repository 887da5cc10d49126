//! Version resolution: release target + current version -> new version

use crate::core::error::{ReleaseError, ReleaseResult};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Semantic version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
  Major,
  Minor,
  Patch,
}

impl BumpKind {
  /// Apply bump to a semver version
  ///
  /// The named component is incremented, lower components reset to zero and
  /// pre-release/build metadata dropped.
  pub fn apply(&self, version: &semver::Version) -> semver::Version {
    match self {
      BumpKind::Major => semver::Version::new(version.major + 1, 0, 0),
      BumpKind::Minor => semver::Version::new(version.major, version.minor + 1, 0),
      BumpKind::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
    }
  }
}

/// What the operator asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTarget {
  Bump(BumpKind),
  Draft,
  /// `v<version>`: used verbatim
  Explicit(String),
}

impl FromStr for ReleaseTarget {
  type Err = ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "major" => Ok(ReleaseTarget::Bump(BumpKind::Major)),
      "minor" => Ok(ReleaseTarget::Bump(BumpKind::Minor)),
      "patch" => Ok(ReleaseTarget::Bump(BumpKind::Patch)),
      "draft" => Ok(ReleaseTarget::Draft),
      other => match other.strip_prefix('v') {
        Some(explicit) => {
          semver::Version::parse(explicit).map_err(|e| ReleaseError::InvalidVersion {
            version: explicit.to_string(),
            reason: e.to_string(),
          })?;
          Ok(ReleaseTarget::Explicit(explicit.to_string()))
        }
        None => Err(ReleaseError::with_help(
          format!("Unknown release target '{}'", other),
          "Use one of: major, minor, patch, draft, v<version> (e.g. v1.2.3)",
        )),
      },
    }
  }
}

impl fmt::Display for ReleaseTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseTarget::Bump(BumpKind::Major) => write!(f, "major"),
      ReleaseTarget::Bump(BumpKind::Minor) => write!(f, "minor"),
      ReleaseTarget::Bump(BumpKind::Patch) => write!(f, "patch"),
      ReleaseTarget::Draft => write!(f, "draft"),
      ReleaseTarget::Explicit(version) => write!(f, "v{}", version),
    }
  }
}

/// Source of the numeric part of draft versions
pub trait DraftIdGenerator {
  /// A number in `0..=99_999`
  fn next_id(&self) -> u32;
}

/// Thread-local RNG; collisions are possible and accepted
pub struct RandomDraftId;

impl DraftIdGenerator for RandomDraftId {
  fn next_id(&self) -> u32 {
    rand::thread_rng().gen_range(0..100_000)
  }
}

/// Result of version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
  pub old: String,
  pub new: String,
  pub is_draft: bool,
}

/// Compute the new version for `target` starting from `current`
pub fn resolve(current: &str, target: &ReleaseTarget, ids: &dyn DraftIdGenerator) -> ReleaseResult<ResolvedVersion> {
  let (new, is_draft) = match target {
    ReleaseTarget::Bump(kind) => {
      let parsed = semver::Version::parse(current).map_err(|e| ReleaseError::InvalidVersion {
        version: current.to_string(),
        reason: e.to_string(),
      })?;
      (kind.apply(&parsed).to_string(), false)
    }
    ReleaseTarget::Explicit(version) => (version.clone(), false),
    ReleaseTarget::Draft => (format!("{}-draft.{:05}", current, ids.next_id() % 100_000), true),
  };

  Ok(ResolvedVersion {
    old: current.to_string(),
    new,
    is_draft,
  })
}
