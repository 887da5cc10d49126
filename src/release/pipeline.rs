//! Release pipeline state machine
//!
//! ```text
//! Start -> PreflightClean -> PackageResolved -> VersionResolved -+-> draft path ---+-> Done
//!                                                                +-> release path -+
//! ```
//!
//! Every step returns a `ReleaseResult`; the first error aborts the run and
//! leaves the workspace in its last-written state. On the release path the
//! confirmation gate sits after all file mutations and before the first
//! irreversible action (lockfile install, commit, publish, push).

use crate::changelog::{self, ChangelogGenerator};
use crate::core::context::RunContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::vcs::Vcs;
use crate::node::manifest;
use crate::node::registry::Registry;
use crate::node::scripts::PackageScripts;
use crate::release::boilerplate::{self, Boilerplate};
use crate::release::macro_patch;
use crate::release::propagate::Propagation;
use crate::release::version::{self, DraftIdGenerator, ReleaseTarget, ResolvedVersion};
use crate::release::workspace::{self, Package};
use crate::ui::progress::FileProgress;
use crate::ui::prompt::Confirm;
use std::path::PathBuf;

/// External collaborators the pipeline drives
pub struct Collaborators<'a> {
  pub vcs: &'a dyn Vcs,
  pub registry: &'a dyn Registry,
  pub scripts: &'a dyn PackageScripts,
  pub changelog: &'a dyn ChangelogGenerator,
  pub confirm: &'a dyn Confirm,
  pub draft_ids: &'a dyn DraftIdGenerator,
}

/// Pipeline states; `Aborted` is the `Err` side of each transition
#[derive(Debug)]
enum ReleaseState {
  Start,
  PreflightClean,
  PackageResolved(Package),
  VersionResolved(Package, ResolvedVersion),
  Done(ReleaseOutcome),
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
  pub package: String,
  pub version: String,
  pub is_draft: bool,
  /// Dependent manifests rewritten by propagation (release path only)
  pub updated_manifests: Vec<PathBuf>,
  /// `(name, version)` of the published boilerplate package
  pub boilerplate: Option<(String, String)>,
}

pub struct ReleasePipeline<'a> {
  ctx: &'a RunContext,
  deps: Collaborators<'a>,
  target: ReleaseTarget,
}

impl<'a> ReleasePipeline<'a> {
  pub fn new(ctx: &'a RunContext, deps: Collaborators<'a>, target: ReleaseTarget) -> Self {
    Self { ctx, deps, target }
  }

  /// Drive the state machine to completion
  pub fn run(&self) -> ReleaseResult<ReleaseOutcome> {
    let mut state = ReleaseState::Start;
    loop {
      state = match state {
        ReleaseState::Done(outcome) => return Ok(outcome),
        other => {
          let next = self.step(other)?;
          tracing::debug!(state = ?next, "release state");
          next
        }
      };
    }
  }

  fn step(&self, state: ReleaseState) -> ReleaseResult<ReleaseState> {
    match state {
      ReleaseState::Start => {
        self.preflight()?;
        Ok(ReleaseState::PreflightClean)
      }
      ReleaseState::PreflightClean => Ok(ReleaseState::PackageResolved(workspace::find_package(self.ctx)?)),
      ReleaseState::PackageResolved(package) => {
        let resolved = self.resolve_version(&package)?;
        Ok(ReleaseState::VersionResolved(package, resolved))
      }
      ReleaseState::VersionResolved(package, resolved) => {
        let outcome = if resolved.is_draft {
          self.draft(&package, &resolved)?
        } else {
          self.release(&package, &resolved)?
        };
        Ok(ReleaseState::Done(outcome))
      }
      ReleaseState::Done(outcome) => Ok(ReleaseState::Done(outcome)),
    }
  }

  fn preflight(&self) -> ReleaseResult<()> {
    println!("🔍 Checking workspace...");
    let status = self.deps.vcs.status_porcelain()?;
    if !status.trim().is_empty() {
      return Err(ReleaseError::DirtyWorkspace { status });
    }
    Ok(())
  }

  fn resolve_version(&self, package: &Package) -> ReleaseResult<ResolvedVersion> {
    if package.version.is_empty() && matches!(self.target, ReleaseTarget::Bump(_) | ReleaseTarget::Draft) {
      return Err(ReleaseError::InvalidVersion {
        version: String::new(),
        reason: format!("{} has no \"version\" field", manifest::MANIFEST_FILE),
      });
    }

    let resolved = version::resolve(&package.version, &self.target, self.deps.draft_ids)?;
    println!("📦 {}: {} -> {} ({})", package.name, resolved.old, resolved.new, self.target);
    Ok(resolved)
  }

  /// Publish under the draft dist-tag, untag, then discard every local change
  fn draft(&self, package: &Package, resolved: &ResolvedVersion) -> ReleaseResult<ReleaseOutcome> {
    let tag = self.ctx.config.draft_tag.as_str();

    manifest::set_version(&self.ctx.manifest_path(), &resolved.new)?;

    println!("🔨 Building {}...", package.name);
    self.deps.scripts.build(&package.dir)?;

    println!("🚀 Publishing {}@{} (dist-tag '{}')...", package.name, resolved.new, tag);
    self.deps.registry.publish(&package.dir, Some(tag))?;
    self.deps.registry.remove_dist_tag(&package.name, tag)?;

    println!("🧹 Restoring working tree...");
    self.deps.vcs.reset_hard()?;

    Ok(ReleaseOutcome {
      package: package.name.clone(),
      version: resolved.new.clone(),
      is_draft: true,
      updated_manifests: Vec::new(),
      boilerplate: None,
    })
  }

  fn release(&self, package: &Package, resolved: &ResolvedVersion) -> ReleaseResult<ReleaseOutcome> {
    let ctx = self.ctx;
    let deps = &self.deps;
    let (old, new) = (resolved.old.as_str(), resolved.new.as_str());

    // File mutations
    let macros = macro_patch::patch_all(ctx, deps.vcs, old, new)?;
    for file in &macros {
      println!("   ✏️  {}", file.display());
    }

    let own_manifest = ctx.manifest_path();
    manifest::set_version(&own_manifest, new)?;

    let manifests = workspace::list_manifests(deps.vcs, &ctx.repo_root)?;
    let updated = self.propagate(package, resolved, &manifests)?;

    let boilerplate = boilerplate::find(&manifests, &ctx.config.boilerplate_prefix, &package.name)?;
    if let Some(bp) = &boilerplate {
      println!("   📦 {}: {} -> {}", bp.name, bp.version_old, bp.version_new);
      bp.bump()?;
    }

    let entry = deps.changelog.generate(&package.dir, old, new)?;
    changelog::prepend(&ctx.changelog_path(), &entry)?;

    // Preview + gate
    let mut touched = vec![own_manifest];
    touched.extend(updated.iter().cloned());
    if let Some(bp) = &boilerplate {
      touched.push(bp.manifest_path.clone());
    }
    touched.sort();
    touched.dedup();
    self.preview(&entry, &touched)?;

    let question = format!("Release {}@{}?", package.name, new);
    if !deps.confirm.confirm(&question)? {
      return Err(ReleaseError::Declined);
    }

    // Irreversible from here on
    println!("🔒 Updating lockfile...");
    deps.scripts.update_lockfile(&ctx.repo_root)?;

    let tag = format!("v{}", new);
    println!("🏷️  Committing and tagging {}...", tag);
    deps.vcs.add_all()?;
    deps.vcs.commit(&format!("release: {}", tag))?;
    deps.vcs.tag(&tag)?;

    println!("🔨 Building {}...", package.name);
    deps.scripts.build(&package.dir)?;

    println!("🚀 Publishing {}@{}...", package.name, new);
    deps.registry.publish(&package.dir, None)?;
    if let Some(bp) = &boilerplate {
      println!("🚀 Publishing {}@{}...", bp.name, bp.version_new);
      deps.registry.publish(bp.dir(), None)?;
    }

    println!("⬆️  Pushing commits and tags...");
    deps.vcs.push()?;
    deps.vcs.push_tags()?;

    Ok(ReleaseOutcome {
      package: package.name.clone(),
      version: new.to_string(),
      is_draft: false,
      updated_manifests: updated,
      boilerplate: boilerplate.map(|Boilerplate { name, version_new, .. }| (name, version_new)),
    })
  }

  fn propagate(
    &self,
    package: &Package,
    resolved: &ResolvedVersion,
    manifests: &[PathBuf],
  ) -> ReleaseResult<Vec<PathBuf>> {
    let propagation = Propagation::new(&package.name, &resolved.old, &resolved.new, !self.ctx.dev_mode);
    let mut progress = FileProgress::new(manifests.len(), "Updating dependents");
    let updated = propagation.apply_all(manifests, |_| progress.inc())?;

    for path in &updated {
      println!("   ✅ {}", path.display());
    }
    Ok(updated)
  }

  fn preview(&self, entry: &str, manifests: &[PathBuf]) -> ReleaseResult<()> {
    let vcs = self.deps.vcs;

    println!("\n📋 Status:\n{}", vcs.status_porcelain()?.trim_end());

    let changelog_path = self.ctx.changelog_path();
    let changelog_diff = vcs.diff(std::slice::from_ref(&changelog_path))?;
    if changelog_diff.trim().is_empty() {
      // New, untracked changelog: there is no diff to show
      println!("\n📝 {} (new):\n{}", changelog_path.display(), entry.trim_end());
    } else {
      println!("\n📝 Changelog:\n{}", changelog_diff.trim_end());
    }

    println!("\n📄 Manifests:\n{}\n", vcs.diff(manifests)?.trim_end());
    Ok(())
  }
}
