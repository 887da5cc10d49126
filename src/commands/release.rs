//! `release-me <target>`: wire the system collaborators into the pipeline

use crate::changelog::GitChangelog;
use crate::core::context::RunContext;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::node::registry::NpmRegistry;
use crate::node::scripts::ConfiguredScripts;
use crate::release::version::RandomDraftId;
use crate::release::{Collaborators, ReleaseOutcome, ReleasePipeline, ReleaseTarget};
use crate::ui::prompt::TerminalPrompt;

/// Run a release of the package in `ctx.root`
pub fn run_release(ctx: &RunContext, git: &SystemGit, target: ReleaseTarget) -> ReleaseResult<()> {
  let registry = NpmRegistry::new(ctx);
  let scripts = ConfiguredScripts::new(ctx);
  let changelog = GitChangelog::new(git);

  let deps = Collaborators {
    vcs: git,
    registry: &registry,
    scripts: &scripts,
    changelog: &changelog,
    confirm: &TerminalPrompt,
    draft_ids: &RandomDraftId,
  };

  tracing::debug!(root = %ctx.root.display(), repo_root = %ctx.repo_root.display(), dev = ctx.dev_mode, %target, "starting release");
  let outcome = ReleasePipeline::new(ctx, deps, target).run()?;
  println!("\n{}", summary(&outcome, &ctx.config.draft_tag));
  Ok(())
}

/// Final summary line(s) for a finished run
pub fn summary(outcome: &ReleaseOutcome, draft_tag: &str) -> String {
  if outcome.is_draft {
    return format!(
      "🧪 Draft {name}@{version} published (dist-tag '{draft_tag}' removed)\n   npm install {name}@{version}",
      name = outcome.package,
      version = outcome.version,
    );
  }

  let mut out = format!("🎉 Released {}@{}", outcome.package, outcome.version);
  if let Some((name, version)) = &outcome.boilerplate {
    out.push_str(&format!("\n   + {}@{}", name, version));
  }
  if !outcome.updated_manifests.is_empty() {
    out.push_str(&format!("\n   {} dependent manifest(s) updated", outcome.updated_manifests.len()));
  }
  out
}
