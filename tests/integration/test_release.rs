//! Integration tests for the release path

use crate::helpers::{TestWorkspace, expect_success, run_release_me};
use anyhow::Result;

const MACRO_FILE: &str = "src/projectInfo.ts";

#[test]
fn test_patch_release_commits_tags_publishes_and_pushes() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("", "dep-pkg", "0.4.2", &[])?;
  ws.write_file(MACRO_FILE, "export const PROJECT_VERSION = '0.4.2';\n")?;
  ws.commit("feat: add project info")?;
  ws.write_file("src/index.ts", "export {};\n")?;
  ws.commit("fix(core): handle empty input")?;

  let output = run_release_me(&ws.path, &["patch"], "y\n")?;
  let stdout = expect_success(&output);

  assert!(stdout.contains("🎉 Released dep-pkg@0.4.3"));
  assert!(ws.read_file("package.json")?.contains("\"version\": \"0.4.3\""));
  assert_eq!(ws.read_file(MACRO_FILE)?, "export const PROJECT_VERSION = '0.4.3';\n");

  let changelog = ws.read_file("CHANGELOG.md")?;
  assert!(changelog.starts_with("## [0.4.3] - "));
  assert!(changelog.contains("### Features"));
  assert!(changelog.contains("- **core**: handle empty input"));

  assert_eq!(ws.head_subject()?, "release: v0.4.3");
  assert_eq!(ws.tags()?, vec!["v0.4.3"]);
  assert_eq!(ws.origin_tags()?, vec!["v0.4.3"]);
  assert_eq!(
    ws.git_stdout(&["rev-parse", "HEAD"])?,
    ws.git_stdout(&["rev-parse", "origin/main"])?
  );
  assert_eq!(ws.registry_calls(), vec!["publish"]);
  assert!(ws.is_clean()?);

  Ok(())
}

#[test]
fn test_major_release_updates_dependents_in_monorepo() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let pkg = ws.add_package("packages/dep-pkg", "dep-pkg", "1.0.0", &[])?;
  ws.add_package("apps/web", "web", "0.1.0", &[("dep-pkg", "^1.0.0"), ("left-pad", "^1.3.0")])?;
  ws.add_package("apps/local", "local", "0.1.0", &[("dep-pkg", "link:../../packages/dep-pkg")])?;
  ws.commit("feat: add packages")?;

  let output = run_release_me(&pkg, &["major"], "yes\n")?;
  expect_success(&output);

  let web = ws.read_file("apps/web/package.json")?;
  assert!(web.contains("\"dep-pkg\": \"^2.0.0\""));
  assert!(web.contains("\"left-pad\": \"^1.3.0\""));
  assert!(ws.read_file("apps/local/package.json")?.contains("\"dep-pkg\": \"link:../../packages/dep-pkg\""));
  assert!(ws.read_file("packages/dep-pkg/CHANGELOG.md")?.starts_with("## [2.0.0]"));
  assert_eq!(ws.head_subject()?, "release: v2.0.0");

  Ok(())
}

#[test]
fn test_out_of_sync_dependent_fails_unless_dev() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let pkg = ws.add_package("packages/dep-pkg", "dep-pkg", "1.0.0", &[])?;
  ws.add_package("apps/web", "web", "0.1.0", &[("dep-pkg", "^0.9.0")])?;
  ws.commit("feat: add packages")?;

  let output = run_release_me(&pkg, &["minor"], "y\n")?;
  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("--dev"));
  assert!(ws.registry_calls().is_empty());

  ws.git_stdout(&["reset", "--hard"])?;
  let output = run_release_me(&pkg, &["minor", "--dev"], "y\n")?;
  expect_success(&output);
  assert!(ws.read_file("apps/web/package.json")?.contains("\"dep-pkg\": \"^1.1.0\""));

  Ok(())
}

#[test]
fn test_boilerplate_package_is_bumped_and_published() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let pkg = ws.add_package("packages/widget", "widget", "1.2.0", &[])?;
  ws.add_package("packages/create-widget", "create-widget", "0.0.9", &[])?;
  ws.commit("feat: widget")?;

  let output = run_release_me(&pkg, &["v1.3.0"], "y\n")?;
  let stdout = expect_success(&output);

  assert!(stdout.contains("create-widget@0.0.10"));
  assert!(ws.read_file("packages/create-widget/package.json")?.contains("\"version\": \"0.0.10\""));
  assert_eq!(ws.registry_calls(), vec!["publish", "publish"]);
  assert_eq!(ws.tags()?, vec!["v1.3.0"]);

  Ok(())
}

#[test]
fn test_declined_confirmation_leaves_history_untouched() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("", "dep-pkg", "1.0.0", &[])?;
  let head = ws.commit("feat: first")?;

  let output = run_release_me(&ws.path, &["patch"], "n\n")?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(ws.git_stdout(&["rev-parse", "HEAD"])?, head);
  assert!(ws.tags()?.is_empty());
  assert!(ws.registry_calls().is_empty());
  // The bump stays in the working tree for inspection
  assert!(ws.read_file("package.json")?.contains("\"version\": \"1.0.1\""));

  Ok(())
}

#[test]
fn test_dirty_workspace_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("", "dep-pkg", "1.0.0", &[])?;
  ws.commit("feat: first")?;
  ws.write_file("notes.txt", "wip\n")?;

  let output = run_release_me(&ws.path, &["patch"], "y\n")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("uncommitted changes"));
  assert!(ws.read_file("package.json")?.contains("\"version\": \"1.0.0\""));
  assert!(ws.registry_calls().is_empty());

  Ok(())
}

#[test]
fn test_failing_build_exit_code_is_propagated() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&["sh", "-c", "exit 3"])?;
  ws.add_package("", "dep-pkg", "1.0.0", &[])?;
  ws.commit("feat: first")?;

  let output = run_release_me(&ws.path, &["patch"], "y\n")?;

  assert_eq!(output.status.code(), Some(3));
  assert!(ws.registry_calls().is_empty());
  // Commit and tag happen before the build
  assert_eq!(ws.head_subject()?, "release: v1.0.1");
  assert!(ws.origin_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_unknown_target_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("", "dep-pkg", "1.0.0", &[])?;
  ws.commit("feat: first")?;

  let output = run_release_me(&ws.path, &["sideways"], "")?;

  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown release target"));

  Ok(())
}

#[test]
fn test_missing_package_json_is_reported() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_release_me(&ws.path, &["patch"], "")?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Couldn't find package"));

  Ok(())
}
