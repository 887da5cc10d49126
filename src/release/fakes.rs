//! In-memory collaborators for pipeline tests
//!
//! Every fake appends to a shared journal so tests can assert on the exact call
//! order across version control, registry and scripts.

use crate::changelog::ChangelogGenerator;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::vcs::{CommitInfo, Vcs};
use crate::node::registry::Registry;
use crate::node::scripts::PackageScripts;
use crate::release::version::DraftIdGenerator;
use crate::ui::prompt::Confirm;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shared, ordered call log
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
  Rc::new(RefCell::new(Vec::new()))
}

/// Git stand-in over a real directory
///
/// Tracked files are declared up front. `reset_hard` restores their content as
/// of construction (or of the last commit); files that did not exist then are
/// removed again.
pub struct FakeVcs {
  root: PathBuf,
  tracked: Vec<PathBuf>,
  status: String,
  tags: RefCell<BTreeSet<String>>,
  commits: Vec<String>,
  baseline: RefCell<BTreeMap<PathBuf, Option<Vec<u8>>>>,
  history_queries: RefCell<Vec<Option<String>>>,
  journal: Journal,
}

impl FakeVcs {
  pub fn new(root: impl AsRef<Path>, tracked: &[&str]) -> Self {
    let root = root.as_ref().to_path_buf();
    let tracked: Vec<PathBuf> = tracked.iter().map(|rel| root.join(rel)).collect();
    let vcs = Self {
      root,
      tracked,
      status: String::new(),
      tags: RefCell::new(BTreeSet::new()),
      commits: Vec::new(),
      baseline: RefCell::new(BTreeMap::new()),
      history_queries: RefCell::new(Vec::new()),
      journal: journal(),
    };
    vcs.snapshot();
    vcs
  }

  pub fn with_journal(mut self, journal: &Journal) -> Self {
    self.journal = Rc::clone(journal);
    self
  }

  pub fn with_status(mut self, status: &str) -> Self {
    self.status = status.to_string();
    self
  }

  pub fn with_tag(self, tag: &str) -> Self {
    self.tags.borrow_mut().insert(tag.to_string());
    self
  }

  pub fn with_commits(mut self, messages: &[&str]) -> Self {
    self.commits = messages.iter().map(|m| m.to_string()).collect();
    self
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.borrow().contains(tag)
  }

  pub fn history_queries(&self) -> Vec<Option<String>> {
    self.history_queries.borrow().clone()
  }

  /// Remember the current content of the tracked files and the changelog
  fn snapshot(&self) {
    let mut baseline = self.baseline.borrow_mut();
    baseline.clear();
    let changelog = self.root.join("CHANGELOG.md");
    for path in self.tracked.iter().chain(std::iter::once(&changelog)) {
      baseline.insert(path.clone(), fs::read(path).ok());
    }
  }

  fn record(&self, entry: impl Into<String>) {
    self.journal.borrow_mut().push(entry.into());
  }
}

impl Vcs for FakeVcs {
  fn status_porcelain(&self) -> ReleaseResult<String> {
    Ok(self.status.clone())
  }

  fn list_files(&self, dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
    Ok(self.tracked.iter().filter(|p| p.starts_with(dir)).cloned().collect())
  }

  fn diff(&self, paths: &[PathBuf]) -> ReleaseResult<String> {
    Ok(
      paths
        .iter()
        .map(|p| format!("diff --git {}\n", p.display()))
        .collect(),
    )
  }

  fn add_all(&self) -> ReleaseResult<()> {
    self.record("git add -A");
    Ok(())
  }

  fn commit(&self, message: &str) -> ReleaseResult<()> {
    self.record(format!("git commit {}", message));
    self.snapshot();
    Ok(())
  }

  fn tag(&self, name: &str) -> ReleaseResult<()> {
    self.record(format!("git tag {}", name));
    self.tags.borrow_mut().insert(name.to_string());
    Ok(())
  }

  fn tag_exists(&self, name: &str) -> ReleaseResult<bool> {
    Ok(self.has_tag(name))
  }

  fn push(&self) -> ReleaseResult<()> {
    self.record("git push");
    Ok(())
  }

  fn push_tags(&self) -> ReleaseResult<()> {
    self.record("git push --tags");
    Ok(())
  }

  fn reset_hard(&self) -> ReleaseResult<()> {
    self.record("git reset --hard");
    for (path, content) in self.baseline.borrow().iter() {
      match content {
        Some(bytes) => fs::write(path, bytes)?,
        None if path.exists() => fs::remove_file(path)?,
        None => {}
      }
    }
    Ok(())
  }

  fn commit_messages(&self, since: Option<&str>, _path: &Path) -> ReleaseResult<Vec<CommitInfo>> {
    self.history_queries.borrow_mut().push(since.map(str::to_string));
    Ok(
      self
        .commits
        .iter()
        .enumerate()
        .map(|(i, message)| CommitInfo {
          sha: format!("{:040x}", i),
          author: "Test".to_string(),
          message: message.clone(),
        })
        .collect(),
    )
  }
}

/// Registry that only records what would have been published
pub struct FakeRegistry {
  journal: Journal,
}

impl FakeRegistry {
  pub fn new(journal: &Journal) -> Self {
    Self {
      journal: Rc::clone(journal),
    }
  }
}

impl Registry for FakeRegistry {
  fn publish(&self, dir: &Path, tag: Option<&str>) -> ReleaseResult<()> {
    let entry = match tag {
      Some(tag) => format!("publish {} --tag {}", dir.display(), tag),
      None => format!("publish {}", dir.display()),
    };
    self.journal.borrow_mut().push(entry);
    Ok(())
  }

  fn remove_dist_tag(&self, package: &str, tag: &str) -> ReleaseResult<()> {
    self.journal.borrow_mut().push(format!("dist-tag rm {} {}", package, tag));
    Ok(())
  }
}

/// Build/install scripts; the build can be made to fail
pub struct FakeScripts {
  journal: Journal,
  build_exit: Option<i32>,
}

impl FakeScripts {
  pub fn new(journal: &Journal) -> Self {
    Self {
      journal: Rc::clone(journal),
      build_exit: None,
    }
  }

  pub fn failing_build(mut self, code: i32) -> Self {
    self.build_exit = Some(code);
    self
  }
}

impl PackageScripts for FakeScripts {
  fn build(&self, dir: &Path) -> ReleaseResult<()> {
    self.journal.borrow_mut().push(format!("build {}", dir.display()));
    match self.build_exit {
      Some(code) => Err(ReleaseError::Subprocess {
        command: "pnpm run build".to_string(),
        code: Some(code),
        output: String::new(),
      }),
      None => Ok(()),
    }
  }

  fn update_lockfile(&self, dir: &Path) -> ReleaseResult<()> {
    self.journal.borrow_mut().push(format!("install {}", dir.display()));
    Ok(())
  }
}

/// Changelog with fixed content
pub struct FakeChangelog {
  journal: Journal,
}

impl FakeChangelog {
  pub fn new(journal: &Journal) -> Self {
    Self {
      journal: Rc::clone(journal),
    }
  }
}

impl ChangelogGenerator for FakeChangelog {
  fn generate(&self, _dir: &Path, old: &str, new: &str) -> ReleaseResult<String> {
    self.journal.borrow_mut().push(format!("changelog {} -> {}", old, new));
    Ok(format!("## [{}] - 2026-01-01\n\n### Bug Fixes\n\n- something\n\n", new))
  }
}

/// Confirmation prompt with a canned answer
pub struct ScriptedConfirm {
  journal: Journal,
  answer: bool,
}

impl ScriptedConfirm {
  pub fn new(journal: &Journal, answer: bool) -> Self {
    Self {
      journal: Rc::clone(journal),
      answer,
    }
  }
}

impl Confirm for ScriptedConfirm {
  fn confirm(&self, _question: &str) -> io::Result<bool> {
    self.journal.borrow_mut().push("confirm".to_string());
    Ok(self.answer)
  }
}

pub struct FixedDraftId(pub u32);

impl DraftIdGenerator for FixedDraftId {
  fn next_id(&self) -> u32 {
    self.0
  }
}
