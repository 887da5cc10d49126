//! Conventional commit parsing and Markdown rendering
//!
//! Uses winnow for the header (`<type>(<scope>)!: <description>`) so odd
//! commit messages are rejected instead of panicking.

use std::collections::BTreeMap;

/// A parsed conventional commit
///
/// Example: `feat(auth): add OAuth2 support`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
  pub commit_type: CommitType,
  pub scope: Option<String>,
  pub description: String,
  /// `Some("")` for a bare `!` marker, `Some(text)` for a `BREAKING CHANGE:` footer
  pub breaking_change: Option<String>,
}

/// Commit types, in the order their sections are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
  Feat,
  Fix,
  Perf,
  Revert,
  Docs,
  Refactor,
  Test,
  Build,
  Ci,
  Chore,
  Style,
  Other,
}

impl CommitType {
  pub fn parse(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "feat" | "feature" => Self::Feat,
      "fix" => Self::Fix,
      "perf" | "performance" => Self::Perf,
      "revert" => Self::Revert,
      "docs" | "doc" => Self::Docs,
      "refactor" => Self::Refactor,
      "test" | "tests" => Self::Test,
      "build" => Self::Build,
      "ci" => Self::Ci,
      "chore" => Self::Chore,
      "style" => Self::Style,
      _ => Self::Other,
    }
  }

  /// Section heading in the changelog
  pub fn heading(&self) -> &'static str {
    match self {
      Self::Feat => "Features",
      Self::Fix => "Bug Fixes",
      Self::Perf => "Performance",
      Self::Revert => "Reverts",
      Self::Docs => "Documentation",
      Self::Refactor => "Refactoring",
      Self::Test => "Tests",
      Self::Build => "Build",
      Self::Ci => "CI",
      Self::Chore => "Chores",
      Self::Style => "Style",
      Self::Other => "Other",
    }
  }
}

impl ConventionalCommit {
  pub fn is_breaking(&self) -> bool {
    self.breaking_change.is_some()
  }

  /// Parse a full commit message; None when the header is not conventional
  pub fn parse(message: &str) -> Option<Self> {
    use winnow::ascii::{alphanumeric1, space0};
    use winnow::combinator::{opt, preceded, terminated};
    use winnow::prelude::*;
    use winnow::token::take_till;

    let (header, rest) = message.split_once('\n').unwrap_or((message, ""));

    let mut parser = (
      alphanumeric1::<_, ()>.map(CommitType::parse),
      opt(preceded('(', terminated(take_till(1.., ')'), ')'))),
      opt('!'),
      ':',
      space0,
      take_till(0.., ['\n', '\r']),
    );

    let Ok((commit_type, scope, bang, _, _, description)) = parser.parse(header.trim_end()) else {
      return None;
    };

    let description = description.trim();
    if description.is_empty() {
      return None;
    }

    let footer = rest.lines().find_map(|line| {
      let (key, value) = line.trim().split_once(':')?;
      let key = key.trim();
      (key.eq_ignore_ascii_case("BREAKING CHANGE") || key.eq_ignore_ascii_case("BREAKING-CHANGE"))
        .then(|| value.trim().to_string())
    });

    Some(Self {
      commit_type,
      scope: scope.map(|s: &str| s.to_string()),
      description: description.to_string(),
      breaking_change: footer.or_else(|| bang.map(|_| String::new())),
    })
  }
}

/// One release section of the changelog
#[derive(Debug, Clone)]
pub struct ChangelogEntry {
  pub version: String,
  /// ISO 8601 date (YYYY-MM-DD)
  pub date: String,
  sections: BTreeMap<CommitType, Vec<ConventionalCommit>>,
}

impl ChangelogEntry {
  pub fn new(version: impl Into<String>, date: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      date: date.into(),
      sections: BTreeMap::new(),
    }
  }

  /// Add a raw commit message; non-conventional messages are ignored
  pub fn add_message(&mut self, message: &str) -> bool {
    match ConventionalCommit::parse(message) {
      Some(commit) => {
        self.sections.entry(commit.commit_type).or_default().push(commit);
        true
      }
      None => false,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.sections.is_empty()
  }

  pub fn to_markdown(&self) -> String {
    let mut out = format!("## [{}] - {}\n\n", self.version, self.date);

    let breaking: Vec<&ConventionalCommit> = self.sections.values().flatten().filter(|c| c.is_breaking()).collect();
    if !breaking.is_empty() {
      out.push_str("### ⚠ BREAKING CHANGES\n\n");
      for commit in breaking {
        let note = match commit.breaking_change.as_deref() {
          Some(text) if !text.is_empty() => text,
          _ => commit.description.as_str(),
        };
        out.push_str(&format!("- {}{}\n", scope_prefix(commit), note));
      }
      out.push('\n');
    }

    // BTreeMap order follows the CommitType declaration order
    for (commit_type, commits) in &self.sections {
      out.push_str(&format!("### {}\n\n", commit_type.heading()));
      for commit in commits {
        out.push_str(&format!("- {}{}\n", scope_prefix(commit), commit.description));
      }
      out.push('\n');
    }

    out
  }
}

fn scope_prefix(commit: &ConventionalCommit) -> String {
  commit
    .scope
    .as_ref()
    .map(|s| format!("**{}**: ", s))
    .unwrap_or_default()
}
