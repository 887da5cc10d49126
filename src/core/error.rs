//! Error types for release-me with contextual messages and exit codes
//!
//! Every failure aborts the run. The error carries enough context to tell the
//! operator which step failed, and most variants come with a help message
//! describing how to inspect or recover the (possibly half-mutated) workspace.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for release-me
#[derive(Debug)]
pub enum ReleaseError {
  /// The version-control status reported local modifications
  DirtyWorkspace { status: String },

  /// No package manifest with a `name` in the invocation directory
  PackageNotFound { dir: PathBuf, reason: String },

  /// A version string could not be parsed or does not have the expected shape
  InvalidVersion { version: String, reason: String },

  /// Strict-mode lockstep check failed for a dependent manifest
  VersionMismatch {
    manifest: PathBuf,
    dependency: String,
    expected: String,
    found: String,
  },

  /// Manifest read/parse/write failures
  Manifest(ManifestError),

  /// The version macro did not contain the old version literal
  MacroNotFound { file: PathBuf, snippet: String },

  /// Replacing the macro literal left the file unchanged
  MacroUnchanged { file: PathBuf },

  /// An external command exited unsuccessfully
  Subprocess {
    command: String,
    code: Option<i32>,
    output: String,
  },

  /// The operator declined at the confirmation prompt
  Declined,

  /// Configuration errors
  Config(ConfigError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Process exit code for this error.
  ///
  /// A failed subprocess hands its own exit code through; everything else is 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      ReleaseError::Subprocess { code: Some(code), .. } if *code != 0 => *code,
      _ => 1,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::DirtyWorkspace { .. } => {
        Some("Commit or stash your changes first; a release must correspond to a committed tree.".to_string())
      }
      ReleaseError::PackageNotFound { .. } => {
        Some("Run release-me from the package root (the directory holding its package.json).".to_string())
      }
      ReleaseError::VersionMismatch { .. } => Some(
        "Dependents are out of sync with the released package. Fix them by hand, or rerun with --dev to overwrite."
          .to_string(),
      ),
      ReleaseError::MacroNotFound { .. } => Some(
        "The version macro and package.json have drifted apart. Align them, or rerun with --dev to skip the macro."
          .to_string(),
      ),
      ReleaseError::Manifest(e) => e.help_message(),
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Declined => Some(
        "Nothing was committed or published. Inspect `git status` and run `git reset --hard` to discard the changes."
          .to_string(),
      ),
      ReleaseError::Subprocess { .. } | ReleaseError::MacroUnchanged { .. } | ReleaseError::InvalidVersion { .. } => {
        Some("Inspect `git status` / `git diff`, then finish by hand or `git reset --hard` and rerun.".to_string())
      }
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::DirtyWorkspace { status } => {
        write!(f, "Workspace has uncommitted changes:\n{}", status.trim_end())
      }
      ReleaseError::PackageNotFound { dir, reason } => {
        write!(f, "Couldn't find package in {}: {}", dir.display(), reason)
      }
      ReleaseError::InvalidVersion { version, reason } => {
        write!(f, "Invalid version '{}': {}", version, reason)
      }
      ReleaseError::VersionMismatch {
        manifest,
        dependency,
        expected,
        found,
      } => write!(
        f,
        "{} pins {} as '{}', expected '{}'",
        manifest.display(),
        dependency,
        found,
        expected
      ),
      ReleaseError::Manifest(e) => write!(f, "{}", e),
      ReleaseError::MacroNotFound { file, snippet } => {
        write!(f, "Version macro `{}` not found in {}", snippet, file.display())
      }
      ReleaseError::MacroUnchanged { file } => {
        write!(f, "Patching the version macro left {} unchanged", file.display())
      }
      ReleaseError::Subprocess { command, code, output } => {
        match code {
          Some(code) => write!(f, "Command `{}` failed with exit code {}", command, code)?,
          None => write!(f, "Command `{}` was terminated by a signal", command)?,
        }
        if !output.trim().is_empty() {
          write!(f, "\n{}", output.trim_end())?;
        }
        Ok(())
      }
      ReleaseError::Declined => write!(f, "Release aborted at the confirmation prompt"),
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      ReleaseError::Manifest(ManifestError::Parse { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<ManifestError> for ReleaseError {
  fn from(err: ManifestError) -> Self {
    ReleaseError::Manifest(err)
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

/// Manifest (package.json) errors
#[derive(Debug)]
pub enum ManifestError {
  /// File does not exist
  NotFound { path: PathBuf },

  /// File exists but is not a JSON object
  Parse { path: PathBuf, source: serde_json::Error },

  /// Reading or writing the file failed
  Io { path: PathBuf, source: io::Error },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::Parse { .. } => Some("Fix the JSON syntax of the manifest and rerun.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::NotFound { path } => write!(f, "Manifest not found: {}", path.display()),
      ManifestError::Parse { path, source } => {
        write!(f, "Failed to parse manifest {}: {}", path.display(), source)
      }
      ManifestError::Io { path, source } => write!(f, "Manifest I/O error on {}: {}", path.display(), source),
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// release.toml could not be parsed
  Parse { path: PathBuf, reason: String },

  /// A field holds a value release-me cannot work with
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Parse { .. } => Some("Check release.toml against the documented keys.".to_string()),
      ConfigError::InvalidField { field, .. } => Some(format!("Fix or remove `{}` in release.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse config {}: {}", path.display(), reason)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for `{}`: {}", field, reason)
      }
    }
  }
}

/// Result type alias for release-me
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
