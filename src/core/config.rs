use crate::core::error::{ConfigError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for release-me
///
/// Searched in order: release.toml, .release.toml, .config/release.toml.
/// Every field is optional; the defaults describe a pnpm monorepo publishing to npm.
///
/// # Example
///
/// ```toml
/// changelog = "CHANGELOG.md"
/// tolerated_install_errors = ["ERR_PNPM_PEER_DEP_ISSUES"]
///
/// [macro]
/// file_name = "projectInfo.ts"
/// template = "const PROJECT_VERSION = '{version}'"
///
/// [commands]
/// build = ["pnpm", "run", "build"]
/// install = ["pnpm", "install"]
/// registry = "npm"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  /// Changelog file, relative to the package root
  pub changelog: PathBuf,

  #[serde(rename = "macro")]
  pub version_macro: MacroConfig,

  pub commands: CommandsConfig,

  /// Output fragments that turn a failed lockfile update into a warning
  pub tolerated_install_errors: Vec<String>,

  /// Environment variables removed before talking to the registry
  pub unset_env: Vec<String>,

  /// Name prefix of the boilerplate package (`create-<name>`)
  pub boilerplate_prefix: String,

  /// Dist-tag used for draft publishes
  pub draft_tag: String,
}

/// Where the version literal lives in source code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
  /// Exact file name of macro files (matched against the last path component)
  pub file_name: String,

  /// Source line declaring the version; `{version}` is substituted
  pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
  pub build: Vec<String>,
  pub install: Vec<String>,
  /// Program used for `publish` and `dist-tag rm`
  pub registry: String,
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      changelog: PathBuf::from("CHANGELOG.md"),
      version_macro: MacroConfig::default(),
      commands: CommandsConfig::default(),
      tolerated_install_errors: vec!["ERR_PNPM_PEER_DEP_ISSUES".to_string()],
      unset_env: vec!["npm_config_registry".to_string()],
      boilerplate_prefix: "create-".to_string(),
      draft_tag: "draft".to_string(),
    }
  }
}

impl Default for MacroConfig {
  fn default() -> Self {
    Self {
      file_name: "projectInfo.ts".to_string(),
      template: "const PROJECT_VERSION = '{version}'".to_string(),
    }
  }
}

impl Default for CommandsConfig {
  fn default() -> Self {
    Self {
      build: vec!["pnpm".to_string(), "run".to_string(), "build".to_string()],
      install: vec!["pnpm".to_string(), "install".to_string()],
      registry: "npm".to_string(),
    }
  }
}

impl MacroConfig {
  /// Render the macro source line for a version
  pub fn snippet(&self, version: &str) -> String {
    self.template.replace("{version}", version)
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(dir: &Path) -> Option<PathBuf> {
    let candidates = [
      dir.join("release.toml"),
      dir.join(".release.toml"),
      dir.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the first config found under `dirs`, or defaults when there is none
  pub fn load(dirs: &[&Path]) -> ReleaseResult<Self> {
    let Some(config_path) = dirs.iter().find_map(|dir| Self::find_config_path(dir)) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content).map_err(|e| ConfigError::Parse {
      path: config_path.clone(),
      reason: e.to_string(),
    })?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Validate configuration values
  pub fn validate(&self) -> ReleaseResult<()> {
    if !self.version_macro.template.contains("{version}") {
      return Err(
        ConfigError::InvalidField {
          field: "macro.template".to_string(),
          reason: "must contain the `{version}` placeholder".to_string(),
        }
        .into(),
      );
    }

    for (field, command) in [
      ("commands.build", &self.commands.build),
      ("commands.install", &self.commands.install),
    ] {
      if command.first().is_none_or(|program| program.trim().is_empty()) {
        return Err(
          ConfigError::InvalidField {
            field: field.to_string(),
            reason: "must name a program".to_string(),
          }
          .into(),
        );
      }
    }

    if self.commands.registry.trim().is_empty() {
      return Err(
        ConfigError::InvalidField {
          field: "commands.registry".to_string(),
          reason: "must name a program".to_string(),
        }
        .into(),
      );
    }

    if self.draft_tag.trim().is_empty() {
      return Err(
        ConfigError::InvalidField {
          field: "draft_tag".to_string(),
          reason: "must not be empty".to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}
