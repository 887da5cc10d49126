//! Version macro patching
//!
//! Source files named like the configured macro file (`projectInfo.ts` by
//! default) carry a literal such as `const PROJECT_VERSION = '1.2.3'`. The
//! literal for the old version is replaced by the one for the new version.

use crate::core::context::RunContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::vcs::Vcs;
use crate::release::workspace;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of patching one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroPatch {
  Patched,
  /// Old literal absent; tolerated in dev mode
  Skipped,
}

/// Patch every tracked macro file below the package root
pub fn patch_all(ctx: &RunContext, vcs: &dyn Vcs, old: &str, new: &str) -> ReleaseResult<Vec<PathBuf>> {
  let macro_config = &ctx.config.version_macro;
  let old_snippet = macro_config.snippet(old);
  let new_snippet = macro_config.snippet(new);

  let mut patched = Vec::new();
  for file in workspace::list_named(vcs, &ctx.root, &macro_config.file_name)? {
    match patch_file(&file, &old_snippet, &new_snippet, ctx.dev_mode)? {
      MacroPatch::Patched => patched.push(file),
      MacroPatch::Skipped => {
        tracing::warn!(file = %file.display(), snippet = %old_snippet, "version macro not found, skipping");
        println!("   ⚠️  Version macro not found in {}, skipping (dev mode)", file.display());
      }
    }
  }
  Ok(patched)
}

/// Replace the first occurrence of `old_snippet` in `path`
pub fn patch_file(path: &Path, old_snippet: &str, new_snippet: &str, dev_mode: bool) -> ReleaseResult<MacroPatch> {
  let content =
    fs::read_to_string(path).map_err(|e| ReleaseError::message(format!("Failed to read {}: {}", path.display(), e)))?;

  if !content.contains(old_snippet) {
    if dev_mode {
      return Ok(MacroPatch::Skipped);
    }
    return Err(ReleaseError::MacroNotFound {
      file: path.to_path_buf(),
      snippet: old_snippet.to_string(),
    });
  }

  let patched = content.replacen(old_snippet, new_snippet, 1);
  if patched == content {
    return Err(ReleaseError::MacroUnchanged {
      file: path.to_path_buf(),
    });
  }

  fs::write(path, patched).map_err(|e| ReleaseError::message(format!("Failed to write {}: {}", path.display(), e)))?;
  Ok(MacroPatch::Patched)
}
