//! Core building blocks shared by every release step
//!
//! - **config**: release.toml parsing and validation
//! - **context**: `RunContext`, built once and threaded through every step
//! - **error**: error types with contextual help messages and exit codes
//! - **process**: blocking subprocess execution
//! - **vcs**: version-control abstraction (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod vcs;
