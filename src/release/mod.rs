//! Release orchestration
//!
//! Leaves first:
//!
//! - **workspace**: package discovery and tracked-file scanning
//! - **version**: release targets and version resolution
//! - **propagate**: dependent manifest rewriting
//! - **macro_patch**: version literal in source files
//! - **boilerplate**: `create-<package>` patch counter
//! - **pipeline**: the state machine tying it all together

pub mod boilerplate;
pub mod macro_patch;
pub mod pipeline;
pub mod propagate;
pub mod version;
pub mod workspace;

#[cfg(test)]
pub(crate) mod fakes;

pub use pipeline::{Collaborators, ReleaseOutcome, ReleasePipeline};
pub use version::ReleaseTarget;
