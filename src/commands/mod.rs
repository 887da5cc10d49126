//! CLI commands for release-me

pub mod release;

pub use release::run_release;
