//! Node.js package tooling: package.json store, registry and package-manager scripts

pub mod manifest;
pub mod registry;
pub mod scripts;
