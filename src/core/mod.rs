//! Core data structures.
//!
//! - BUILD file syntax and the manifest view on top of it
//! - Manifest conventions for a language
//! - The workspace being migrated
//! - Error types

pub mod build_file;
pub mod errors;
pub mod manifest;
pub mod rules;
pub mod workspace;

pub use build_file::{BuildFile, ManifestError};
pub use errors::MigrateError;
pub use manifest::{Manifest, TargetDecl};
pub use rules::RuleSet;
pub use workspace::Workspace;
