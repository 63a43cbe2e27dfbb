//! bazelify - migrate an ad-hoc source tree to per-directory BUILD files.
//!
//! The migration finds every directory holding compilation units, writes a
//! manifest into each, hands the manifests to an external dependency
//! resolver, and finally turns the test root's library targets into test
//! targets.

pub mod core;
pub mod ops;
pub mod util;

/// Fakes and fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Manifest, MigrateError, RuleSet, Workspace};
pub use ops::{migrate, MigrateOptions, MigrateReport};
pub use util::Config;
