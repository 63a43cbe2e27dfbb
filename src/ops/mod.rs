//! High-level operations.
//!
//! Each stage of the migration lives in its own module; [`migrate`] wires
//! them together.

pub mod format;
pub mod migrate;
pub mod reclassify;
pub mod resolve;
pub mod scan;
pub mod synthesize;

pub use format::{format_path, FormatReport, Formatter};
pub use migrate::{migrate, MigrateOptions, MigrateReport};
pub use reclassify::{reclassify, reclassify_manifest};
pub use resolve::{
    DependencyResolver, ExternalResolver, ResolutionRequest, ResolveOutcome,
};
pub use scan::{scan, scan_units, unit_directories};
pub use synthesize::synthesize;
