//! Migration error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::build_file::ManifestError;

/// Fatal migration errors.
///
/// A failing dependency resolver is deliberately not represented here: its
/// exit status is recorded in the report and the run carries on.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// A source root, manifest or path to format does not exist.
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading, writing or walking the filesystem failed.
    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An existing manifest could not be parsed.
    #[error("malformed manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },
}

impl MigrateError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        MigrateError::NotFound { path: path.into() }
    }

    /// Classify an I/O error, mapping `NotFound` to [`MigrateError::NotFound`].
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            MigrateError::not_found(path)
        } else {
            MigrateError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MigrateError::NotFound { .. })
    }
}
