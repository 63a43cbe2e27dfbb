//! Workspace - the directory tree being migrated.
//!
//! Labels (`//path/to/dir`) are anchored at the workspace root, and the
//! source roots are stored relative to it so they can be handed to the
//! dependency resolver as content roots.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::errors::MigrateError;
use crate::util::fs::{relative_path, slash_path};

/// A workspace containing a library source root and a test source root.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Canonical workspace root
    root: PathBuf,

    /// Library source root, as configured
    library_root: PathBuf,

    /// Test source root, as configured
    test_root: PathBuf,
}

impl Workspace {
    /// Create a workspace. The root must exist; the source roots are
    /// checked when they are scanned.
    pub fn new(
        root: &Path,
        library_root: impl Into<PathBuf>,
        test_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let root = root
            .canonicalize()
            .map_err(|e| MigrateError::io(root, e))?;

        Ok(Workspace {
            root,
            library_root: library_root.into(),
            test_root: test_root.into(),
        })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the library source root.
    pub fn library_dir(&self) -> PathBuf {
        self.root.join(&self.library_root)
    }

    /// Absolute path of the test source root.
    pub fn test_dir(&self) -> PathBuf {
        self.root.join(&self.test_root)
    }

    /// Library root as a content root for the resolver.
    pub fn library_content_root(&self) -> String {
        self.relative(&self.library_dir())
    }

    /// Test root as a content root for the resolver.
    pub fn test_content_root(&self) -> String {
        self.relative(&self.test_dir())
    }

    /// The label of the target declared in `dir`'s manifest.
    pub fn label(&self, dir: &Path) -> String {
        let rel = self.relative(dir);
        if rel.is_empty() {
            let name = self
                .root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("//:{}", name)
        } else {
            format!("//{}", rel)
        }
    }

    /// A workspace-relative file reference.
    pub fn file_reference(&self, file: &Path) -> String {
        self.relative(file)
    }

    fn relative(&self, path: &Path) -> String {
        slash_path(&relative_path(&self.root, path))
    }
}
