//! Synthetic source trees for tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree, built up file by file.
#[derive(Debug)]
pub struct TreeFixture {
    dir: TempDir,
}

impl TreeFixture {
    /// Create an empty tree.
    pub fn new() -> Self {
        TreeFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Add an empty file, creating parent directories.
    pub fn file(self, rel: &str) -> Self {
        self.file_with(rel, "")
    }

    /// Add a file with contents, creating parent directories.
    pub fn file_with(self, rel: &str, contents: &str) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
        self
    }

    /// Add an empty directory.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.path(rel)).expect("failed to create fixture dir");
        self
    }

    /// Finish building. Kept for readability at call sites.
    pub fn build(self) -> Self {
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the tree, as created.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// A path inside the tree, under the canonical root. Matches the paths
    /// a `Workspace` hands out.
    pub fn canonical(&self, rel: &str) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("failed to canonicalize fixture root")
            .join(rel)
    }

    /// Read a file inside the tree.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", rel, e))
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}
