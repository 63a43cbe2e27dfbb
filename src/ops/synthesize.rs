//! Manifest synthesis: one generated manifest per unit directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{Manifest, MigrateError, RuleSet};

/// The target name for a unit directory: its final path component.
pub fn target_name(dir: &Path) -> Result<String> {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("cannot derive a target name from `{}`", dir.display()))
}

/// Write a freshly generated manifest into each directory.
///
/// Existing manifests are overwritten, not merged. A failure leaves the
/// directories before it rewritten and the ones after it untouched.
/// Returns the manifest paths in directory order.
pub fn synthesize(dirs: &BTreeSet<PathBuf>, rules: &RuleSet) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let name = target_name(dir)?;
        let path = dir.join(&rules.manifest_name);
        let contents = Manifest::generate(&name, rules).render();

        std::fs::write(&path, contents).map_err(|e| MigrateError::io(&path, e))?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
