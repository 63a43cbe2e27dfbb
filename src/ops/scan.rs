//! Tree scanning: find compilation units and the directories holding them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::core::MigrateError;

/// Every file under `root` whose name ends with `suffix`, sorted.
///
/// Symlinks are followed; a symlink loop is reported as an I/O error.
pub fn scan_units(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(MigrateError::not_found(root).into());
    }

    let mut units = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            MigrateError::io(&path, source)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            units.push(entry.into_path());
        }
    }

    units.sort();
    tracing::debug!("found {} units under {}", units.len(), root.display());
    Ok(units)
}

/// Reduce unit paths to the set of distinct parent directories.
pub fn unit_directories<'a, I>(units: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    units
        .into_iter()
        .filter_map(|unit| unit.parent().map(Path::to_path_buf))
        .collect()
}

/// The distinct directories under `root` holding at least one unit.
pub fn scan(root: &Path, suffix: &str) -> Result<BTreeSet<PathBuf>> {
    let units = scan_units(root, suffix)?;
    Ok(unit_directories(&units))
}
