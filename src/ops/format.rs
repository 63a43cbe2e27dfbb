//! Source formatting via an external formatter.
//!
//! Not part of the migration itself; a deployment may run it before or
//! after migrating. The formatter rewrites each file in place.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::MigrateError;
use crate::ops::scan::scan_units;
use crate::util::process::ProcessBuilder;
use crate::util::shell::{Shell, Status};

/// External formatter command: `program args... <file>`.
#[derive(Debug, Clone)]
pub struct Formatter {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Result of a formatting run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatReport {
    pub formatted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl Formatter {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Formatter {
            program: program.into(),
            args,
        }
    }

    pub fn command(&self, file: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).args(&self.args).arg(file)
    }
}

/// Format one unit file, or every unit file in a tree.
///
/// A file path is formatted regardless of its suffix. Files the formatter
/// rejects are listed in the report; failing to start the formatter at all
/// is an error.
pub fn format_path(
    path: &Path,
    formatter: &Formatter,
    suffix: &str,
    shell: &Shell,
) -> Result<FormatReport> {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        scan_units(path, suffix)?
    } else {
        return Err(MigrateError::not_found(path).into());
    };

    let mut report = FormatReport::default();
    for file in files {
        shell.status(Status::Formatting, file.display());
        let status = formatter.command(&file).status()?;
        if status.success() {
            report.formatted.push(file);
        } else {
            tracing::debug!("formatter failed on {} ({:?})", file.display(), status.code());
            shell.warn(format!("formatter failed on {}", file.display()));
            report.failed.push(file);
        }
    }

    shell.summary(
        Status::Finished,
        format!(
            "formatted {} file(s), {} failed",
            report.formatted.len(),
            report.failed.len()
        ),
    );
    Ok(report)
}
