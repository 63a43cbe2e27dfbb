//! The full migration: scan, synthesize, resolve, reclassify.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::{RuleSet, Workspace};
use crate::ops::reclassify::reclassify;
use crate::ops::resolve::{run_pass, DependencyResolver, ResolutionRequest, ResolveOutcome};
use crate::ops::scan::{scan, scan_units, unit_directories};
use crate::ops::synthesize::synthesize;
use crate::util::shell::{Shell, Status};

/// Options for a migration run.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub workspace: Workspace,
    pub rules: RuleSet,
}

/// What a migration run did.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateReport {
    /// Directories under the library root that got a manifest
    pub library_dirs: Vec<PathBuf>,

    /// Directories under the test root that got a manifest
    pub test_dirs: Vec<PathBuf>,

    /// Directories found under both roots
    pub overlapping_dirs: Vec<PathBuf>,

    /// What the resolver was asked on each pass
    pub library_request: ResolutionRequest,
    pub test_request: ResolutionRequest,

    pub library_pass: ResolveOutcome,
    pub test_pass: ResolveOutcome,

    /// Manifests whose targets were turned into tests
    pub reclassified: Vec<PathBuf>,
}

impl MigrateReport {
    /// Whether both resolver passes succeeded.
    pub fn resolved_cleanly(&self) -> bool {
        self.library_pass.is_success() && self.test_pass.is_success()
    }
}

/// Migrate a workspace.
///
/// Both roots get freshly generated manifests before their resolver pass,
/// so any `BUILD` file already present in a unit directory under the
/// library root or the test root is replaced, hand-written content and all.
///
/// Resolver failures are recorded in the report and do not stop the run.
/// Missing roots and I/O failures abort it, leaving whatever was already
/// written in place; rerunning starts over from scratch.
pub fn migrate(
    opts: &MigrateOptions,
    resolver: &dyn DependencyResolver,
    shell: &Shell,
) -> Result<MigrateReport> {
    let ws = &opts.workspace;
    let rules = &opts.rules;

    // Library root.
    let library_root = ws.library_dir();
    shell.summary(Status::Scanning, library_root.display());
    let library_dirs = scan(&library_root, &rules.suffix)?;
    tracing::info!("found {} library directories", library_dirs.len());

    for path in synthesize(&library_dirs, rules)? {
        shell.status(Status::Created, path.display());
    }

    let library_request = ResolutionRequest::library_pass(ws, &library_dirs);
    let library_pass = run_pass(resolver, &library_request, "library", shell)?;

    // Test root.
    let test_root = ws.test_dir();
    shell.summary(Status::Scanning, test_root.display());
    let test_units = scan_units(&test_root, &rules.suffix)?;
    let test_dirs = unit_directories(&test_units);
    tracing::info!(
        "found {} test units in {} directories",
        test_units.len(),
        test_dirs.len()
    );

    let overlapping_dirs = overlap(&library_dirs, &test_dirs);
    for dir in &overlapping_dirs {
        shell.warn(format!(
            "{} is under both the library and the test root",
            dir.display()
        ));
    }

    for path in synthesize(&test_dirs, rules)? {
        shell.status(Status::Created, path.display());
    }

    let test_request = ResolutionRequest::test_pass(ws, &test_units);
    let test_pass = run_pass(resolver, &test_request, "test", shell)?;

    let reclassified = reclassify(&test_dirs, rules)?;
    for path in &reclassified {
        shell.status(Status::Updated, path.display());
    }

    shell.summary(
        Status::Finished,
        format!(
            "{} library and {} test manifests",
            library_dirs.len(),
            test_dirs.len()
        ),
    );

    Ok(MigrateReport {
        library_dirs: library_dirs.into_iter().collect(),
        test_dirs: test_dirs.into_iter().collect(),
        overlapping_dirs,
        library_request,
        test_request,
        library_pass,
        test_pass,
        reclassified,
    })
}

fn overlap(a: &BTreeSet<PathBuf>, b: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    a.intersection(b).cloned().collect()
}
