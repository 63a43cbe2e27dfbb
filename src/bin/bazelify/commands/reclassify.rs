//! `bazelify reclassify` command

use anyhow::Result;

use super::Context;
use crate::cli::ReclassifyArgs;
use bazelify::ops::{reclassify, scan};
use bazelify::util::shell::Status;

pub fn execute(args: ReclassifyArgs, ctx: Context) -> Result<()> {
    let rules = ctx.config.rule_set();
    let root = match args.root {
        Some(root) => ctx.cli_path(&root),
        None => ctx.workspace()?.test_dir(),
    };

    let dirs = scan(&root, &rules.suffix)?;
    let changed = reclassify(&dirs, &rules)?;
    for path in &changed {
        ctx.shell.status(Status::Updated, path.display());
    }

    ctx.shell.summary(
        Status::Finished,
        format!("{} of {} manifests reclassified", changed.len(), dirs.len()),
    );
    Ok(())
}
