//! `bazelify fmt` command

use anyhow::{bail, Result};

use super::Context;
use crate::cli::FmtArgs;
use bazelify::ops::{format_path, Formatter};

pub fn execute(args: FmtArgs, ctx: Context) -> Result<()> {
    let path = match args.path {
        Some(path) => ctx.cli_path(&path),
        None => ctx.cwd.clone(),
    };

    let formatter = Formatter::new(ctx.config.formatter_program(), ctx.config.formatter_args());
    let rules = ctx.config.rule_set();

    let report = format_path(&path, &formatter, &rules.suffix, &ctx.shell)?;
    if !report.failed.is_empty() {
        bail!("formatter failed on {} file(s)", report.failed.len());
    }

    Ok(())
}
