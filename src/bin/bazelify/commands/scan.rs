//! `bazelify scan` command

use anyhow::Result;

use super::Context;
use crate::cli::ScanArgs;
use bazelify::ops::scan;

pub fn execute(args: ScanArgs, mut ctx: Context) -> Result<()> {
    if args.suffix.is_some() {
        ctx.config.rules.suffix = args.suffix;
    }
    let rules = ctx.config.rule_set();

    let root = match args.root {
        Some(root) => ctx.cli_path(&root),
        None => {
            let ws = ctx.workspace()?;
            if args.test {
                ws.test_dir()
            } else {
                ws.library_dir()
            }
        }
    };

    for dir in scan(&root, &rules.suffix)? {
        println!("{}", dir.display());
    }

    Ok(())
}
