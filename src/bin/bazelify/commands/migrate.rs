//! `bazelify migrate` command

use anyhow::Result;

use super::Context;
use crate::cli::MigrateArgs;
use bazelify::ops::{migrate, ExternalResolver, MigrateOptions};
use bazelify::util::Config;

pub fn execute(args: MigrateArgs, mut ctx: Context) -> Result<()> {
    // CLI flags override config files.
    let mut overrides = Config::default();
    overrides.layout.library_root = args.library_root;
    overrides.layout.test_root = args.test_root;
    overrides.rules.suffix = args.suffix;
    overrides.resolver.program = args.resolver;
    ctx.config.merge(overrides);

    let workspace = ctx.workspace()?;
    let resolver = ExternalResolver::new(ctx.config.resolver_program(), &workspace, &ctx.shell)
        .with_args(ctx.config.resolver_args())
        .with_content_roots_flag(ctx.config.content_roots_flag());

    let opts = MigrateOptions {
        workspace,
        rules: ctx.config.rule_set(),
    };

    let report = migrate(&opts, &resolver, &ctx.shell)?;

    if !report.resolved_cleanly() {
        ctx.shell
            .note("dependency edges may be incomplete; rerun after fixing the resolver");
    }
    ctx.shell.json(&report)?;

    Ok(())
}
