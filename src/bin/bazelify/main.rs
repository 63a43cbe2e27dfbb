//! bazelify CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use bazelify::util::Shell;
use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("bazelify=debug")
    } else {
        EnvFilter::new("bazelify=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = matches!(&cli.command, Commands::Migrate(args) if args.json);
    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, json);
    let ctx = commands::Context::new(cli.workspace.as_deref(), shell)?;

    match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args, ctx),
        Commands::Scan(args) => commands::scan::execute(args, ctx),
        Commands::Reclassify(args) => commands::reclassify::execute(args, ctx),
        Commands::Fmt(args) => commands::fmt::execute(args, ctx),
    }
}
