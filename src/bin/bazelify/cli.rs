//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bazelify::util::shell::ColorChoice;

/// bazelify - migrate a source tree to per-directory BUILD files
#[derive(Parser)]
#[command(name = "bazelify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Workspace root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate BUILD files, resolve dependencies, and mark tests
    Migrate(MigrateArgs),

    /// List the directories that would get a BUILD file
    Scan(ScanArgs),

    /// Turn library targets into test targets under a root
    Reclassify(ReclassifyArgs),

    /// Run the external formatter over a file or tree
    Fmt(FmtArgs),
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Library source root, relative to the workspace
    #[arg(long)]
    pub library_root: Option<PathBuf>,

    /// Test source root, relative to the workspace
    #[arg(long)]
    pub test_root: Option<PathBuf>,

    /// Compilation-unit file suffix
    #[arg(long)]
    pub suffix: Option<String>,

    /// Dependency resolver program
    #[arg(long)]
    pub resolver: Option<String>,

    /// Print the migration report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Root to scan (defaults to the library root)
    pub root: Option<PathBuf>,

    /// Scan the test root instead of the library root
    #[arg(long, conflicts_with = "root")]
    pub test: bool,

    /// Compilation-unit file suffix
    #[arg(long)]
    pub suffix: Option<String>,
}

#[derive(Args)]
pub struct ReclassifyArgs {
    /// Root whose manifests to reclassify (defaults to the test root)
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct FmtArgs {
    /// File or directory to format (defaults to the current directory)
    pub path: Option<PathBuf>,
}
