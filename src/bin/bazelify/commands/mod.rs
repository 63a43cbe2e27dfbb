//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use bazelify::util::config::{global_config_path, load_config, project_config_path};
use bazelify::util::{Config, Shell};
use bazelify::Workspace;

pub mod fmt;
pub mod migrate;
pub mod reclassify;
pub mod scan;

/// State shared by every command: where we are, what the config says, and
/// where output goes.
pub struct Context {
    pub cwd: PathBuf,
    pub root: PathBuf,
    pub config: Config,
    pub shell: Shell,
}

impl Context {
    pub fn new(workspace: Option<&Path>, shell: Shell) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let root = match workspace {
            Some(dir) => cwd.join(dir),
            None => cwd.clone(),
        };

        let config = load_config(global_config_path().as_deref(), &project_config_path(&root));

        Ok(Context {
            cwd,
            root,
            config,
            shell,
        })
    }

    /// The workspace described by the (possibly overridden) config.
    pub fn workspace(&self) -> Result<Workspace> {
        Workspace::new(&self.root, self.config.library_root(), self.config.test_root())
    }

    /// Resolve a path given on the command line against the cwd.
    pub fn cli_path(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }
}
