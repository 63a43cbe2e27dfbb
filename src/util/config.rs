//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.bazelify/config.toml` - user-wide defaults
//! - Project: `<workspace>/bazelify.toml` - project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::rules::RuleSet;
use crate::util::process::expand_home;

/// Project config file name, looked up in the workspace root.
pub const PROJECT_CONFIG_NAME: &str = "bazelify.toml";

/// Default library source root, relative to the workspace root.
pub const DEFAULT_LIBRARY_ROOT: &str = "core/src/main/java";

/// Default test source root, relative to the workspace root.
pub const DEFAULT_TEST_ROOT: &str = "core/src/test/java";

/// Default dependency resolver program.
pub const DEFAULT_RESOLVER: &str = "~/bin/jadep";

/// Default flag used to hand content roots to the resolver.
pub const DEFAULT_CONTENT_ROOTS_FLAG: &str = "-content_roots";

/// Default formatter program.
pub const DEFAULT_FORMATTER: &str = "java";

/// bazelify configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source root locations
    pub layout: LayoutConfig,

    /// Manifest conventions
    pub rules: RulesConfig,

    /// External dependency resolver
    pub resolver: ResolverConfig,

    /// External formatter
    pub formatter: FormatterConfig,
}

/// Where the source roots live, relative to the workspace root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub library_root: Option<PathBuf>,
    pub test_root: Option<PathBuf>,
}

/// Manifest conventions. Unset fields fall back to [`RuleSet::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RulesConfig {
    /// Compilation-unit file suffix (e.g. `.java`)
    pub suffix: Option<String>,

    /// Manifest file name (e.g. `BUILD`)
    pub manifest_name: Option<String>,

    /// Rule used for library targets
    pub library_kind: Option<String>,

    /// Rule used for test targets
    pub test_kind: Option<String>,

    /// Default visibility label for every package
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Program to run; a leading `~` expands to the home directory
    pub program: Option<String>,

    /// Flag carrying the comma-joined content roots
    pub content_roots_flag: Option<String>,

    /// Extra arguments placed before the content roots
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatterConfig {
    pub program: Option<String>,

    /// Arguments placed before the file path; `[]` runs the program with
    /// the file path alone
    pub args: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.layout.library_root.is_some() {
            self.layout.library_root = other.layout.library_root;
        }
        if other.layout.test_root.is_some() {
            self.layout.test_root = other.layout.test_root;
        }

        if other.rules.suffix.is_some() {
            self.rules.suffix = other.rules.suffix;
        }
        if other.rules.manifest_name.is_some() {
            self.rules.manifest_name = other.rules.manifest_name;
        }
        if other.rules.library_kind.is_some() {
            self.rules.library_kind = other.rules.library_kind;
        }
        if other.rules.test_kind.is_some() {
            self.rules.test_kind = other.rules.test_kind;
        }
        if other.rules.visibility.is_some() {
            self.rules.visibility = other.rules.visibility;
        }

        if other.resolver.program.is_some() {
            self.resolver.program = other.resolver.program;
        }
        if other.resolver.content_roots_flag.is_some() {
            self.resolver.content_roots_flag = other.resolver.content_roots_flag;
        }
        if other.resolver.args.is_some() {
            self.resolver.args = other.resolver.args;
        }

        if other.formatter.program.is_some() {
            self.formatter.program = other.formatter.program;
        }
        if other.formatter.args.is_some() {
            self.formatter.args = other.formatter.args;
        }
    }

    pub fn library_root(&self) -> PathBuf {
        self.layout
            .library_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY_ROOT))
    }

    pub fn test_root(&self) -> PathBuf {
        self.layout
            .test_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEST_ROOT))
    }

    /// Resolve the manifest conventions, filling unset fields with defaults.
    pub fn rule_set(&self) -> RuleSet {
        let defaults = RuleSet::default();
        RuleSet {
            suffix: self.rules.suffix.clone().unwrap_or(defaults.suffix),
            manifest_name: self
                .rules
                .manifest_name
                .clone()
                .unwrap_or(defaults.manifest_name),
            library_kind: self
                .rules
                .library_kind
                .clone()
                .unwrap_or(defaults.library_kind),
            test_kind: self.rules.test_kind.clone().unwrap_or(defaults.test_kind),
            visibility: self.rules.visibility.clone().unwrap_or(defaults.visibility),
        }
    }

    /// The resolver program with `~` expanded.
    pub fn resolver_program(&self) -> PathBuf {
        expand_home(self.resolver.program.as_deref().unwrap_or(DEFAULT_RESOLVER))
    }

    pub fn content_roots_flag(&self) -> String {
        self.resolver
            .content_roots_flag
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_ROOTS_FLAG.to_string())
    }

    /// Extra resolver arguments, none by default.
    pub fn resolver_args(&self) -> Vec<String> {
        self.resolver.args.clone().unwrap_or_default()
    }

    /// The formatter program with `~` expanded.
    pub fn formatter_program(&self) -> PathBuf {
        expand_home(self.formatter.program.as_deref().unwrap_or(DEFAULT_FORMATTER))
    }

    /// Formatter arguments, defaulting to an in-place google-java-format run.
    pub fn formatter_args(&self) -> Vec<String> {
        self.formatter.args.clone().unwrap_or_else(|| {
            vec![
                "-jar".to_string(),
                "google-java-format-all-deps.jar".to_string(),
                "--replace".to_string(),
            ]
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`bazelify.toml`)
/// 2. Global config (`~/.bazelify/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (`~/.bazelify`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".bazelify"))
}

/// Get the global config path (`~/.bazelify/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<workspace>/bazelify.toml`).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(PROJECT_CONFIG_NAME)
}
