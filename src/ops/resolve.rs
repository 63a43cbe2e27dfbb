//! Dependency resolution handoff.
//!
//! The resolver is an external analyzer (jadep by default) that reads the
//! sources and writes `deps` edges straight into the manifests. We only
//! build its argument list, run it, and record how it exited.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::Workspace;
use crate::util::process::ProcessBuilder;
use crate::util::shell::{Shell, Status};

/// One resolver invocation: which roots to read sources from, and which
/// targets or files to wire up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    pub content_roots: Vec<String>,
    pub targets: Vec<String>,
}

/// How a resolver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveOutcome {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl ResolveOutcome {
    pub fn success() -> Self {
        ResolveOutcome { code: Some(0) }
    }

    pub fn exited(code: i32) -> Self {
        ResolveOutcome { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl std::fmt::Display for ResolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Something that can wire dependency edges into manifests.
pub trait DependencyResolver {
    /// Run one resolution. `Err` is reserved for failing to run at all; a
    /// resolver that ran and failed reports it in the outcome.
    fn resolve(&self, request: &ResolutionRequest) -> Result<ResolveOutcome>;
}

impl ResolutionRequest {
    /// Library pass: every library directory, referenced by label, with the
    /// library root as the only content root.
    pub fn library_pass(ws: &Workspace, dirs: &BTreeSet<PathBuf>) -> Self {
        ResolutionRequest {
            content_roots: vec![ws.library_content_root()],
            targets: dirs.iter().map(|d| ws.label(d)).collect(),
        }
    }

    /// Test pass: every test unit, referenced by file path, with both roots
    /// as content roots.
    pub fn test_pass(ws: &Workspace, units: &[PathBuf]) -> Self {
        ResolutionRequest {
            content_roots: vec![ws.library_content_root(), ws.test_content_root()],
            targets: units.iter().map(|u| ws.file_reference(u)).collect(),
        }
    }

    /// The command-line arguments for a resolver taking content roots via
    /// `flag`.
    pub fn to_args(&self, flag: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(self.targets.len() + 1);
        args.push(format!("{}={}", flag, self.content_roots.join(",")));
        args.extend(self.targets.iter().cloned());
        args
    }
}

/// Runs an external resolver program.
#[derive(Debug, Clone)]
pub struct ExternalResolver<'a> {
    program: PathBuf,
    extra_args: Vec<String>,
    content_roots_flag: String,
    cwd: PathBuf,
    shell: &'a Shell,
}

impl<'a> ExternalResolver<'a> {
    pub fn new(program: impl Into<PathBuf>, ws: &Workspace, shell: &'a Shell) -> Self {
        ExternalResolver {
            program: program.into(),
            extra_args: Vec::new(),
            content_roots_flag: crate::util::config::DEFAULT_CONTENT_ROOTS_FLAG.to_string(),
            cwd: ws.root().to_path_buf(),
            shell,
        }
    }

    /// Arguments placed before the content roots.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_content_roots_flag(mut self, flag: impl Into<String>) -> Self {
        self.content_roots_flag = flag.into();
        self
    }

    /// The process that would run for `request`.
    pub fn command(&self, request: &ResolutionRequest) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.extra_args)
            .args(request.to_args(&self.content_roots_flag))
            .cwd(&self.cwd)
    }
}

impl DependencyResolver for ExternalResolver<'_> {
    fn resolve(&self, request: &ResolutionRequest) -> Result<ResolveOutcome> {
        let cmd = self.command(request);
        self.shell.summary(Status::Resolving, cmd.display_command());

        let status = cmd.status()?;
        Ok(ResolveOutcome {
            code: status.code(),
        })
    }
}

/// Run one resolver pass, logging but not escalating a failed run.
pub fn run_pass(
    resolver: &dyn DependencyResolver,
    request: &ResolutionRequest,
    pass: &str,
    shell: &Shell,
) -> Result<ResolveOutcome> {
    tracing::info!(
        "{} pass: {} targets, content roots {}",
        pass,
        request.targets.len(),
        request.content_roots.join(",")
    );

    let outcome = resolver.resolve(request)?;
    if !outcome.is_success() {
        tracing::debug!("{} pass failed: {:?}", pass, outcome);
        shell.warn(format!(
            "dependency resolver failed on the {} pass ({}), continuing",
            pass, outcome
        ));
    }
    Ok(outcome)
}
