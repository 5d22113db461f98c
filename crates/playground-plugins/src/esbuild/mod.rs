//! Process-based bundling with the `esbuild` command-line tool.
//!
//! [`EsbuildBundler`] implements [`Bundler`] by spawning `esbuild`
//! synchronously and translating the [`BuildRequest`] into flags. In-memory
//! builds (`write = false`) point `--outdir` at a temporary staging directory
//! whose files are read back as artifacts and removed afterwards.
//! Diagnostics are recovered from standard error.

mod diagnostics;
mod flags;
mod outputs;

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::debug;

use crate::bundler::{BuildMessage, BuildRequest, BuildResult, Bundler, PLACEHOLDER_OUTDIR};
use crate::error::CompileError;

/// Tracing target for esbuild process operations.
const ESBUILD_TARGET: &str = "playground_plugins::esbuild";

/// Program run when no other is configured; resolved through `PATH`.
pub const DEFAULT_ESBUILD: &str = "esbuild";

/// Environment variable naming the esbuild program for the process-wide
/// compiler.
pub const ESBUILD_ENV: &str = "PLAYGROUND_ESBUILD";

/// Bundles plugins by running the `esbuild` executable.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use playground_plugins::bundler::{BuildRequest, Bundler};
/// use playground_plugins::esbuild::EsbuildBundler;
/// use playground_plugins::BuildOptions;
///
/// let bundler = EsbuildBundler::new("/usr/local/bin/esbuild");
/// let request = BuildRequest::for_entry(Path::new("plugins/auth.js"), BuildOptions::new());
/// let result = bundler.build(&request).expect("esbuild runs");
/// assert!(result.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
    working_dir: Option<PathBuf>,
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new(DEFAULT_ESBUILD)
    }
}

impl EsbuildBundler {
    /// Creates a bundler that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Creates a bundler that runs the program named by
    /// [`PLAYGROUND_ESBUILD`](ESBUILD_ENV), falling back to `esbuild`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var_os(ESBUILD_ENV)
            .filter(|value| !value.is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// Runs esbuild from `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the program that is spawned.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Bundler for EsbuildBundler {
    fn build(&self, request: &BuildRequest) -> Result<BuildResult, CompileError> {
        let staging = if request.writes_to_disk() {
            None
        } else {
            Some(TempDir::new().map_err(|err| CompileError::OutputDirectory {
                path: std::env::temp_dir(),
                source: Arc::new(err),
            })?)
        };
        let outdir = staging.as_ref().map_or_else(
            || PathBuf::from(request.outdir().unwrap_or(PLACEHOLDER_OUTDIR)),
            |dir| dir.path().to_path_buf(),
        );
        let args = flags::command_args(request, &outdir)?;

        let mut command = Command::new(&self.program);
        command.args(&args);
        command.stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(
            target: ESBUILD_TARGET,
            program = %self.program.display(),
            outdir = %outdir.display(),
            entry_points = request.entry_points().len(),
            arguments = args.len(),
            "running esbuild"
        );

        let output = command.output().map_err(|err| CompileError::BundlerSpawn {
            program: self.program.clone(),
            source: Arc::new(err),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = diagnostics::parse(&stderr);

        debug!(
            target: ESBUILD_TARGET,
            status = ?output.status,
            errors = diagnostics.errors.len(),
            warnings = diagnostics.warnings.len(),
            "esbuild finished"
        );

        if !output.status.success() || !diagnostics.errors.is_empty() {
            let mut errors = diagnostics.errors;
            if errors.is_empty() {
                errors.push(exit_failure(output.status, &stderr));
            }
            return Ok(BuildResult::failure(errors).with_warnings(diagnostics.warnings));
        }

        let Some(dir) = staging else {
            return Ok(BuildResult::success(Vec::new()).with_warnings(diagnostics.warnings));
        };
        let artifacts = outputs::collect(dir.path(), request)?;
        debug!(
            target: ESBUILD_TARGET,
            artifacts = artifacts.len(),
            "collected esbuild output"
        );
        Ok(BuildResult::success(artifacts).with_warnings(diagnostics.warnings))
    }
}

fn exit_failure(status: ExitStatus, stderr: &str) -> BuildMessage {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        let code = status
            .code()
            .map_or_else(|| String::from("unknown"), |code| code.to_string());
        BuildMessage::new(format!("esbuild exited with status {code}"))
    } else {
        BuildMessage::new(trimmed)
    }
}
