//! Command-line runtime for the playground plugin compiler.
//!
//! [`run`] parses arguments, installs telemetry, compiles one plugin file
//! through esbuild, and writes the resulting data URI (or, with `--decode`,
//! the bundled JavaScript) to standard output. It takes its IO handles as
//! parameters so tests can capture both streams.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use playground_plugins::{CompileError, EsbuildBundler, PluginCompiler};
use tracing::info;

mod cli;
pub mod defaults;
mod errors;
pub mod telemetry;

use cli::Cli;
use errors::AppError;

/// Tracing target for CLI operations.
const CLI_TARGET: &str = "playground_plugin_cli";

/// Runs the CLI using the provided arguments and IO handles.
///
/// Returns success after printing the compiled module, failure (1) after
/// printing `error: <message>` to `stderr`, or clap's own exit code for
/// usage errors, help, and version output.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_failure(&error, stderr);
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), AppError> {
    telemetry::initialise(&cli.log_filter, cli.log_format)?;

    let bundler = EsbuildBundler::new(&cli.esbuild);
    let compiler = PluginCompiler::with_bundler(bundler);
    let options = cli.build_options();

    info!(
        target: CLI_TARGET,
        plugin = %cli.file.display(),
        options = %options.canonical_json(),
        "compiling plugin"
    );
    let module = compiler.compile(&cli.file, &options)?;

    if cli.decode {
        let source = module.source()?;
        write!(stdout, "{source}").map_err(AppError::WriteOutput)?;
        if !source.ends_with('\n') {
            writeln!(stdout).map_err(AppError::WriteOutput)?;
        }
    } else {
        writeln!(stdout, "{module}").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    let written = if error.use_stderr() {
        write!(stderr, "{rendered}")
    } else {
        write!(stdout, "{rendered}")
    };
    written.ok();
    u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn report_failure<E: Write>(error: &AppError, stderr: &mut E) {
    writeln!(stderr, "error: {error}").ok();
    if let AppError::Compile(CompileError::Compilation { diagnostics }) = error {
        for diagnostic in diagnostics {
            writeln!(stderr, "  {diagnostic}").ok();
        }
    }
}
