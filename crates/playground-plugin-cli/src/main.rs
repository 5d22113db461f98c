//! CLI entrypoint for the playground plugin compiler.
//!
//! The binary delegates to [`playground_plugin_cli::run`], which parses
//! arguments, initialises telemetry, and compiles the requested plugin.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    playground_plugin_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
