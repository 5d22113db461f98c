//! Error types for the CLI runtime.

use std::io;

use playground_plugins::CompileError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
