//! Domain errors raised while compiling plugin sources.
//!
//! All errors use a `thiserror`-derived enum with structured context so callers
//! can inspect the failure programmatically. The two compile outcomes a caller
//! is expected to surface, [`CompileError::Compilation`] and
//! [`CompileError::EmptyOutput`], keep fixed messages; bundler diagnostics
//! travel alongside instead of inside the message. I/O errors are wrapped in
//! `Arc` to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::bundler::BuildMessage;

/// Errors arising from plugin compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The bundler reported one or more errors.
    #[error("Compilation failed.")]
    Compilation {
        /// Error records reported by the bundler, in report order.
        diagnostics: Vec<BuildMessage>,
    },

    /// The bundler succeeded but produced no usable artifact text.
    #[error("No output file found or output file is empty.")]
    EmptyOutput,

    /// The caller tried to override an option the compiler controls.
    #[error("build option '{key}' is reserved and cannot be overridden")]
    ReservedOption {
        /// Offending option name.
        key: String,
    },

    /// A build option has a shape the bundler cannot accept.
    #[error("build option '{key}' cannot be passed to the bundler: {message}")]
    UnsupportedOption {
        /// Offending option name.
        key: String,
        /// Description of the unsupported shape.
        message: String,
    },

    /// A `key=value` build option could not be parsed.
    #[error("invalid build option '{input}': {message}")]
    InvalidOption {
        /// Raw text that failed to parse.
        input: String,
        /// Description of the parse failure.
        message: String,
    },

    /// The bundler process could not be started.
    #[error("bundler '{}' failed to start: {source}", program.display())]
    BundlerSpawn {
        /// Program that was spawned.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The bundler produced output that could not be interpreted.
    #[error("bundler wrote invalid output: {message}")]
    InvalidOutput {
        /// Description of the problem.
        message: String,
    },

    /// The directory the bundler wrote into could not be created or read.
    #[error("bundler output directory '{}' is unusable: {source}", path.display())]
    OutputDirectory {
        /// Directory or file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A string handed to the data URI decoder was not a compiled module.
    #[error("invalid data URI: {message}")]
    InvalidDataUri {
        /// Description of the problem.
        message: String,
    },
}

impl CompileError {
    /// Returns the bundler diagnostics carried by a compilation failure.
    ///
    /// Every other variant yields an empty slice.
    #[must_use]
    pub fn diagnostics(&self) -> &[BuildMessage] {
        match self {
            Self::Compilation { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests;
