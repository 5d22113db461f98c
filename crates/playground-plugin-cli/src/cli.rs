//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;
use playground_plugins::BuildOptions;
use playground_plugins::esbuild::{DEFAULT_ESBUILD, ESBUILD_ENV};

use crate::defaults::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV, LOG_FORMAT_ENV, LogFormat};

/// Compiles a playground plugin into a `data:` URI.
#[derive(Parser, Debug)]
#[command(name = "playground-plugin", version)]
pub(crate) struct Cli {
    /// Plugin source file to compile.
    #[arg(value_name = "FILE")]
    pub(crate) file: PathBuf,
    /// Build option as KEY=VALUE; VALUE is read as JSON, falling back to a
    /// plain string. May be repeated.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub(crate) options: Vec<BuildOptions>,
    /// JSON object of build options; `--option` entries take precedence.
    #[arg(long, value_name = "JSON", value_parser = BuildOptions::from_json_str)]
    pub(crate) options_json: Option<BuildOptions>,
    /// esbuild executable to run.
    #[arg(long, env = ESBUILD_ENV, default_value = DEFAULT_ESBUILD)]
    pub(crate) esbuild: PathBuf,
    /// Prints the bundled JavaScript instead of the data URI.
    #[arg(long)]
    pub(crate) decode: bool,
    /// Tracing filter directive.
    #[arg(long, env = LOG_FILTER_ENV, default_value = DEFAULT_LOG_FILTER)]
    pub(crate) log_filter: String,
    /// Log output format.
    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::default())]
    pub(crate) log_format: LogFormat,
}

impl Cli {
    /// Merges `--options-json` with the `--option` pairs layered on top.
    pub(crate) fn build_options(&self) -> BuildOptions {
        let mut merged = self.options_json.clone().unwrap_or_default();
        for pair in &self.options {
            merged.extend(pair.clone());
        }
        merged
    }
}
