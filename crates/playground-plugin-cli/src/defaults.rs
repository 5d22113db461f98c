//! Built-in configuration defaults and the log format selector.

use strum::{Display, EnumString};

/// Log filter applied when neither flag nor environment sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable overriding `--log-filter`.
pub const LOG_FILTER_ENV: &str = "PLAYGROUND_LOG_FILTER";

/// Environment variable overriding `--log-format`.
pub const LOG_FORMAT_ENV: &str = "PLAYGROUND_LOG_FORMAT";

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Human-readable single line output.
    #[default]
    Compact,
}
