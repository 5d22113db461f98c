//! The bundler seam and the values that cross it.
//!
//! The compiler never runs a bundler itself. It builds a [`BuildRequest`]
//! from its defaults and the caller's [`BuildOptions`], hands it to a
//! [`Bundler`], and inspects the [`BuildResult`]. The production
//! implementation is [`EsbuildBundler`](crate::esbuild::EsbuildBundler);
//! tests substitute doubles that return canned results.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::options::BuildOptions;

/// Language level the bundle is lowered to unless the caller overrides it.
pub const DEFAULT_TARGET: &str = "es2015";

/// Module format of every bundle.
pub const DEFAULT_FORMAT: &str = "esm";

/// Output directory handed to the bundler. Output stays in memory, so
/// nothing is written here.
pub const PLACEHOLDER_OUTDIR: &str = "out";

/// Trait abstracting the external bundler for testability.
///
/// Compile diagnostics belong in the returned [`BuildResult`]; `Err` is
/// reserved for failures to drive the bundler at all.
///
/// # Example
///
/// ```
/// use playground_plugins::bundler::{BuildRequest, BuildResult, Bundler, OutputFile};
/// use playground_plugins::CompileError;
///
/// struct EchoBundler;
///
/// impl Bundler for EchoBundler {
///     fn build(&self, request: &BuildRequest) -> Result<BuildResult, CompileError> {
///         let entries = request.entry_points().len();
///         Ok(BuildResult::success(vec![OutputFile::new(
///             "out/echo.js",
///             format!("export const entries = {entries};"),
///         )]))
///     }
/// }
/// ```
pub trait Bundler {
    /// Bundles the entry points named by `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the bundler cannot be started, an
    /// option cannot be expressed, or the bundler's output is unreadable.
    fn build(&self, request: &BuildRequest) -> Result<BuildResult, CompileError>;
}

impl<B: Bundler + ?Sized> Bundler for &B {
    fn build(&self, request: &BuildRequest) -> Result<BuildResult, CompileError> {
        (**self).build(request)
    }
}

/// Complete option set sent to the bundler.
///
/// Holds the compiler defaults with the caller's options layered on top,
/// keyed by the bundler's camelCase option names.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    options: Map<String, Value>,
}

impl BuildRequest {
    /// Builds the request for a single entry point.
    ///
    /// Defaults are `entryPoints = [entry]`, `target = "es2015"`,
    /// `bundle = true`, `write = false`, `outdir = "out"`, and
    /// `format = "esm"`. Every key in `overrides` replaces the default.
    #[must_use]
    pub fn for_entry(entry: &Path, overrides: BuildOptions) -> Self {
        let mut options = Map::new();
        options.insert(
            String::from("entryPoints"),
            Value::Array(vec![Value::String(entry.to_string_lossy().into_owned())]),
        );
        options.insert(String::from("target"), Value::from(DEFAULT_TARGET));
        options.insert(String::from("bundle"), Value::Bool(true));
        options.insert(String::from("write"), Value::Bool(false));
        options.insert(String::from("outdir"), Value::from(PLACEHOLDER_OUTDIR));
        options.insert(String::from("format"), Value::from(DEFAULT_FORMAT));
        options.extend(overrides.into_entries());
        Self { options }
    }

    /// Looks up an option by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Iterates over every option, defaults included.
    pub fn options(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the entry points as paths.
    ///
    /// Non-string entries are skipped.
    #[must_use]
    pub fn entry_points(&self) -> Vec<PathBuf> {
        match self.options.get("entryPoints") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(PathBuf::from)
                .collect(),
            Some(Value::String(single)) => vec![PathBuf::from(single)],
            _ => Vec::new(),
        }
    }

    /// Returns `true` when the bundler should write files to disk.
    #[must_use]
    pub fn writes_to_disk(&self) -> bool {
        self.options
            .get("write")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns the output directory.
    #[must_use]
    pub fn outdir(&self) -> Option<&str> {
        self.options.get("outdir").and_then(Value::as_str)
    }

    /// Returns the module format.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.options.get("format").and_then(Value::as_str)
    }

    /// Returns the target when it is a single string.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.options.get("target").and_then(Value::as_str)
    }
}

/// Outcome of a bundler run.
///
/// A run with any errors is a failure regardless of its output files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    output_files: Vec<OutputFile>,
    errors: Vec<BuildMessage>,
    warnings: Vec<BuildMessage>,
}

impl BuildResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(output_files: Vec<OutputFile>) -> Self {
        Self {
            output_files,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub const fn failure(errors: Vec<BuildMessage>) -> Self {
        Self {
            output_files: Vec::new(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Attaches warnings to the result.
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<BuildMessage>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Returns the output artifacts.
    #[must_use]
    pub fn output_files(&self) -> &[OutputFile] {
        &self.output_files
    }

    /// Returns the error records.
    #[must_use]
    pub fn errors(&self) -> &[BuildMessage] {
        &self.errors
    }

    /// Returns the warning records.
    #[must_use]
    pub fn warnings(&self) -> &[BuildMessage] {
        &self.warnings
    }

    /// Returns `true` when no errors were reported.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Splits the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<OutputFile>, Vec<BuildMessage>, Vec<BuildMessage>) {
        (self.output_files, self.errors, self.warnings)
    }
}

/// One artifact produced by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
    text: String,
}

impl OutputFile {
    /// Creates an artifact.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Returns the path the bundler assigned to the artifact.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the artifact text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Consumes the artifact, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// An error or warning reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
    text: String,
    location: Option<Location>,
}

impl BuildMessage {
    /// Creates a message without a location.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the message text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the source location, if the bundler reported one.
    #[must_use]
    pub const fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl fmt::Display for BuildMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{}:{}:{}: {}",
                location.file, location.line, location.column, self.text
            ),
            None => f.write_str(&self.text),
        }
    }
}

/// Position of a diagnostic in a source file. Lines are 1-based, columns
/// 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    file: String,
    line: u32,
    column: u32,
    line_text: Option<String>,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            line_text: None,
        }
    }

    /// Attaches the text of the offending line.
    #[must_use]
    pub fn with_line_text(mut self, line_text: impl Into<String>) -> Self {
        self.line_text = Some(line_text.into());
        self
    }

    /// Returns the file path as reported by the bundler.
    #[must_use]
    pub const fn file(&self) -> &str {
        self.file.as_str()
    }

    /// Returns the line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the text of the offending line, if reported.
    #[must_use]
    pub fn line_text(&self) -> Option<&str> {
        self.line_text.as_deref()
    }
}
