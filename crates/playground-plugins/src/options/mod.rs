//! Caller-supplied bundler options.
//!
//! [`BuildOptions`] is an ordered-insensitive map from bundler option name
//! (in the bundler's camelCase API spelling, such as `minify` or
//! `jsxFactory`) to a JSON value. Two option sets that hold the same entries
//! produce the same [`canonical_json`](BuildOptions::canonical_json) text no
//! matter how they were built, which is what makes them usable as part of a
//! cache key.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CompileError;

/// Option names the compiler always controls.
///
/// Output is kept in memory, the placeholder output directory is never
/// written, and the module format must stay ESM for the data URI to load as a
/// module script.
pub const RESERVED_OPTIONS: [&str; 3] = ["write", "outdir", "format"];

/// Bundler options layered over the compiler defaults.
///
/// # Example
///
/// ```
/// use playground_plugins::BuildOptions;
///
/// let a = BuildOptions::new().with("minify", true).with("target", "es2020");
/// let b = BuildOptions::new().with("target", "es2020").with("minify", true);
/// assert_eq!(a.canonical_json(), b.canonical_json());
/// assert_eq!(a.canonical_json(), r#"{"minify":true,"target":"es2020"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildOptions {
    entries: Map<String, Value>,
}

impl BuildOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the option set with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up an option by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` when the option is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the options.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this set, replacing existing keys.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Returns the first reserved option name present in the set.
    #[must_use]
    pub fn reserved_key(&self) -> Option<&'static str> {
        RESERVED_OPTIONS
            .into_iter()
            .find(|reserved| self.entries.contains_key(*reserved))
    }

    /// Parses an option set from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidOption`] if the text is not valid JSON
    /// or is not an object.
    pub fn from_json_str(json: &str) -> Result<Self, CompileError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| CompileError::InvalidOption {
                input: json.to_owned(),
                message: err.to_string(),
            })?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(CompileError::InvalidOption {
                input: json.to_owned(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Serialises the options as compact JSON with object keys sorted at
    /// every depth.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        let mut out = String::new();
        write_object(&self.entries, &mut out);
        out
    }

    pub(crate) fn into_entries(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for BuildOptions {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromStr for BuildOptions {
    type Err = CompileError;

    /// Parses a single `KEY=VALUE` pair.
    ///
    /// The value is read as JSON when it parses (`true`, `3`, `["a"]`) and as
    /// a plain string otherwise, so `target=es2020` needs no quoting.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (key, raw) = input
            .split_once('=')
            .ok_or_else(|| CompileError::InvalidOption {
                input: input.to_owned(),
                message: String::from("expected KEY=VALUE"),
            })?;
        let name = key.trim();
        if name.is_empty() {
            return Err(CompileError::InvalidOption {
                input: input.to_owned(),
                message: String::from("option name must not be empty"),
            });
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        Ok(Self::new().with(name, value))
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(entries) => write_object(entries, out),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(entries: &Map<String, Value>, out: &mut String) {
    let mut sorted: Vec<(&String, &Value)> = entries.iter().collect();
    sorted.sort_by(|left, right| left.0.cmp(right.0));

    out.push('{');
    for (index, (key, value)) in sorted.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
