//! Translation of build options into `esbuild` command-line arguments.

use std::path::Path;

use serde_json::Value;

use crate::bundler::BuildRequest;
use crate::error::CompileError;

/// Array options the CLI expects as one `--flag:item` per element.
const REPEATED_OPTIONS: [&str; 4] = ["external", "inject", "pure", "drop"];

/// Boolean options whose CLI flag requires an explicit value.
const VALUED_BOOLEANS: [&str; 1] = ["treeShaking"];

/// Options consumed directly rather than passed through as flags.
const HANDLED_OPTIONS: [&str; 3] = ["entryPoints", "write", "outdir"];

/// Builds the argument list for one `esbuild` run.
///
/// Entry points come first as positional arguments. `--outdir` is always
/// passed, since esbuild refuses some options without an output path. Logging is
/// pinned to plain-text warnings and errors so standard error can be parsed.
pub(crate) fn command_args(
    request: &BuildRequest,
    outdir: &Path,
) -> Result<Vec<String>, CompileError> {
    let mut args: Vec<String> = request
        .entry_points()
        .iter()
        .map(|entry| entry.to_string_lossy().into_owned())
        .collect();

    for (key, value) in request.options() {
        if HANDLED_OPTIONS.contains(&key) {
            continue;
        }
        args.extend(option_flags(key, value)?);
    }

    args.push(format!("--outdir={}", outdir.display()));
    args.push(String::from("--log-level=warning"));
    args.push(String::from("--color=false"));
    Ok(args)
}

/// Translates one option into zero or more flags.
pub(crate) fn option_flags(key: &str, value: &Value) -> Result<Vec<String>, CompileError> {
    let flag = kebab_case(key);
    let flags = match value {
        Value::Null => Vec::new(),
        Value::Bool(true) if VALUED_BOOLEANS.contains(&key) => vec![format!("--{flag}=true")],
        Value::Bool(true) => vec![format!("--{flag}")],
        Value::Bool(false) => vec![format!("--{flag}=false")],
        Value::Number(number) => vec![format!("--{flag}={number}")],
        Value::String(text) => vec![format!("--{flag}={text}")],
        Value::Array(items) => {
            let texts = items
                .iter()
                .map(|item| scalar_text(key, item))
                .collect::<Result<Vec<_>, _>>()?;
            if REPEATED_OPTIONS.contains(&key) {
                texts
                    .into_iter()
                    .map(|text| format!("--{flag}:{text}"))
                    .collect()
            } else {
                vec![format!("--{flag}={}", texts.join(","))]
            }
        }
        Value::Object(_) if key == "tsconfigRaw" => vec![format!("--{flag}={value}")],
        Value::Object(entries) => entries
            .iter()
            .map(|(name, entry)| {
                scalar_text(key, entry).map(|text| format!("--{flag}:{name}={text}"))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(flags)
}

fn scalar_text(key: &str, value: &Value) -> Result<String, CompileError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::from("null")),
        Value::Array(_) | Value::Object(_) => Err(CompileError::UnsupportedOption {
            key: key.to_owned(),
            message: String::from("nested arrays and objects are not supported"),
        }),
    }
}

/// Converts a camelCase option name to its kebab-case flag.
pub(crate) fn kebab_case(name: &str) -> String {
    let mut flag = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            flag.push('-');
            flag.push(ch.to_ascii_lowercase());
        } else {
            flag.push(ch);
        }
    }
    flag
}
