//! Unit tests for compile error types.

use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::bundler::BuildMessage;

#[test]
fn compilation_message_is_fixed() {
    let error = CompileError::Compilation {
        diagnostics: vec![BuildMessage::new("Could not resolve \"left-pad\"")],
    };
    assert_eq!(error.to_string(), "Compilation failed.");
}

#[test]
fn empty_output_message_is_fixed() {
    assert_eq!(
        CompileError::EmptyOutput.to_string(),
        "No output file found or output file is empty."
    );
}

#[test]
fn compilation_error_exposes_diagnostics() {
    let error = CompileError::Compilation {
        diagnostics: vec![
            BuildMessage::new("first"),
            BuildMessage::new("second"),
        ],
    };
    let texts: Vec<&str> = error.diagnostics().iter().map(BuildMessage::text).collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn other_errors_have_no_diagnostics() {
    assert!(CompileError::EmptyOutput.diagnostics().is_empty());
}

#[rstest]
#[case::reserved(
    CompileError::ReservedOption { key: "outdir".into() },
    "outdir"
)]
#[case::unsupported(
    CompileError::UnsupportedOption {
        key: "define".into(),
        message: "nested objects are not supported".into(),
    },
    "nested objects"
)]
#[case::invalid_option(
    CompileError::InvalidOption {
        input: "minify".into(),
        message: "expected KEY=VALUE".into(),
    },
    "expected KEY=VALUE"
)]
#[case::invalid_output(
    CompileError::InvalidOutput { message: "stream did not contain valid UTF-8".into() },
    "valid UTF-8"
)]
#[case::output_directory(
    CompileError::OutputDirectory {
        path: PathBuf::from("/tmp/staging"),
        source: Arc::new(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
    },
    "/tmp/staging"
)]
fn error_message_includes_detail(#[case] error: CompileError, #[case] expected: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected),
        "expected {expected} in message: {message}"
    );
}

#[test]
fn spawn_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    let error = CompileError::BundlerSpawn {
        program: PathBuf::from("/opt/esbuild/bin/esbuild"),
        source: Arc::new(std::io::Error::other("no such file")),
    };
    assert_send_sync::<CompileError>();
    let message = error.to_string();
    assert!(
        message.contains("/opt/esbuild/bin/esbuild"),
        "expected program path in message: {message}"
    );
}
