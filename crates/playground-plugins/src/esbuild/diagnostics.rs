//! Parsing of `esbuild` diagnostics from standard error.
//!
//! With `--color=false` each message starts with a marker line such as
//! `✘ [ERROR] Could not resolve "left-pad"` or `▲ [WARNING] ...`, followed by
//! indented detail: an optional `file:line:column:` location, the quoted
//! source line, and free-form notes. Notes and the closing summary
//! (`1 error`) are ignored.

use crate::bundler::{BuildMessage, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

/// Errors and warnings recovered from one run.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    pub(crate) errors: Vec<BuildMessage>,
    pub(crate) warnings: Vec<BuildMessage>,
}

struct Pending {
    severity: Severity,
    text: String,
    location: Option<Location>,
}

impl Pending {
    fn finish(self, diagnostics: &mut Diagnostics) {
        let mut message = BuildMessage::new(self.text);
        if let Some(location) = self.location {
            message = message.with_location(location);
        }
        match self.severity {
            Severity::Error => diagnostics.errors.push(message),
            Severity::Warning => diagnostics.warnings.push(message),
        }
    }
}

/// Splits standard error into error and warning records.
pub(crate) fn parse(stderr: &str) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();
    let mut pending: Option<Pending> = None;

    for line in stderr.lines() {
        if let Some((severity, text)) = header(line) {
            if let Some(done) = pending.take() {
                done.finish(&mut diagnostics);
            }
            pending = Some(Pending {
                severity,
                text: text.to_owned(),
                location: None,
            });
            continue;
        }

        let Some(current) = pending.as_mut() else {
            continue;
        };
        match current.location.take() {
            None => current.location = location(line),
            Some(found) if found.line_text().is_none() => {
                current.location = Some(match source_line(line) {
                    Some(text) => found.with_line_text(text),
                    None => found,
                });
            }
            Some(found) => current.location = Some(found),
        }
    }

    if let Some(done) = pending {
        done.finish(&mut diagnostics);
    }
    diagnostics
}

fn header(line: &str) -> Option<(Severity, &str)> {
    let (marker, rest) = line.trim_start().split_once('[')?;
    if marker.trim().chars().count() > 1 {
        return None;
    }
    if let Some(text) = rest.strip_prefix("ERROR]") {
        return Some((Severity::Error, text.trim()));
    }
    rest.strip_prefix("WARNING]")
        .map(|text| (Severity::Warning, text.trim()))
}

fn location(line: &str) -> Option<Location> {
    if !line.starts_with(char::is_whitespace) {
        return None;
    }
    let body = line.trim().strip_suffix(':')?;
    let (rest, column_text) = body.rsplit_once(':')?;
    let (file, line_text) = rest.rsplit_once(':')?;
    if file.is_empty() {
        return None;
    }
    let row: u32 = line_text.parse().ok()?;
    let column: u32 = column_text.parse().ok()?;
    Some(Location::new(file, row, column))
}

fn source_line(line: &str) -> Option<&str> {
    let (number, text) = line.split_once('│')?;
    number.trim().parse::<u32>().ok()?;
    Some(text.strip_prefix(' ').unwrap_or(text))
}
