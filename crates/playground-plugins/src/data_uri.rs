//! Data URI encoding for compiled plugin modules.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::CompileError;

/// Prefix of every compiled module.
pub const DATA_URI_PREFIX: &str = "data:text/javascript;charset=utf-8,";

/// Bytes escaped by `encodeURIComponent`: everything except ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A bundled plugin encoded as a `data:text/javascript` URI.
///
/// Clones share the underlying allocation, so a value handed out from the
/// cache is the same value the first compile produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledModule(Arc<str>);

impl CompiledModule {
    /// Returns the full data URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when both values share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Decodes the JavaScript source carried by the URI.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidDataUri`] if the payload does not
    /// decode to UTF-8.
    pub fn source(&self) -> Result<String, CompileError> {
        decode_module(self.as_str())
    }
}

impl AsRef<str> for CompiledModule {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CompiledModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wraps JavaScript source in a data URI.
///
/// # Example
///
/// ```
/// use playground_plugins::data_uri::encode_module;
///
/// let module = encode_module("export const x = 1;");
/// assert_eq!(
///     module.as_str(),
///     "data:text/javascript;charset=utf-8,export%20const%20x%20%3D%201%3B"
/// );
/// ```
#[must_use]
pub fn encode_module(source: &str) -> CompiledModule {
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + source.len());
    uri.push_str(DATA_URI_PREFIX);
    uri.extend(utf8_percent_encode(source, URI_COMPONENT));
    CompiledModule(Arc::from(uri))
}

/// Recovers the JavaScript source from a data URI produced by
/// [`encode_module`].
///
/// # Errors
///
/// Returns [`CompileError::InvalidDataUri`] if the prefix is missing or the
/// payload does not decode to UTF-8.
pub fn decode_module(uri: &str) -> Result<String, CompileError> {
    let payload = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| CompileError::InvalidDataUri {
            message: format!("expected prefix '{DATA_URI_PREFIX}'"),
        })?;
    percent_decode_str(payload)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| CompileError::InvalidDataUri {
            message: err.to_string(),
        })
}
