//! Plugin contract types.
//!
//! A playground plugin is configured either as an object that already
//! implements the runtime hooks ([`PlaygroundPlugin`]) or as a source file
//! that must be compiled before a browser can load it ([`PluginFile`]).
//! The compiler only deals with the second form; the hooks are described here
//! so hosts share one definition of what the compiled code is expected to
//! export.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundler::Bundler;
use crate::cache::ModuleCache;
use crate::compiler::PluginCompiler;
use crate::data_uri::CompiledModule;
use crate::error::CompileError;
use crate::options::BuildOptions;

/// A GraphQL operation about to be sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    /// Operation document.
    pub query: String,
    /// Operation variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    /// Name of the operation to execute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// Transport settings for the link that will carry a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProperties {
    /// HTTP endpoint.
    pub endpoint: String,
    /// Headers sent with the request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Fetch credentials mode (`omit`, `same-origin`, `include`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    /// Websocket endpoint for subscriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_endpoint: Option<String>,
}

/// Failure raised by a plugin hook.
#[derive(Debug, Error)]
#[error("plugin hook '{hook}' failed: {message}")]
pub struct HookError {
    /// Hook that failed.
    pub hook: &'static str,
    /// Description of the failure.
    pub message: String,
}

/// Runtime hooks a plugin may provide.
///
/// Both hooks are optional; the defaults do nothing.
pub trait PlaygroundPlugin {
    /// Called once before the plugin is used.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`] if the plugin cannot start.
    fn init(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before each outgoing request; may rewrite the request or its
    /// link settings.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`] to abort the request.
    fn pre_request(
        &mut self,
        _request: &mut RequestData,
        _link: &mut LinkProperties,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// A plugin given as a source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginFile {
    file_path: PathBuf,
    #[serde(default, skip_serializing_if = "BuildOptions::is_empty")]
    build_options: BuildOptions,
}

impl PluginFile {
    /// Creates a file-mode plugin with default build options.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            build_options: BuildOptions::new(),
        }
    }

    /// Replaces the build options.
    #[must_use]
    pub fn with_build_options(mut self, build_options: BuildOptions) -> Self {
        self.build_options = build_options;
        self
    }

    /// Returns the source path.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the build options.
    #[must_use]
    pub const fn build_options(&self) -> &BuildOptions {
        &self.build_options
    }

    /// Compiles the plugin.
    ///
    /// # Errors
    ///
    /// See [`PluginCompiler::compile`].
    pub fn compile<B: Bundler, C: ModuleCache>(
        &self,
        compiler: &PluginCompiler<B, C>,
    ) -> Result<CompiledModule, CompileError> {
        compiler.compile(&self.file_path, &self.build_options)
    }
}

/// A configured plugin in either form.
pub enum PluginConfig {
    /// Hooks supplied directly by the host.
    Hooks(Box<dyn PlaygroundPlugin>),
    /// Source file to compile for the browser.
    File(PluginFile),
}

impl PluginConfig {
    /// Returns the script source for file-mode plugins and `None` for hook
    /// objects, which need no compilation.
    ///
    /// # Errors
    ///
    /// See [`PluginCompiler::compile`].
    pub fn script_source<B: Bundler, C: ModuleCache>(
        &self,
        compiler: &PluginCompiler<B, C>,
    ) -> Result<Option<CompiledModule>, CompileError> {
        match self {
            Self::Hooks(_) => Ok(None),
            Self::File(file) => file.compile(compiler).map(Some),
        }
    }
}

impl From<PluginFile> for PluginConfig {
    fn from(file: PluginFile) -> Self {
        Self::File(file)
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hooks(_) => f.write_str("PluginConfig::Hooks(..)"),
            Self::File(file) => f.debug_tuple("PluginConfig::File").field(file).finish(),
        }
    }
}
