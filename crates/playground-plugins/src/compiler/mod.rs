//! The compile-and-cache path.
//!
//! [`PluginCompiler`] turns a plugin source file into a [`CompiledModule`]:
//! it derives a [`CacheKey`], answers from its [`ModuleCache`] when it can,
//! and otherwise runs its [`Bundler`], checks the result, encodes the bundle
//! as a data URI, and stores it. Failed compiles leave the cache untouched,
//! so the next call for the same key runs the bundler again.

use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{debug, error, warn};

use crate::bundler::{BuildRequest, BuildResult, Bundler, OutputFile};
use crate::cache::{CacheKey, InMemoryCache, ModuleCache};
use crate::data_uri::{CompiledModule, encode_module};
use crate::error::CompileError;
use crate::esbuild::EsbuildBundler;
use crate::options::BuildOptions;

/// Tracing target for compiler operations.
const COMPILER_TARGET: &str = "playground_plugins::compiler";

/// Compiles plugin sources through a bundler and memoises the results.
///
/// # Example
///
/// ```
/// use playground_plugins::bundler::{BuildRequest, BuildResult, Bundler, OutputFile};
/// use playground_plugins::{BuildOptions, CompileError, PluginCompiler};
///
/// struct FixedBundler;
///
/// impl Bundler for FixedBundler {
///     fn build(&self, _request: &BuildRequest) -> Result<BuildResult, CompileError> {
///         Ok(BuildResult::success(vec![OutputFile::new("out/auth.js", "export {};")]))
///     }
/// }
///
/// let compiler = PluginCompiler::with_bundler(FixedBundler);
/// let module = compiler.compile("plugins/auth.js", &BuildOptions::new()).unwrap();
/// assert_eq!(module.as_str(), "data:text/javascript;charset=utf-8,export%20%7B%7D%3B");
/// ```
#[derive(Debug)]
pub struct PluginCompiler<B, C = InMemoryCache> {
    bundler: B,
    cache: C,
}

impl<B> PluginCompiler<B> {
    /// Creates a compiler with an empty in-memory cache.
    #[must_use]
    pub fn with_bundler(bundler: B) -> Self {
        Self::new(bundler, InMemoryCache::new())
    }
}

impl<B, C> PluginCompiler<B, C> {
    /// Creates a compiler from a bundler and a cache.
    #[must_use]
    pub const fn new(bundler: B, cache: C) -> Self {
        Self { bundler, cache }
    }

    /// Returns the bundler.
    #[must_use]
    pub const fn bundler(&self) -> &B {
        &self.bundler
    }

    /// Returns the cache.
    #[must_use]
    pub const fn cache(&self) -> &C {
        &self.cache
    }
}

impl<B: Bundler, C: ModuleCache> PluginCompiler<B, C> {
    /// Compiles the plugin at `file_path` with `options` layered over the
    /// compiler defaults.
    ///
    /// A repeated call with the same path and equal options returns the
    /// cached module without consulting the bundler or the file.
    ///
    /// # Errors
    ///
    /// - [`CompileError::ReservedOption`] if `options` sets `write`,
    ///   `outdir`, or `format`.
    /// - [`CompileError::Compilation`] if the bundler reports errors; each
    ///   one is logged before returning.
    /// - [`CompileError::EmptyOutput`] if the bundler produced no artifact or
    ///   an empty one.
    /// - Any error the bundler itself returns.
    pub fn compile(
        &self,
        file_path: impl AsRef<Path>,
        options: &BuildOptions,
    ) -> Result<CompiledModule, CompileError> {
        let path = file_path.as_ref();
        if let Some(key) = options.reserved_key() {
            return Err(CompileError::ReservedOption {
                key: key.to_owned(),
            });
        }

        let cache_key = CacheKey::derive(path, options);
        if let Some(module) = self.cache.get(&cache_key) {
            debug!(target: COMPILER_TARGET, key = %cache_key, "plugin served from cache");
            return Ok(module);
        }

        debug!(target: COMPILER_TARGET, key = %cache_key, "compiling plugin");
        let request = BuildRequest::for_entry(path, options.clone());
        let result = self.bundler.build(&request)?;
        let module = module_from_result(path, result)?;

        self.cache.put(cache_key, module.clone());
        Ok(module)
    }
}

fn module_from_result(path: &Path, result: BuildResult) -> Result<CompiledModule, CompileError> {
    let (output_files, errors, warnings) = result.into_parts();

    for warning in &warnings {
        warn!(
            target: COMPILER_TARGET,
            plugin = %path.display(),
            diagnostic = %warning,
            "bundler reported a warning"
        );
    }

    if !errors.is_empty() {
        for diagnostic in &errors {
            error!(
                target: COMPILER_TARGET,
                plugin = %path.display(),
                %diagnostic,
                "bundler reported an error"
            );
        }
        return Err(CompileError::Compilation {
            diagnostics: errors,
        });
    }

    let text = output_files
        .into_iter()
        .next()
        .map(OutputFile::into_text)
        .filter(|text| !text.is_empty())
        .ok_or(CompileError::EmptyOutput)?;

    Ok(encode_module(&text))
}

static PROCESS_COMPILER: Lazy<PluginCompiler<EsbuildBundler>> =
    Lazy::new(|| PluginCompiler::with_bundler(EsbuildBundler::from_env()));

/// Returns the compiler shared by the whole process.
///
/// It runs the esbuild program named by `PLAYGROUND_ESBUILD` (read once, on
/// first use) and caches modules for the lifetime of the process.
#[must_use]
pub fn process_compiler() -> &'static PluginCompiler<EsbuildBundler> {
    &PROCESS_COMPILER
}

/// Compiles a plugin file with the process-wide compiler.
///
/// # Errors
///
/// See [`PluginCompiler::compile`].
pub fn process_plugin_file(
    plugin_file_path: impl AsRef<Path>,
    options: &BuildOptions,
) -> Result<CompiledModule, CompileError> {
    PROCESS_COMPILER.compile(plugin_file_path, options)
}
