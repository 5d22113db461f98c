//! Plugin compilation for the GraphQL playground.
//!
//! A playground plugin may be shipped as a source file that the browser
//! cannot load directly: it may import packages, use TypeScript, or target a
//! newer dialect than the page supports. This crate bundles such a file with
//! an external bundler, turns the single JavaScript artifact into a
//! `data:text/javascript` URI that a page can `import()`, and memoises the
//! result per file and option set for the life of the process.
//!
//! # Architecture
//!
//! [`PluginCompiler`] owns two seams:
//!
//! - a [`Bundler`](bundler::Bundler), which turns a
//!   [`BuildRequest`](bundler::BuildRequest) into output files and
//!   diagnostics ([`EsbuildBundler`] runs the `esbuild` executable);
//! - a [`ModuleCache`], keyed by a canonical [`CacheKey`] so that option
//!   maps differing only in key order share an entry.
//!
//! Most callers use [`process_plugin_file`], which compiles through one
//! compiler shared by the whole process.
//!
//! # Example
//!
//! ```rust,no_run
//! use playground_plugins::{BuildOptions, process_plugin_file};
//!
//! let options = BuildOptions::new().with("minify", true);
//! let module = process_plugin_file("plugins/auth.ts", &options).expect("plugin compiles");
//! assert!(module.as_str().starts_with("data:text/javascript;charset=utf-8,"));
//! ```

pub mod bundler;
pub mod cache;
pub mod compiler;
pub mod data_uri;
pub mod error;
pub mod esbuild;
pub mod options;
pub mod plugin;

#[cfg(test)]
mod tests;

pub use self::bundler::Bundler;
pub use self::cache::{CacheKey, InMemoryCache, ModuleCache};
pub use self::compiler::{PluginCompiler, process_compiler, process_plugin_file};
pub use self::data_uri::{CompiledModule, decode_module, encode_module};
pub use self::error::CompileError;
pub use self::esbuild::EsbuildBundler;
pub use self::options::BuildOptions;
pub use self::plugin::{
    HookError, LinkProperties, PlaygroundPlugin, PluginConfig, PluginFile, RequestData,
};
