//! Memoisation of compiled plugin modules.
//!
//! The compiler talks to its cache through the [`ModuleCache`] trait so tests
//! can start from an empty cache and callers can swap in their own storage.
//! [`InMemoryCache`] is the process-lifetime implementation: entries are
//! never evicted and nothing is persisted.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::data_uri::CompiledModule;
use crate::options::BuildOptions;

/// Deterministic identity of a compile request.
///
/// The key is the file path followed by the canonical JSON of the build
/// options, so option sets that differ only in insertion order share a key.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use playground_plugins::{BuildOptions, CacheKey};
///
/// let key = CacheKey::derive(Path::new("plugins/auth.js"), &BuildOptions::new());
/// assert_eq!(key.as_str(), "plugins/auth.js{}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a file and option set.
    #[must_use]
    pub fn derive(file_path: &Path, options: &BuildOptions) -> Self {
        let mut key = file_path.to_string_lossy().into_owned();
        key.push_str(&options.canonical_json());
        Self(key)
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for compiled modules keyed by [`CacheKey`].
///
/// Methods take `&self` so one cache can back a compiler shared between
/// threads; implementations provide their own interior mutability.
pub trait ModuleCache {
    /// Returns the module stored under `key`, if any.
    fn get(&self, key: &CacheKey) -> Option<CompiledModule>;

    /// Stores `module` under `key`, replacing any previous entry.
    fn put(&self, key: CacheKey, module: CompiledModule);

    /// Returns the number of stored modules.
    fn len(&self) -> usize;

    /// Returns `true` when nothing has been stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-process cache.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<CacheKey, CompiledModule>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CompiledModule>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModuleCache for InMemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CompiledModule> {
        self.lock().get(key).cloned()
    }

    fn put(&self, key: CacheKey, module: CompiledModule) {
        self.lock().insert(key, module);
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<C: ModuleCache + ?Sized> ModuleCache for &C {
    fn get(&self, key: &CacheKey) -> Option<CompiledModule> {
        (**self).get(key)
    }

    fn put(&self, key: CacheKey, module: CompiledModule) {
        (**self).put(key, module);
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
