//! Application port - the contract providers program against.

use std::sync::Arc;

use crate::provider::Provider;
use crate::value::{ServiceFactory, SharedService};

/// The container/profile surface the orchestrator exposes to providers.
///
/// Every provider receives an [`AppContext`] in `init` and uses only this
/// trait to publish services, resolve collaborators, register further
/// providers, and read process-wide profile values. It never sees the
/// orchestrator's internals.
///
/// Failure semantics: lookups return `None` for unknown keys, duplicate
/// registrations are silently ignored (first wins). Nothing here returns an
/// error.
pub trait ApplicationPort: Send + Sync {
    /// Bind a plain (non-singleton) service under `key`. No-op if `key` is
    /// already bound.
    fn bind(&self, key: &str, value: SharedService);

    /// Register a lazily-constructed, memoized service under `key`. No-op if
    /// `key` is already bound.
    fn singleton(&self, key: &str, factory: ServiceFactory);

    /// Make `alias` resolve to the same target as `key`. Aliases of aliases
    /// keep pointing at the original target.
    fn alias(&self, key: &str, alias: &str);

    /// Resolve a service; `None` when the key is unknown.
    fn get(&self, key: &str) -> Option<SharedService>;

    /// Whether `key` is bound.
    fn exists(&self, key: &str) -> bool;

    /// Register a provider with the lifecycle orchestrator. Safe to call at
    /// any time, including from inside another provider's `register`/`boot`.
    fn register(&self, provider: Arc<dyn Provider>);

    /// Read a process-wide profile value (base path, run mode, ...), falling
    /// back to the built-in defaults for well-known keys.
    fn get_profile(&self, key: &str) -> Option<SharedService>;

    /// Store a process-wide profile value.
    fn put_profile(&self, key: &str, value: SharedService);
}

/// Shared handle to the application port, as handed to providers.
pub type AppContext = Arc<dyn ApplicationPort>;
