//! Service container - keyed registry with alias indirection and memoized
//! singleton resolution.
//!
//! Entries live in insertion order; the first registration of a key wins and
//! later `bind`/`singleton` calls for the same key are silent no-ops. All
//! reads and writes go through one `RwLock`, so a `get` racing a `bind` is
//! well-defined. Factories run with the lock released - a factory may bind or
//! resolve other entries.

use std::sync::{Arc, OnceLock, RwLock};

use ignition_domain::{ApplicationPort, Binding, ServiceFactory, SharedService};
use tracing::{debug, warn};

/// One registry record: key, binding, and resolution metadata.
///
/// `cached` is shared (`Arc`) so alias entries memoize through the same cell
/// as their origin - a singleton resolved through an alias yields the
/// identical instance.
struct Entry {
    key: String,
    binding: Binding,
    singleton: bool,
    /// Resolution target for alias entries; aliases of aliases carry the
    /// original target, never the intermediate alias.
    target: Option<Binding>,
    cached: Arc<OnceLock<SharedService>>,
}

impl Entry {
    fn new(key: &str, binding: Binding, singleton: bool) -> Self {
        Self {
            key: key.to_string(),
            binding,
            singleton,
            target: None,
            cached: Arc::new(OnceLock::new()),
        }
    }
}

/// Snapshot of an entry's resolution state, taken under the read lock so the
/// actual resolution can run without holding it.
struct Resolved {
    binding: Binding,
    singleton: bool,
    target: Option<Binding>,
    cached: Arc<OnceLock<SharedService>>,
}

/// Insertion-ordered service registry.
#[derive(Default)]
pub struct Container {
    entries: RwLock<Vec<Entry>>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain (non-singleton) service. First registration wins;
    /// re-binding an existing key is a no-op.
    pub fn bind(&self, key: &str, value: SharedService) {
        let mut entries = self.entries.write().expect("container lock poisoned");
        if entries.iter().any(|en| en.key == key) {
            debug!(key, "bind skipped, key already registered");
            return;
        }
        debug!(key, "bound service");
        entries.push(Entry::new(key, Binding::Plain(value), false));
    }

    /// Register a lazily-constructed, memoized service. First registration
    /// wins.
    pub fn singleton(&self, key: &str, factory: ServiceFactory) {
        let mut entries = self.entries.write().expect("container lock poisoned");
        if entries.iter().any(|en| en.key == key) {
            debug!(key, "singleton skipped, key already registered");
            return;
        }
        debug!(key, "bound singleton");
        entries.push(Entry::new(key, factory.into_binding(), true));
    }

    /// Make `alias` resolve to the same target as `key`.
    ///
    /// The new entry carries the origin's resolution target - when the origin
    /// is itself an alias, its own target is propagated, so chains of aliases
    /// all point at the ultimate origin. Singleton origins share their memo
    /// cell with the alias. Unknown origins and already-taken alias names are
    /// no-ops.
    pub fn alias(&self, key: &str, alias: &str) {
        let mut entries = self.entries.write().expect("container lock poisoned");
        if entries.iter().any(|en| en.key == alias) {
            debug!(alias, "alias skipped, key already registered");
            return;
        }
        let Some(origin) = entries.iter().find(|en| en.key == key) else {
            debug!(key, alias, "alias skipped, origin not registered");
            return;
        };
        let target = origin
            .target
            .clone()
            .unwrap_or_else(|| origin.binding.clone());
        let entry = Entry {
            key: alias.to_string(),
            binding: target.clone(),
            singleton: origin.singleton,
            target: Some(target),
            cached: Arc::clone(&origin.cached),
        };
        debug!(key, alias, "aliased service");
        entries.push(entry);
    }

    /// Resolve a service. `None` when the key is unknown.
    ///
    /// Non-singleton entries return their plain value (aliases return the
    /// carried target). Singleton entries return the cached instance when
    /// present, otherwise invoke the factory - constructor form first, then
    /// the container-aware form with `port` - and cache the result. The
    /// factory is invoked at most once per entry, even under concurrent first
    /// resolution.
    pub fn get(&self, key: &str, port: &dyn ApplicationPort) -> Option<SharedService> {
        let resolved = self.resolver(key)?;
        if !resolved.singleton {
            let effective = resolved.target.as_ref().unwrap_or(&resolved.binding);
            return match effective {
                Binding::Plain(value) => Some(Arc::clone(value)),
                other => {
                    warn!(key, binding = ?other, "non-singleton entry without a plain value");
                    None
                }
            };
        }
        let effective = resolved.target.clone().unwrap_or(resolved.binding);
        let instance = resolved.cached.get_or_init(|| match &effective {
            Binding::Constructor(build) => build(),
            Binding::Factory(build) => build(port),
            Binding::Plain(value) => Arc::clone(value),
        });
        Some(Arc::clone(instance))
    }

    /// Whether `key` is registered.
    pub fn exists(&self, key: &str) -> bool {
        let entries = self.entries.read().expect("container lock poisoned");
        entries.iter().any(|en| en.key == key)
    }

    /// Registered keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().expect("container lock poisoned");
        entries.iter().map(|en| en.key.clone()).collect()
    }

    /// Number of registered entries.
    pub fn count(&self) -> usize {
        self.entries.read().expect("container lock poisoned").len()
    }

    /// Bulk-remove entries by key; with no keys, clears the whole registry.
    pub fn destroy(&self, keys: &[&str]) {
        let mut entries = self.entries.write().expect("container lock poisoned");
        if keys.is_empty() {
            debug!("destroyed all container entries");
            entries.clear();
            return;
        }
        entries.retain(|en| !keys.contains(&en.key.as_str()));
    }

    /// Snapshot the resolution state of `key` under the read lock.
    fn resolver(&self, key: &str) -> Option<Resolved> {
        let entries = self.entries.read().expect("container lock poisoned");
        entries.iter().find(|en| en.key == key).map(|en| Resolved {
            binding: en.binding.clone(),
            singleton: en.singleton,
            target: en.target.clone(),
            cached: Arc::clone(&en.cached),
        })
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .finish()
    }
}
