//! Bootstrapper provider - keyed bootable units run once at boot.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use ignition_domain::value::shared;
use ignition_domain::{AppContext, Bootstrapper, Provider, SupportFlags};
use tracing::{debug, info};

/// Name the provider binds itself under.
pub const BOOTSTRAPPER_CLASS: &str = "AppBootstrapper";

struct Inner {
    app: OnceLock<AppContext>,
    booted: AtomicBool,
    units: Mutex<BTreeMap<String, Arc<dyn Bootstrapper>>>,
}

/// Holds a keyed set of [`Bootstrapper`] units.
///
/// `register` binds the provider into the container and gives every unit its
/// one-time `initialize`; `boot` runs every unit exactly once - later boots
/// (and `load` without force) are no-ops.
#[derive(Clone)]
pub struct BootstrapProvider {
    inner: Arc<Inner>,
}

impl Default for BootstrapProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapProvider {
    /// Create an empty bootstrapper.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                app: OnceLock::new(),
                booted: AtomicBool::new(false),
                units: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Create a bootstrapper pre-loaded with units.
    pub fn with_units(units: impl IntoIterator<Item = Arc<dyn Bootstrapper>>) -> Self {
        let provider = Self::new();
        for unit in units {
            provider.add(unit);
        }
        provider
    }

    /// Add a unit; duplicate names are ignored. Returns whether it was added.
    pub fn add(&self, unit: Arc<dyn Bootstrapper>) -> bool {
        let mut units = self.inner.units.lock().expect("bootstrapper lock poisoned");
        if units.contains_key(unit.name()) {
            return false;
        }
        debug!(unit = unit.name(), "added bootstrapper unit");
        units.insert(unit.name().to_string(), unit);
        true
    }

    /// Remove a unit by name. Returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut units = self.inner.units.lock().expect("bootstrapper lock poisoned");
        units.remove(name).is_some()
    }

    /// Names of the held units.
    pub fn unit_names(&self) -> Vec<String> {
        let units = self.inner.units.lock().expect("bootstrapper lock poisoned");
        units.keys().cloned().collect()
    }

    /// Whether the one-time boot has already run.
    pub fn booted(&self) -> bool {
        self.inner.booted.load(Ordering::SeqCst)
    }

    /// Boot a single unit by name, out of band. Refused after the global boot
    /// unless `force` is set. Returns whether the unit ran.
    pub fn load(&self, name: &str, force: bool) -> bool {
        if self.booted() && !force {
            return false;
        }
        let unit = {
            let units = self.inner.units.lock().expect("bootstrapper lock poisoned");
            units.get(name).cloned()
        };
        let Some(unit) = unit else { return false };
        if let Some(app) = self.inner.app.get() {
            unit.initialize(app);
        }
        unit.boot();
        true
    }

    fn units_snapshot(&self) -> Vec<Arc<dyn Bootstrapper>> {
        let units = self.inner.units.lock().expect("bootstrapper lock poisoned");
        units.values().cloned().collect()
    }
}

impl Provider for BootstrapProvider {
    fn name(&self) -> &str {
        BOOTSTRAPPER_CLASS
    }

    fn init(&self, app: AppContext) {
        let _ = self.inner.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        SupportFlags::both()
    }

    fn register(&self) {
        let app = self.inner.app.get().expect("provider initialized");
        if !app.exists(BOOTSTRAPPER_CLASS) {
            app.bind(BOOTSTRAPPER_CLASS, shared(self.clone()));
        }
        for unit in self.units_snapshot() {
            unit.initialize(app);
        }
    }

    fn boot(&self) {
        if self.inner.booted.swap(true, Ordering::SeqCst) {
            return;
        }
        let units = self.units_snapshot();
        info!(units = units.len(), "running bootstrapper units");
        for unit in units {
            unit.boot();
        }
    }
}
