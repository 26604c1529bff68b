//! Application orchestrator.
//!
//! Owns one [`Container`] and two [`ProviderQueue`]s (pending registers,
//! pending boots) and wires them into the two-phase provider lifecycle:
//!
//! ```text
//! App::new()  ->  init()           ioc/props/core-providers, each once
//!             ->  register(p)      any time, including reentrantly
//!             ->  start_up()       drain registers, drain boots, run loop
//!             ->  stop()           from another task; never blocks
//! ```
//!
//! `start_up` blocks its task until a stop sentinel arrives on the buffered
//! control channel; a `stop` issued before any `start_up` is remembered as a
//! pending-stop flag so the next `start_up` exits immediately.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once, OnceLock};
use std::time::Duration;

use ignition_domain::value::shared;
use ignition_domain::{
    keys, AppContext, ApplicationPort, HealthCheck, Provider, ServiceFactory, SharedService,
};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::container::Container;
use crate::properties::{DefaultProps, PropertyStore};
use crate::queue::ProviderQueue;

/// Property key holding the control-channel sender.
pub const CTRL_CHAN: &str = "appCtrlChan";
/// Monotonic count of completed provider `register` calls.
pub const REGISTERS_DONE: &str = "registers_done";
/// Monotonic count of completed provider `boot` calls.
pub const BOOTS_DONE: &str = "boots_done";
/// Control-channel value requesting shutdown.
pub const STOP_SENTINEL: i32 = -1;

const STARTED_EV: &str = "started";
const STOPPED_EV: &str = "stopped";

const IOC_PHASE: &str = "ioc";
const PROPS_PHASE: &str = "properties";
const PROVIDER_PHASE: &str = "provider";
const REGISTER_PHASE: &str = "register";
const BOOT_PHASE: &str = "boot";

/// Control channel capacity. Two slots so `stop` can always buffer its
/// sentinel even when the run loop has not reached its receive yet.
const CTRL_BUFFER: usize = 2;
const HEALTH_TICK: Duration = Duration::from_secs(3);

/// Per-phase one-time guards, keyed by phase name. The map-level mutex makes
/// guard creation race-free; the `Once` makes each phase body run exactly
/// once even under concurrent first access.
#[derive(Default)]
struct PhaseGuards {
    locks: Mutex<HashMap<String, Arc<Once>>>,
}

impl PhaseGuards {
    fn run_once(&self, phase: &str, body: impl FnOnce()) {
        let once = {
            let mut locks = self.locks.lock().expect("phase guard map poisoned");
            Arc::clone(
                locks
                    .entry(phase.to_string())
                    .or_insert_with(|| Arc::new(Once::new())),
            )
        };
        once.call_once(body);
    }
}

struct AppInner {
    container: OnceLock<Container>,
    properties: OnceLock<PropertyStore>,
    defaults: OnceLock<DefaultProps>,
    registers: ProviderQueue,
    boots: ProviderQueue,
    /// Default providers consumed by the one-time core bootstrap.
    core_providers: Mutex<Vec<Arc<dyn Provider>>>,
    guards: PhaseGuards,
}

/// Cheaply-cloneable application handle.
///
/// Constructed once at process start and passed into every provider via
/// `init`; there is no hidden global instance.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application with no default providers.
    pub fn new() -> Self {
        Self::with_providers(Vec::new())
    }

    /// Create an application whose one-time core bootstrap registers the
    /// given default providers, in order.
    pub fn with_providers(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            inner: Arc::new(AppInner {
                container: OnceLock::new(),
                properties: OnceLock::new(),
                defaults: OnceLock::new(),
                registers: ProviderQueue::new(),
                boots: ProviderQueue::new(),
                core_providers: Mutex::new(providers),
                guards: PhaseGuards::default(),
            }),
        }
    }

    /// Run all one-time initialization: container, properties, core provider
    /// registration. Idempotent and safe under concurrent first access.
    pub fn init(&self) {
        self.ioc_init();
        self.props_init();
        if !self.properties().is_init(PROVIDER_PHASE) {
            self.init_core_providers();
        }
    }

    /// Build the container and bind the application handle under `app`.
    /// Executes at most once.
    pub fn ioc_init(&self) {
        self.inner.guards.run_once(IOC_PHASE, || {
            let container = self.inner.container.get_or_init(Container::new);
            container.bind(keys::APP, shared(self.clone()));
            debug!("ioc container initialized");
        });
    }

    /// Build the property store and detect default properties. Executes at
    /// most once.
    pub fn props_init(&self) {
        self.inner.guards.run_once(PROPS_PHASE, || {
            self.inner.properties.get_or_init(PropertyStore::new);
            self.inner.defaults.get_or_init(DefaultProps::detect);
            debug!("property store initialized");
        });
    }

    /// Register the default providers handed to `with_providers`. Executes at
    /// most once.
    pub fn init_core_providers(&self) {
        self.inner.guards.run_once(PROVIDER_PHASE, || {
            let providers = {
                let mut core = self
                    .inner
                    .core_providers
                    .lock()
                    .expect("core provider list poisoned");
                std::mem::take(&mut *core)
            };
            let count = providers.len();
            for provider in providers {
                self.register_provider(provider);
            }
            self.properties().set_init(PROVIDER_PHASE);
            debug!(count, "core providers registered");
        });
    }

    /// Register a provider: inject the context, read its support flags, and
    /// queue it for the phases it wants. Safe to call at any time, including
    /// from inside another provider's `register`/`boot`.
    pub fn register_provider(&self, provider: Arc<dyn Provider>) {
        provider.init(Arc::new(self.clone()) as AppContext);
        let flags = provider.support();
        if flags.boot {
            self.inner.boots.add(Arc::clone(&provider));
        }
        if flags.register {
            self.inner.registers.add(provider);
        }
    }

    /// Initial drain of the pending-register queue. Guarded by the monotonic
    /// register counter so it runs at most once.
    pub fn init_registers(&self) {
        if self.registers_done() > 0 {
            return;
        }
        self.drain_registers();
        self.properties().set_init(REGISTER_PHASE);
    }

    /// Initial drain of the pending-boot queue. Guarded by the monotonic boot
    /// counter so it runs at most once.
    pub fn init_boots(&self) {
        if self.boots_done() > 0 {
            return;
        }
        self.drain_boots();
        self.properties().set_init(BOOT_PHASE);
    }

    /// Drain both queues: the one-time core drains first, then whatever was
    /// registered afterwards (e.g. from `main`). Called every time `start_up`
    /// begins a run.
    pub fn providers_init(&self) {
        self.load_core_providers();
        self.load_custom_providers();
    }

    /// Run the initial register/boot drains when they have not happened yet.
    pub fn load_core_providers(&self) {
        if !self.properties().is_init(REGISTER_PHASE) {
            self.init_registers();
        }
        if !self.properties().is_init(BOOT_PHASE) {
            self.init_boots();
        }
    }

    /// Drain providers registered after the initial core drains.
    pub fn load_custom_providers(&self) {
        self.drain_registers();
        self.drain_boots();
    }

    fn drain_registers(&self) {
        self.inner.registers.drain(|provider| {
            debug!(provider = provider.name(), "register");
            provider.register();
            self.properties().incr(REGISTERS_DONE);
        });
    }

    fn drain_boots(&self) {
        self.inner.boots.drain(|provider| {
            debug!(provider = provider.name(), "boot");
            provider.boot();
            self.properties().incr(BOOTS_DONE);
        });
    }

    /// Completed `register` calls so far.
    pub fn registers_done(&self) -> usize {
        self.properties().counter(REGISTERS_DONE)
    }

    /// Completed `boot` calls so far.
    pub fn boots_done(&self) -> usize {
        self.properties().counter(BOOTS_DONE)
    }

    /// Providers still waiting for their `register` phase.
    pub fn pending_registers(&self) -> usize {
        self.inner.registers.count()
    }

    /// Providers still waiting for their `boot` phase.
    pub fn pending_boots(&self) -> usize {
        self.inner.boots.count()
    }

    /// Run loop: drain providers, announce start, then wait for the stop
    /// sentinel, invoking the registered health check every tick.
    ///
    /// Returns immediately when a stop was requested before start (the
    /// pending-stop profile flag).
    pub async fn start_up(&self) {
        self.init();
        if self.profile_flag(keys::HELP_STOP) {
            info!(event = STOPPED_EV, "stop requested before start");
            return;
        }
        let mut rx = self.control_receiver();
        self.providers_init();
        // A provider may raise the flag during its register phase (--help).
        if self.profile_flag(keys::HELP_STOP) {
            info!(event = STOPPED_EV, "stop requested during provider drain");
            return;
        }
        info!(event = STARTED_EV, "application started");
        let start = Instant::now();
        let mut ticker = interval_at(start + HEALTH_TICK, HEALTH_TICK);
        loop {
            tokio::select! {
                signal = rx.recv() => match signal {
                    Some(STOP_SENTINEL) | None => break,
                    Some(other) => debug!(signal = other, "ignoring control signal"),
                },
                _ = ticker.tick() => self.run_health_check(),
            }
        }
        rx.close();
        info!(event = STOPPED_EV, "application stopped");
    }

    /// Request shutdown. Never blocks: the control channel keeps spare buffer
    /// capacity, and when no channel exists yet the intent is recorded so the
    /// next `start_up` exits immediately. Calling `stop` again after shutdown
    /// is a no-op.
    pub fn stop(&self) {
        let sender = self
            .properties()
            .get(CTRL_CHAN)
            .and_then(|v| v.downcast_ref::<mpsc::Sender<i32>>().cloned());
        match sender {
            Some(tx) => {
                if let Err(err) = tx.try_send(STOP_SENTINEL) {
                    debug!(%err, "stop signal not delivered");
                } else {
                    info!(event = STOPPED_EV, "stop requested");
                }
            }
            None => {
                debug!("stop requested before start, recording pending stop");
                self.put_profile(keys::HELP_STOP, shared(true));
            }
        }
    }

    /// Create a fresh control channel, publish the sender, return the
    /// receiver.
    fn control_receiver(&self) -> mpsc::Receiver<i32> {
        let (tx, rx) = mpsc::channel(CTRL_BUFFER);
        self.properties().put(CTRL_CHAN, shared(tx));
        rx
    }

    /// Resolve the `app.health` key and invoke it when it holds a health
    /// callback.
    fn run_health_check(&self) {
        if let Some(service) = self.get(keys::APP_HEALTH) {
            if let Some(check) = service.downcast_ref::<HealthCheck>() {
                check();
            }
        }
    }

    fn profile_flag(&self, key: &str) -> bool {
        self.get_profile(key)
            .and_then(|v| v.downcast_ref::<bool>().copied())
            .unwrap_or(false)
    }

    /// All profile values: the built-in defaults overlaid with everything
    /// explicitly stored.
    pub fn profiles(&self) -> HashMap<String, SharedService> {
        let mut profiles = HashMap::new();
        self.defaults().for_each(|key, value| {
            profiles.insert(key.to_string(), value);
            true
        });
        self.properties().for_each(|key, value| {
            profiles.insert(key.to_string(), value.clone());
        });
        profiles
    }

    fn container(&self) -> &Container {
        self.ioc_init();
        self.inner
            .container
            .get()
            .expect("container initialized by ioc_init")
    }

    fn properties(&self) -> &PropertyStore {
        self.props_init();
        self.inner
            .properties
            .get()
            .expect("properties initialized by props_init")
    }

    fn defaults(&self) -> &DefaultProps {
        self.props_init();
        self.inner
            .defaults
            .get()
            .expect("defaults initialized by props_init")
    }
}

impl ApplicationPort for App {
    fn bind(&self, key: &str, value: SharedService) {
        if key.is_empty() {
            return;
        }
        self.container().bind(key, value);
    }

    fn singleton(&self, key: &str, factory: ServiceFactory) {
        if key.is_empty() {
            return;
        }
        self.container().singleton(key, factory);
    }

    fn alias(&self, key: &str, alias: &str) {
        self.container().alias(key, alias);
    }

    fn get(&self, key: &str) -> Option<SharedService> {
        self.container().get(key, self)
    }

    fn exists(&self, key: &str) -> bool {
        self.container().exists(key)
    }

    fn register(&self, provider: Arc<dyn Provider>) {
        self.register_provider(provider);
    }

    fn get_profile(&self, key: &str) -> Option<SharedService> {
        self.properties()
            .get(key)
            .or_else(|| self.defaults().get(key))
    }

    fn put_profile(&self, key: &str, value: SharedService) {
        self.properties().put(key, value);
    }
}

impl App {
    /// Bind a plain service (delegates to the container).
    pub fn bind(&self, key: &str, value: SharedService) {
        ApplicationPort::bind(self, key, value);
    }

    /// Register a memoized service (delegates to the container).
    pub fn singleton(&self, key: &str, factory: ServiceFactory) {
        ApplicationPort::singleton(self, key, factory);
    }

    /// Alias a service key (delegates to the container).
    pub fn alias(&self, key: &str, alias: &str) {
        ApplicationPort::alias(self, key, alias);
    }

    /// Resolve a service (delegates to the container).
    pub fn get(&self, key: &str) -> Option<SharedService> {
        ApplicationPort::get(self, key)
    }

    /// Whether a service key is bound.
    pub fn exists(&self, key: &str) -> bool {
        ApplicationPort::exists(self, key)
    }

    /// Register a provider with the lifecycle orchestrator.
    pub fn register(&self, provider: Arc<dyn Provider>) {
        self.register_provider(provider);
    }

    /// Read a profile value with default fallback.
    pub fn get_profile(&self, key: &str) -> Option<SharedService> {
        ApplicationPort::get_profile(self, key)
    }

    /// Store a profile value.
    pub fn put_profile(&self, key: &str, value: SharedService) {
        ApplicationPort::put_profile(self, key, value);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("pending_registers", &self.inner.registers.count())
            .field("pending_boots", &self.inner.boots.count())
            .finish()
    }
}
