//! Shared test providers for the runtime suites.
#![allow(dead_code)] // not every suite uses every helper

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use ignition_domain::{AppContext, Provider, SupportFlags};

/// Ordered log of lifecycle events, shared across providers in a scenario.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Provider that records every lifecycle transition it receives.
pub struct RecordingProvider {
    name: String,
    flags: SupportFlags,
    app: OnceLock<AppContext>,
    pub inits: AtomicUsize,
    pub registers: AtomicUsize,
    pub boots: AtomicUsize,
    log: Option<EventLog>,
    on_register: Mutex<Option<Box<dyn FnOnce(&AppContext) + Send>>>,
}

impl RecordingProvider {
    pub fn new(name: &str) -> Arc<Self> {
        Self::with_flags(name, SupportFlags::both())
    }

    pub fn with_flags(name: &str, flags: SupportFlags) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            flags,
            app: OnceLock::new(),
            inits: AtomicUsize::new(0),
            registers: AtomicUsize::new(0),
            boots: AtomicUsize::new(0),
            log: None,
            on_register: Mutex::new(None),
        })
    }

    pub fn with_log(name: &str, log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            flags: SupportFlags::both(),
            app: OnceLock::new(),
            inits: AtomicUsize::new(0),
            registers: AtomicUsize::new(0),
            boots: AtomicUsize::new(0),
            log: Some(log),
            on_register: Mutex::new(None),
        })
    }

    /// Install a hook executed inside `register` (used to exercise reentrant
    /// registration).
    pub fn set_on_register(&self, hook: impl FnOnce(&AppContext) + Send + 'static) {
        *self.on_register.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn register_count(&self) -> usize {
        self.registers.load(Ordering::SeqCst)
    }

    pub fn boot_count(&self) -> usize {
        self.boots.load(Ordering::SeqCst)
    }

    fn record(&self, event: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("{event}:{}", self.name));
        }
    }
}

impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self, app: AppContext) {
        self.inits.fetch_add(1, Ordering::SeqCst);
        let _ = self.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        self.flags
    }

    fn register(&self) {
        self.registers.fetch_add(1, Ordering::SeqCst);
        self.record("register");
        let hook = self.on_register.lock().unwrap().take();
        if let Some(hook) = hook {
            let app = self.app.get().expect("provider initialized");
            hook(app);
        }
    }

    fn boot(&self) {
        self.boots.fetch_add(1, Ordering::SeqCst);
        self.record("boot");
    }
}
