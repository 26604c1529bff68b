//! Logger provider - installs the global tracing subscriber.

use std::sync::{OnceLock, RwLock};

use ignition_domain::value::shared;
use ignition_domain::{keys, AppContext, Provider, RunMode, SupportFlags};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Handle to the installed logger, bound under [`keys::LOGGER`].
///
/// The global tracing subscriber cannot be swapped once installed, so the
/// handle only records the configured level for introspection.
#[derive(Debug, Default)]
pub struct LoggerHandle {
    level: RwLock<String>,
}

impl LoggerHandle {
    fn new(level: &str) -> Self {
        Self {
            level: RwLock::new(level.to_string()),
        }
    }

    /// The level the subscriber was configured with.
    pub fn level(&self) -> String {
        self.level.read().expect("logger level poisoned").clone()
    }

    /// Record a new level. Informational only; the installed subscriber's
    /// filter is fixed (use `RUST_LOG` to override at startup).
    pub fn set_level(&self, level: &str) {
        *self.level.write().expect("logger level poisoned") = level.to_string();
    }
}

/// Installs a `tracing-subscriber` fmt subscriber during `register`.
///
/// The default level follows the run mode (`debug` in dev, `info` otherwise);
/// `RUST_LOG` takes precedence when set. Installation is best-effort so a
/// subscriber set up earlier by the host process is left in place.
pub struct LoggerProvider {
    app: OnceLock<AppContext>,
}

impl Default for LoggerProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerProvider {
    pub fn new() -> Self {
        Self {
            app: OnceLock::new(),
        }
    }

    fn default_level(app: &AppContext) -> &'static str {
        let mode = app
            .get_profile(keys::RUN_MODE)
            .and_then(|v| v.downcast_ref::<RunMode>().copied())
            .unwrap_or_default();
        match mode {
            RunMode::Dev => "debug",
            _ => "info",
        }
    }
}

impl Provider for LoggerProvider {
    fn name(&self) -> &str {
        keys::LOGGER
    }

    fn init(&self, app: AppContext) {
        let _ = self.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        SupportFlags::both()
    }

    fn register(&self) {
        let app = self.app.get().expect("provider initialized");
        let level = Self::default_level(app);
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        // Err means a subscriber is already installed; keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
        app.bind(keys::LOGGER, shared(LoggerHandle::new(level)));
    }

    fn boot(&self) {
        info!("logger ready");
    }
}
