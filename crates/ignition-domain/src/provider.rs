//! Provider contract - the unit the lifecycle orchestrator drives.

use crate::port::AppContext;

/// Which lifecycle phases a provider participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportFlags {
    /// Provider wants its `register` hook invoked during the register drain.
    pub register: bool,
    /// Provider wants its `boot` hook invoked during the boot drain.
    pub boot: bool,
}

impl SupportFlags {
    /// Participate in both phases (the common case).
    pub fn both() -> Self {
        Self {
            register: true,
            boot: true,
        }
    }

    /// Register phase only.
    pub fn register_only() -> Self {
        Self {
            register: true,
            boot: false,
        }
    }

    /// Boot phase only.
    pub fn boot_only() -> Self {
        Self {
            register: false,
            boot: true,
        }
    }
}

impl Default for SupportFlags {
    fn default() -> Self {
        Self::both()
    }
}

/// A unit of functionality that plugs into the orchestrator.
///
/// Lifecycle: authored -> `init` (context injected) -> optionally `register`
/// (publish container entries, register further providers) -> optionally
/// `boot` (consume what others registered). The orchestrator invokes each
/// transition at most once per provider per application lifetime.
///
/// Implementations keep the injected context in interior state (`OnceLock` is
/// the usual shape) since all hooks take `&self`.
pub trait Provider: Send + Sync {
    /// Stable name; also the identity used for queue deduplication.
    fn name(&self) -> &str;

    /// Receive the application context. Called exactly once, before any other
    /// hook.
    fn init(&self, app: AppContext);

    /// Which phases this provider wants.
    fn support(&self) -> SupportFlags {
        SupportFlags::both()
    }

    /// Register phase: publish container entries. May register more
    /// providers through the context; those join the current drain.
    fn register(&self) {}

    /// Boot phase: runs after every pending register has completed.
    fn boot(&self) {}
}

/// A small bootable unit managed by the bootstrapper provider.
///
/// Bootstrappers are keyed by name; the bootstrapper provider initializes all
/// of them during its register phase and boots each exactly once.
pub trait Bootstrapper: Send + Sync {
    /// Stable name; duplicate names are ignored on add.
    fn name(&self) -> &str;

    /// One-time setup with the application context.
    fn initialize(&self, _app: &AppContext) {}

    /// Run the unit.
    fn boot(&self);
}
