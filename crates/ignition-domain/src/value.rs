//! Dynamic service value model.
//!
//! The container stores polymorphic services behind [`SharedService`] and
//! decides *how* each entry resolves at registration time via the [`Binding`]
//! tag - a plain value, a zero-argument constructor, or a container-aware
//! factory. Resolution never inspects value shapes at runtime.

use std::any::Any;
use std::sync::Arc;

use crate::port::ApplicationPort;

/// A shared, dynamically-typed service instance.
///
/// Consumers downcast to the concrete type they published:
///
/// ```
/// use std::sync::Arc;
/// use ignition_domain::SharedService;
///
/// let service: SharedService = Arc::new(String::from("hello"));
/// assert_eq!(service.downcast_ref::<String>().unwrap(), "hello");
/// ```
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// Zero-argument constructor for a singleton entry.
pub type ConstructorFn = Arc<dyn Fn() -> SharedService + Send + Sync>;

/// Container-aware factory for a singleton entry.
pub type FactoryFn = Arc<dyn Fn(&dyn ApplicationPort) -> SharedService + Send + Sync>;

/// Callback invoked by the run loop's periodic health tick.
///
/// Bound under [`keys::APP_HEALTH`](crate::keys::APP_HEALTH) as a
/// `SharedService` wrapping this type.
pub type HealthCheck = Arc<dyn Fn() + Send + Sync>;

/// How a container entry produces its value, decided when the entry is bound.
#[derive(Clone)]
pub enum Binding {
    /// A plain bound object, returned as-is.
    Plain(SharedService),
    /// A zero-argument constructor; resolved lazily, memoized for singletons.
    Constructor(ConstructorFn),
    /// A one-argument factory receiving the application port.
    Factory(FactoryFn),
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Binding::Plain"),
            Self::Constructor(_) => f.write_str("Binding::Constructor"),
            Self::Factory(_) => f.write_str("Binding::Factory"),
        }
    }
}

/// The two factory shapes `singleton` accepts.
///
/// When an entry somehow carries both forms, the constructor takes precedence;
/// the tagged enum makes that a non-case here - each entry holds exactly one.
pub enum ServiceFactory {
    /// Factory that needs no context.
    Constructor(ConstructorFn),
    /// Factory that receives the application port.
    WithApp(FactoryFn),
}

impl ServiceFactory {
    /// Wrap a zero-argument constructor closure.
    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn() -> SharedService + Send + Sync + 'static,
    {
        Self::Constructor(Arc::new(f))
    }

    /// Wrap a container-aware factory closure.
    pub fn with_app<F>(f: F) -> Self
    where
        F: Fn(&dyn ApplicationPort) -> SharedService + Send + Sync + 'static,
    {
        Self::WithApp(Arc::new(f))
    }

    /// Convert into the binding stored on the entry.
    pub fn into_binding(self) -> Binding {
        match self {
            Self::Constructor(f) => Binding::Constructor(f),
            Self::WithApp(f) => Binding::Factory(f),
        }
    }
}

/// Convenience for wrapping a concrete value as a [`SharedService`].
pub fn shared<T: Any + Send + Sync>(value: T) -> SharedService {
    Arc::new(value)
}
