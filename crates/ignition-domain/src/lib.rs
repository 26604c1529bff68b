//! Contracts for the ignition bootstrap runtime.
//!
//! This crate defines the seams everything else plugs into:
//!
//! - [`Provider`] - a unit of functionality exposing `init`/`register`/`boot`
//!   that the orchestrator drives through its two-phase lifecycle.
//! - [`ApplicationPort`] - the container/profile contract providers consume to
//!   publish and resolve shared services.
//! - [`Binding`] / [`ServiceFactory`] - the tagged value model the container
//!   stores, decided at registration time.
//!
//! No implementation lives here; the runtime crate supplies the container and
//! orchestrator, the providers crate supplies the default providers.

pub mod error;
pub mod keys;
pub mod port;
pub mod provider;
pub mod run_mode;
pub mod value;

pub use error::{Error, Result};
pub use port::{AppContext, ApplicationPort};
pub use provider::{Bootstrapper, Provider, SupportFlags};
pub use run_mode::RunMode;
pub use value::{Binding, ConstructorFn, FactoryFn, HealthCheck, ServiceFactory, SharedService};
