//! Default service providers for the ignition bootstrap runtime.
//!
//! Five providers cover the core bootstrap, registered in this order:
//!
//! 1. [`bootstrapper::BootstrapProvider`] - keyed bootable units
//! 2. [`command_line::CommandLineProvider`] - parsed process arguments
//! 3. [`environment::EnvironmentProvider`] - environment snapshot
//! 4. [`configure::ConfigureProvider`] - merged file/env configuration
//! 5. [`logger::LoggerProvider`] - tracing subscriber setup
//!
//! Each one publishes its service into the container under a well-known key
//! (see `ignition_domain::keys`) and consumes only the application port.

pub mod bootstrapper;
pub mod command_line;
pub mod configure;
pub mod environment;
pub mod logger;

use std::sync::Arc;

use ignition_domain::Provider;

pub use bootstrapper::BootstrapProvider;
pub use command_line::{CliOptions, CommandLineProvider};
pub use configure::{Configuration, ConfigureProvider};
pub use environment::{EnvStore, EnvironmentProvider};
pub use logger::{LoggerHandle, LoggerProvider};

/// The default provider set, in core bootstrap order.
pub fn default_providers() -> Vec<Arc<dyn Provider>> {
    vec![
        Arc::new(BootstrapProvider::new()),
        Arc::new(CommandLineProvider::new()),
        Arc::new(EnvironmentProvider::new()),
        Arc::new(ConfigureProvider::new()),
        Arc::new(LoggerProvider::new()),
    ]
}
