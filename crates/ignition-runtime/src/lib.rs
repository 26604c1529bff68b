//! Core of the ignition bootstrap runtime.
//!
//! Three pieces, leaf-first:
//!
//! - [`queue::ProviderQueue`] - the ordered, deduplicating, mutation-safe
//!   sequence driving the register/boot drains.
//! - [`container::Container`] - keyed registry with alias indirection and
//!   memoized singleton resolution.
//! - [`app::App`] - the orchestrator owning one container and two queues,
//!   exposing the two-phase provider lifecycle and the run/stop loop.
//!
//! ```no_run
//! use ignition_runtime::App;
//!
//! # async fn demo() {
//! let app = App::new();
//! app.init();
//! app.start_up().await;
//! # }
//! ```

pub mod app;
pub mod container;
pub mod properties;
pub mod queue;

pub use app::App;
pub use container::Container;
pub use properties::{DefaultProps, PropertyStore};
pub use queue::ProviderQueue;
