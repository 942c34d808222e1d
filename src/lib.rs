//! Embedding facade for the ferroute trip planner.
//!
//! [`Router`] owns the graph updater manager and a pool of search workers;
//! [`RouterConfig`] is read from TOML.

pub mod config;
pub mod logging;
pub mod router;

pub use config::{RouterConfig, UpdaterConfig, UpdaterType};
pub use logging::init_logging;
pub use router::Router;

pub use ferroute_core::prelude;
