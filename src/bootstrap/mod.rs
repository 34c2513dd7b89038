//! Process bootstrap: config loading, tracing and dependency wiring.

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use run::run_app;
pub use wiring::{wire_commissioning, CommissioningRuntime};
