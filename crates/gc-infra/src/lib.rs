//! # gc-infra
//!
//! Adapters implementing the `gc-core` ports: key-value storage, clocks, the
//! fail-safe timer, an in-memory fabric table and the device-control service.

pub mod commissioning_window;
pub mod device;
pub mod fabric;
pub mod storage;
pub mod time;

pub use commissioning_window::CommissioningWindowFlag;
pub use device::PersistentDeviceControl;
pub use fabric::InMemoryFabricTable;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::{ManualClock, MonotonicClock, TokioFailSafeTimer};
