//! Port interfaces for the application layer
//!
//! Ports define the contract between the commissioning use cases and the
//! infrastructure that backs them: persistent storage, the fabric table,
//! the device-control layer, the timer service and the clock.
//!
//! ## Port Placement Guidelines
//!
//! A port lives here when it represents a collaborator the commissioning
//! flow consumes and that is implemented by `gc-infra` (or a platform
//! integration). Pure domain helpers stay in their domain module.

mod clock;
mod commissioning_window;
mod configuration;
mod device_control;
mod fabric_table;
mod storage;
mod timer;

pub use clock::ClockPort;
pub use commissioning_window::CommissioningWindowPort;
pub use configuration::{ConfigurationError, ConfigurationPort};
pub use device_control::DeviceControlPort;
pub use fabric_table::FabricTablePort;
pub use storage::{KeyValueStorePort, StorageError};
pub use timer::FailSafeTimerPort;
