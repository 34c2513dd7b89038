//! Device-control service: regulatory configuration and commissioning
//! completion notifications.

mod persistent;

pub use persistent::{CommissioningCompletion, PersistentDeviceControl, REGULATORY_CONFIG_KEY};
