//! # gc-app
//!
//! Use cases of the general commissioning flow.
//!
//! - [`terms`]: terms-and-conditions providers over the key-value port
//! - [`setup_flow`]: requirement evaluation facade used by the handlers
//! - [`events`]: in-process platform event bus
//! - [`usecases::general_commissioning`]: the command handlers and fail-safe
//!   expiry handling

pub mod deps;
pub mod events;
pub mod settings;
pub mod setup_flow;
pub mod terms;
pub mod usecases;

pub use deps::CommissioningDeps;
pub use events::{PlatformEvent, PlatformEventBus, PlatformEventHandler};
pub use settings::CommissioningSettings;
pub use setup_flow::EnhancedSetupFlow;
pub use usecases::general_commissioning::{CommissioningServerError, GeneralCommissioningServer};
