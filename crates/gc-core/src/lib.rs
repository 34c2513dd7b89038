//! # gc-core
//!
//! Core domain models and business logic for the general commissioning flow
//! of a device joining a fabric.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod commissioning;
pub mod config;
pub mod fail_safe;
pub mod ids;
pub mod ports;
pub mod session;
pub mod terms;

// Re-export commonly used types at the crate root
pub use commissioning::{Breadcrumb, CommissioningError};
pub use config::CommissioningConfig;
pub use fail_safe::{FailSafeContext, FailSafeError, FailSafeExpiry, FailSafeTimerToken};
pub use ids::{EndpointId, FabricIndex, NodeId};
pub use session::{SessionDescriptor, SessionType};
pub use terms::{TermsAndConditions, TermsAndConditionsError, TermsAndConditionsProvider};
