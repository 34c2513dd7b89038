//! Fail-safe domain module.
//!
//! The fail-safe bounds a window of provisional configuration changes. If the
//! window is not closed by a successful commissioning completion before its
//! deadline, every provisional change is rolled back.

mod context;
mod error;

pub use context::{
    FailSafeArm, FailSafeContext, FailSafeExpiry, FailSafeState, FailSafeTimerToken,
};
pub use error::FailSafeError;
