use thiserror::Error;

use crate::ids::FabricIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailSafeError {
    #[error("fail-safe is busy cleaning up a previous expiry")]
    Busy,

    #[error("fail-safe is armed by fabric {armed_by}")]
    ArmedByOtherFabric { armed_by: FabricIndex },

    #[error("fail-safe expiry length must be non-zero")]
    InvalidDuration,
}
