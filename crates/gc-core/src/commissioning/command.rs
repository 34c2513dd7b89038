//! Command payloads and responses of the general commissioning cluster.

use serde::{Deserialize, Serialize};

use super::CommissioningError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmFailSafeRequest {
    /// `0` means "expire now".
    pub expiry_length_seconds: u16,
    pub breadcrumb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRegulatoryConfigRequest {
    /// Raw location value; out-of-range values are answered, not rejected.
    pub new_regulatory_config: u8,
    pub country_code: String,
    pub breadcrumb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTcAcknowledgementsRequest {
    pub tc_version: u16,
    pub tc_user_response: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissioningCompleteRequest {}

/// Cluster-specific response: an error code plus optional debug text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissioningResponse {
    pub error_code: CommissioningError,
    pub debug_text: Option<String>,
}

impl CommissioningResponse {
    pub fn ok() -> Self {
        Self::with_error(CommissioningError::Ok)
    }

    pub fn with_error(error_code: CommissioningError) -> Self {
        Self {
            error_code,
            debug_text: None,
        }
    }

    pub fn with_debug_text(mut self, debug_text: impl Into<String>) -> Self {
        self.debug_text = Some(debug_text.into());
        self
    }
}

/// Interaction-level status used when no cluster response is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionStatus {
    /// Infrastructure failure while handling the command.
    Failure,
    /// Payload violated a field constraint.
    ConstraintError,
    /// Command not supported by this device configuration.
    UnsupportedCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub status: InteractionStatus,
    pub debug_text: String,
}

impl CommandStatus {
    pub fn failure(debug_text: impl Into<String>) -> Self {
        Self {
            status: InteractionStatus::Failure,
            debug_text: debug_text.into(),
        }
    }

    pub fn constraint_error(debug_text: impl Into<String>) -> Self {
        Self {
            status: InteractionStatus::ConstraintError,
            debug_text: debug_text.into(),
        }
    }

    pub fn unsupported_command(debug_text: impl Into<String>) -> Self {
        Self {
            status: InteractionStatus::UnsupportedCommand,
            debug_text: debug_text.into(),
        }
    }
}

/// What a command handler hands back to the dispatch layer.
pub type CommandResult = Result<CommissioningResponse, CommandStatus>;
