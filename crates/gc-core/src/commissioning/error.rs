use serde::{Deserialize, Serialize};

/// Error code carried in every general commissioning command response.
///
/// These are expected protocol outcomes the commissioner reacts to, not
/// Rust errors.
///
/// 命令响应中的错误码（协议层结果，而非异常）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommissioningError {
    Ok = 0,
    ValueOutsideRange = 1,
    InvalidAuthentication = 2,
    NoFailSafe = 3,
    BusyWithOtherAdmin = 4,
    RequiredTcNotAccepted = 5,
    TcAcknowledgementsNotReceived = 6,
    TcMinVersionNotMet = 7,
}

impl CommissioningError {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Whether this outcome is a terms-and-conditions rejection.
    pub fn is_terms_and_conditions_rejection(self) -> bool {
        matches!(
            self,
            Self::RequiredTcNotAccepted | Self::TcAcknowledgementsNotReceived | Self::TcMinVersionNotMet
        )
    }
}
