//! Pure T&C gate rules. No I/O.

use serde::{Deserialize, Serialize};

use super::TermsAndConditions;
use crate::commissioning::CommissioningError;

/// Every required acknowledgement bit is set in the accepted mask.
///
/// A required mask of 0 is always satisfied.
pub fn has_required_acknowledgements_been_accepted(
    required: &TermsAndConditions,
    accepted: &TermsAndConditions,
) -> bool {
    required.acknowledgements == 0
        || (required.acknowledgements & accepted.acknowledgements) == required.acknowledgements
}

/// The accepted version is at least the required one.
///
/// A required version of 0 is always satisfied.
pub fn has_required_version_been_accepted(
    required: &TermsAndConditions,
    accepted: &TermsAndConditions,
) -> bool {
    required.version == 0 || accepted.version >= required.version
}

/// Result of checking an acceptance against the requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermsAndConditionsVerdict {
    Accepted,
    MinVersionNotMet,
    /// Nothing was acknowledged at all.
    AcknowledgementsNotReceived,
    /// Some, but not all, required items were acknowledged.
    RequiredNotAccepted,
}

impl TermsAndConditionsVerdict {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

impl From<TermsAndConditionsVerdict> for CommissioningError {
    fn from(verdict: TermsAndConditionsVerdict) -> Self {
        match verdict {
            TermsAndConditionsVerdict::Accepted => CommissioningError::Ok,
            TermsAndConditionsVerdict::MinVersionNotMet => CommissioningError::TcMinVersionNotMet,
            TermsAndConditionsVerdict::AcknowledgementsNotReceived => {
                CommissioningError::TcAcknowledgementsNotReceived
            }
            TermsAndConditionsVerdict::RequiredNotAccepted => CommissioningError::RequiredTcNotAccepted,
        }
    }
}

/// Evaluate the gate. The version is checked before the mask.
pub fn evaluate_acknowledgements(
    required: &TermsAndConditions,
    accepted: &TermsAndConditions,
) -> TermsAndConditionsVerdict {
    if !has_required_version_been_accepted(required, accepted) {
        return TermsAndConditionsVerdict::MinVersionNotMet;
    }
    if !has_required_acknowledgements_been_accepted(required, accepted) {
        return if accepted.acknowledgements == 0 {
            TermsAndConditionsVerdict::AcknowledgementsNotReceived
        } else {
            TermsAndConditionsVerdict::RequiredNotAccepted
        };
    }
    TermsAndConditionsVerdict::Accepted
}
