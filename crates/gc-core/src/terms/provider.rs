use thiserror::Error;

use super::{RecordCodecError, TermsAndConditions};
use crate::ports::StorageError;

#[derive(Debug, Error)]
pub enum TermsAndConditionsError {
    #[error("acceptance storage failed")]
    Storage(#[from] StorageError),

    #[error("acceptance record is invalid")]
    Codec(#[from] RecordCodecError),

    #[error("no acceptance to commit")]
    IncorrectState,
}

/// Source of truth for required and accepted terms and conditions.
///
/// Two behaviours exist behind this trait:
///
/// - transactional: `set_acceptance` only updates an in-session (temporary)
///   value; `commit_acceptance` makes it durable and `revert_acceptance`
///   restores the last durable (latched) value.
/// - durable: `set_acceptance` persists immediately; commit and revert are
///   no-ops.
///
/// Requirements are configuration, never persisted, and never affected by
/// clearing or resetting the acceptance.
pub trait TermsAndConditionsProvider: Send + Sync {
    /// Configured requirements.
    fn get_requirements(&self) -> TermsAndConditions;

    /// Current acceptance. Reads as [`TermsAndConditions::NONE`] when nothing
    /// was ever accepted.
    fn get_acceptance(&self) -> Result<TermsAndConditions, TermsAndConditionsError>;

    /// Whether any acceptance (temporary or durable) is present.
    fn has_acceptance(&self) -> bool;

    fn set_acceptance(&mut self, acceptance: TermsAndConditions) -> Result<(), TermsAndConditionsError>;

    /// Erase the persisted acceptance (factory reset).
    fn clear_acceptance(&mut self) -> Result<(), TermsAndConditionsError>;

    /// Erase the persisted acceptance and drop any in-session value.
    fn reset_acceptance(&mut self) -> Result<(), TermsAndConditionsError>;

    /// Persist the in-session acceptance.
    fn commit_acceptance(&mut self) -> Result<(), TermsAndConditionsError>;

    /// Drop the in-session acceptance, restoring the last persisted one.
    fn revert_acceptance(&mut self) -> Result<(), TermsAndConditionsError>;
}
