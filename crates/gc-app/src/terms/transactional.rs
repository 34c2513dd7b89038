use gc_core::{TermsAndConditions, TermsAndConditionsError, TermsAndConditionsProvider};
use tracing::info;

use super::AcceptanceRecordStore;

/// Provider that holds session acceptance until it is committed.
///
/// - `latched`: the last value known to be in storage
/// - `temporary`: the value seen by readers, set during the session
///
/// Commit promotes temporary to latched; revert copies latched back into
/// temporary.
///
/// 事务型提供者：临时值需提交后才持久化，失败保护过期时回滚到锁存值。
pub struct TransactionalTermsAndConditionsProvider {
    records: AcceptanceRecordStore,
    requirements: TermsAndConditions,
    latched: Option<TermsAndConditions>,
    temporary: Option<TermsAndConditions>,
}

impl TransactionalTermsAndConditionsProvider {
    /// Load the stored acceptance. A missing, corrupt or version-mismatched
    /// record starts the provider with no acceptance.
    pub fn init(
        records: AcceptanceRecordStore,
        requirements: TermsAndConditions,
    ) -> Result<Self, TermsAndConditionsError> {
        let latched = records.load_or_discard()?;
        info!(
            required_acknowledgements = requirements.acknowledgements,
            required_version = requirements.version,
            has_stored_acceptance = latched.is_some(),
            "transactional terms and conditions provider initialized"
        );
        Ok(Self {
            records,
            requirements,
            latched,
            temporary: latched,
        })
    }

    pub fn latched_acceptance(&self) -> Option<TermsAndConditions> {
        self.latched
    }
}

impl TermsAndConditionsProvider for TransactionalTermsAndConditionsProvider {
    fn get_requirements(&self) -> TermsAndConditions {
        self.requirements
    }

    fn get_acceptance(&self) -> Result<TermsAndConditions, TermsAndConditionsError> {
        Ok(self.temporary.unwrap_or(TermsAndConditions::NONE))
    }

    fn has_acceptance(&self) -> bool {
        self.temporary.is_some()
    }

    fn set_acceptance(&mut self, acceptance: TermsAndConditions) -> Result<(), TermsAndConditionsError> {
        self.temporary = Some(acceptance);
        Ok(())
    }

    fn clear_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        self.reset_acceptance()
    }

    fn reset_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        self.records.delete()?;
        self.latched = None;
        self.revert_acceptance()
    }

    fn commit_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        let acceptance = self
            .temporary
            .or(self.latched)
            .ok_or(TermsAndConditionsError::IncorrectState)?;

        self.records.save(acceptance)?;
        self.latched = Some(acceptance);
        info!(
            acknowledgements = acceptance.acknowledgements,
            version = acceptance.version,
            "terms and conditions acceptance committed"
        );
        Ok(())
    }

    fn revert_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        self.temporary = self.latched;
        Ok(())
    }
}
