use gc_core::{TermsAndConditions, TermsAndConditionsError, TermsAndConditionsProvider};
use tracing::info;

use super::AcceptanceRecordStore;

/// Provider that persists every acceptance immediately.
///
/// Commit and revert have nothing to do; an acceptance recorded during a
/// fail-safe window survives its expiry.
pub struct DurableTermsAndConditionsProvider {
    records: AcceptanceRecordStore,
    requirements: TermsAndConditions,
    acceptance: Option<TermsAndConditions>,
}

impl DurableTermsAndConditionsProvider {
    pub fn init(
        records: AcceptanceRecordStore,
        requirements: TermsAndConditions,
    ) -> Result<Self, TermsAndConditionsError> {
        let acceptance = records.load_or_discard()?;
        info!(
            required_acknowledgements = requirements.acknowledgements,
            required_version = requirements.version,
            has_stored_acceptance = acceptance.is_some(),
            "durable terms and conditions provider initialized"
        );
        Ok(Self {
            records,
            requirements,
            acceptance,
        })
    }
}

impl TermsAndConditionsProvider for DurableTermsAndConditionsProvider {
    fn get_requirements(&self) -> TermsAndConditions {
        self.requirements
    }

    fn get_acceptance(&self) -> Result<TermsAndConditions, TermsAndConditionsError> {
        Ok(self.acceptance.unwrap_or(TermsAndConditions::NONE))
    }

    fn has_acceptance(&self) -> bool {
        self.acceptance.is_some()
    }

    fn set_acceptance(&mut self, acceptance: TermsAndConditions) -> Result<(), TermsAndConditionsError> {
        self.records.save(acceptance)?;
        self.acceptance = Some(acceptance);
        Ok(())
    }

    fn clear_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        self.records.delete()?;
        self.acceptance = None;
        Ok(())
    }

    fn reset_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        self.clear_acceptance()
    }

    fn commit_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        Ok(())
    }

    fn revert_acceptance(&mut self) -> Result<(), TermsAndConditionsError> {
        Ok(())
    }
}
