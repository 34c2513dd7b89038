//! Enhanced setup flow: requirement checks over the T&C provider.

use gc_core::commissioning::CommissioningError;
use gc_core::terms::{
    evaluate_acknowledgements, has_required_acknowledgements_been_accepted,
    has_required_version_been_accepted,
};
use gc_core::{TermsAndConditions, TermsAndConditionsError};
use tracing::debug;

use crate::terms::SharedTermsAndConditionsProvider;

/// Facade the command handlers use to read and update T&C state.
///
/// 增强配网流程：基于条款提供者的判定与操作。
#[derive(Clone)]
pub struct EnhancedSetupFlow {
    provider: SharedTermsAndConditionsProvider,
}

impl EnhancedSetupFlow {
    pub fn new(provider: SharedTermsAndConditionsProvider) -> Self {
        Self { provider }
    }

    pub async fn requirements(&self) -> TermsAndConditions {
        self.provider.lock().await.get_requirements()
    }

    pub async fn acceptance(&self) -> Result<TermsAndConditions, TermsAndConditionsError> {
        self.provider.lock().await.get_acceptance()
    }

    pub async fn has_required_acknowledgements_been_accepted(
        &self,
    ) -> Result<bool, TermsAndConditionsError> {
        let provider = self.provider.lock().await;
        let accepted = provider.get_acceptance()?;
        Ok(has_required_acknowledgements_been_accepted(
            &provider.get_requirements(),
            &accepted,
        ))
    }

    pub async fn has_required_version_been_accepted(&self) -> Result<bool, TermsAndConditionsError> {
        let provider = self.provider.lock().await;
        let accepted = provider.get_acceptance()?;
        Ok(has_required_version_been_accepted(
            &provider.get_requirements(),
            &accepted,
        ))
    }

    /// Whether the commissioner still has to acknowledge something.
    pub async fn is_acceptance_required(&self) -> Result<bool, TermsAndConditionsError> {
        let provider = self.provider.lock().await;
        let requirements = provider.get_requirements();
        let accepted = provider.get_acceptance()?;
        Ok(requirements.is_required()
            && !evaluate_acknowledgements(&requirements, &accepted).is_accepted())
    }

    /// Commissioning error code describing the current acceptance.
    pub async fn check_acknowledgements_state(&self) -> Result<CommissioningError, TermsAndConditionsError> {
        let provider = self.provider.lock().await;
        let requirements = provider.get_requirements();
        let accepted = provider.get_acceptance()?;
        let verdict = evaluate_acknowledgements(&requirements, &accepted);
        debug!(%requirements, %accepted, ?verdict, "checked terms and conditions");
        Ok(verdict.into())
    }

    pub async fn set_acceptance(&self, acceptance: TermsAndConditions) -> Result<(), TermsAndConditionsError> {
        self.provider.lock().await.set_acceptance(acceptance)
    }

    pub async fn commit_acceptance(&self) -> Result<(), TermsAndConditionsError> {
        self.provider.lock().await.commit_acceptance()
    }

    pub async fn revert_acceptance(&self) -> Result<(), TermsAndConditionsError> {
        self.provider.lock().await.revert_acceptance()
    }

    /// Factory reset of the acceptance.
    pub async fn clear_acceptance(&self) -> Result<(), TermsAndConditionsError> {
        self.provider.lock().await.clear_acceptance()
    }
}
