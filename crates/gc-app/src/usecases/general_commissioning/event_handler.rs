use std::sync::Arc;

use async_trait::async_trait;
use gc_core::Breadcrumb;
use tracing::info;

use crate::events::{PlatformEvent, PlatformEventHandler};
use crate::setup_flow::EnhancedSetupFlow;

/// Reacts to fail-safe expiry and commissioning completion.
///
/// - expiry: breadcrumb back to 0, T&C acceptance reverted if it changed
/// - completion: T&C acceptance committed if it changed
pub struct GeneralCommissioningEventHandler {
    breadcrumb: Arc<Breadcrumb>,
    setup_flow: Option<EnhancedSetupFlow>,
}

impl GeneralCommissioningEventHandler {
    pub fn new(breadcrumb: Arc<Breadcrumb>, setup_flow: Option<EnhancedSetupFlow>) -> Self {
        Self {
            breadcrumb,
            setup_flow,
        }
    }
}

#[async_trait]
impl PlatformEventHandler for GeneralCommissioningEventHandler {
    async fn on_platform_event(&self, event: &PlatformEvent) -> anyhow::Result<()> {
        match *event {
            PlatformEvent::FailSafeTimerExpired {
                update_terms_and_conditions_invoked,
                ..
            } => {
                self.breadcrumb.reset();
                if let (true, Some(flow)) = (update_terms_and_conditions_invoked, &self.setup_flow) {
                    flow.revert_acceptance().await?;
                    info!("terms and conditions acceptance reverted");
                }
            }
            PlatformEvent::CommissioningComplete {
                update_terms_and_conditions_invoked,
                ..
            } => {
                if let (true, Some(flow)) = (update_terms_and_conditions_invoked, &self.setup_flow) {
                    flow.commit_acceptance().await?;
                }
            }
        }
        Ok(())
    }
}
