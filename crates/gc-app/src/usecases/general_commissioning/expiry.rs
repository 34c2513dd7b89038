use gc_core::{FailSafeExpiry, FailSafeTimerToken};
use tracing::{error, info_span, warn, Instrument};

use super::GeneralCommissioningServer;
use crate::events::PlatformEvent;

impl GeneralCommissioningServer {
    /// Entry point for fail-safe timer deliveries. Stale tokens are ignored.
    pub async fn on_fail_safe_timer_expired(&self, token: FailSafeTimerToken) {
        let span = info_span!("usecase.general_commissioning.fail_safe_expired", %token);
        async move {
            let _dispatch = self.context.acquire_dispatch_lock().await;
            let expiry = self.context.fail_safe().await.fail_safe_timer_expired(token);
            if let Some(expiry) = expiry {
                self.clean_up_expired_fail_safe(expiry).await;
            }
        }
        .instrument(span)
        .await
    }

    /// Expire now through the natural expiry path. Caller holds the dispatch lock.
    pub(super) async fn force_fail_safe_expiry(&self) {
        let expiry = self.context.fail_safe().await.force_fail_safe_timer_expiry();
        let Some(expiry) = expiry else {
            return;
        };
        if let Err(err) = self.deps.timer.cancel(expiry.token).await {
            warn!(error = %err, token = %expiry.token, "failed to cancel expired fail-safe timer");
        }
        self.clean_up_expired_fail_safe(expiry).await;
    }

    /// Roll back the expired window while the context reports `Busy`.
    async fn clean_up_expired_fail_safe(&self, expiry: FailSafeExpiry) {
        if expiry.has_pending_fabric_data() {
            if let Err(err) = self.deps.fabric_table.revert_pending_fabric_data().await {
                error!(
                    error = %err,
                    fabric_index = %expiry.fabric_index,
                    "failed to revert pending fabric data"
                );
            }
        }

        self.deps
            .event_bus
            .publish(PlatformEvent::FailSafeTimerExpired {
                fabric_index: expiry.fabric_index,
                add_noc_command_invoked: expiry.add_noc_command_invoked,
                update_noc_command_invoked: expiry.update_noc_command_invoked,
                update_terms_and_conditions_invoked: expiry.update_terms_and_conditions_invoked,
            })
            .await;

        self.context.fail_safe().await.complete_expiry_cleanup();
    }
}
