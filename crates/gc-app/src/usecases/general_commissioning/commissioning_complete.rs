use gc_core::commissioning::{
    CommandResult, CommissioningCompleteRequest, CommissioningError, CommissioningResponse,
};
use gc_core::SessionDescriptor;
use tracing::{error, info, info_span, warn, Instrument};

use super::{CommissioningServerError, GeneralCommissioningServer};
use crate::events::PlatformEvent;

impl GeneralCommissioningServer {
    /// CommissioningComplete.
    ///
    /// Gate order: armed, CASE session on the armed fabric, T&C, fabric
    /// commit, disarm, device notification. Each step short-circuits with
    /// its own outcome. A failed fabric commit leaves the fail-safe armed; a
    /// failed notification happens after disarm and does not re-arm.
    pub async fn commissioning_complete(
        &self,
        session: &SessionDescriptor,
        _request: CommissioningCompleteRequest,
    ) -> CommandResult {
        let span = info_span!(
            "usecase.general_commissioning.commissioning_complete",
            fabric_index = %session.fabric_index,
            peer_node_id = %session.peer_node_id,
        );
        async move {
            let _dispatch = self.context.acquire_dispatch_lock().await;
            let mut fail_safe = self.context.fail_safe().await;

            if !fail_safe.is_fail_safe_armed() {
                return Ok(CommissioningResponse::with_error(CommissioningError::NoFailSafe));
            }

            if !session.is_case() || !fail_safe.matches_fabric_index(session.fabric_index) {
                warn!(session_type = ?session.session_type, "commissioning complete from wrong session");
                return Ok(CommissioningResponse::with_error(
                    CommissioningError::InvalidAuthentication,
                ));
            }

            if let Some(flow) = &self.deps.setup_flow {
                let outcome = flow
                    .check_acknowledgements_state()
                    .await
                    .map_err(CommissioningServerError::from)?;
                if !outcome.is_ok() {
                    info!(?outcome, "terms and conditions not satisfied");
                    self.context.breadcrumb().reset();
                    return Ok(CommissioningResponse::with_error(outcome));
                }
            }

            if fail_safe.noc_command_has_been_invoked() {
                if let Err(err) = self.deps.fabric_table.commit_pending_fabric_data().await {
                    error!(error = %err, "failed to commit pending fabric data");
                    return Err(CommissioningServerError::FabricTable(err).into());
                }
            }

            let update_terms_and_conditions_invoked =
                fail_safe.update_terms_and_conditions_has_been_invoked();
            let pending = fail_safe.disarm_fail_safe();
            drop(fail_safe);

            if let Some(token) = pending {
                if let Err(err) = self.deps.timer.cancel(token).await {
                    warn!(error = %err, %token, "failed to cancel fail-safe timer");
                }
            }

            if let Err(err) = self
                .deps
                .device_control
                .post_commissioning_complete_event(session.peer_node_id, session.fabric_index)
                .await
            {
                error!(error = %err, "failed to post commissioning complete event");
                return Err(CommissioningServerError::DeviceControl(err).into());
            }

            self.deps
                .event_bus
                .publish(PlatformEvent::CommissioningComplete {
                    peer_node_id: session.peer_node_id,
                    fabric_index: session.fabric_index,
                    update_terms_and_conditions_invoked,
                })
                .await;

            self.context.breadcrumb().reset();
            info!("commissioning complete");
            Ok(CommissioningResponse::ok())
        }
        .instrument(span)
        .await
    }
}
