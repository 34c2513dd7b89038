use std::time::Duration;

use gc_core::commissioning::{
    ArmFailSafeRequest, CommandResult, CommandStatus, CommissioningError, CommissioningResponse,
};
use gc_core::{FailSafeError, SessionDescriptor};
use tracing::{error, info, info_span, warn, Instrument};

use super::{CommissioningServerError, GeneralCommissioningServer};

impl GeneralCommissioningServer {
    /// ArmFailSafe.
    ///
    /// Accepted only when not busy and either disarmed or armed by the
    /// accessing fabric. The first arm is refused for CASE sessions while a
    /// commissioning window is open. A zero expiry length expires the
    /// fail-safe immediately.
    pub async fn arm_fail_safe(
        &self,
        session: &SessionDescriptor,
        request: ArmFailSafeRequest,
    ) -> CommandResult {
        let span = info_span!(
            "usecase.general_commissioning.arm_fail_safe",
            fabric_index = %session.fabric_index,
            expiry_length_seconds = request.expiry_length_seconds,
        );
        async move {
            let _dispatch = self.context.acquire_dispatch_lock().await;
            let mut fail_safe = self.context.fail_safe().await;

            let accessing = session.fabric_index;
            if fail_safe.is_fail_safe_busy()
                || (fail_safe.is_fail_safe_armed() && !fail_safe.matches_fabric_index(accessing))
            {
                info!("fail-safe held by another admin");
                return Ok(CommissioningResponse::with_error(
                    CommissioningError::BusyWithOtherAdmin,
                ));
            }

            if !fail_safe.is_fail_safe_armed()
                && self.deps.commissioning_window.is_commissioning_window_open()
                && session.is_case()
            {
                info!("refusing CASE arm while commissioning window is open");
                return Ok(CommissioningResponse::with_error(
                    CommissioningError::BusyWithOtherAdmin,
                ));
            }

            if request.expiry_length_seconds == 0 {
                drop(fail_safe);
                self.force_fail_safe_expiry().await;
                return Ok(CommissioningResponse::ok());
            }

            let previous = fail_safe.current_timer_token();
            let now_ms = self.deps.clock.now_ms();
            let expiry_length = Duration::from_secs(u64::from(request.expiry_length_seconds));
            let arm = match fail_safe.arm_fail_safe(accessing, expiry_length, now_ms) {
                Ok(arm) => arm,
                Err(FailSafeError::Busy | FailSafeError::ArmedByOtherFabric { .. }) => {
                    return Ok(CommissioningResponse::with_error(
                        CommissioningError::BusyWithOtherAdmin,
                    ));
                }
                Err(err) => return Err(CommandStatus::failure(err.to_string())),
            };

            if let Some(previous) = previous {
                if let Err(err) = self.deps.timer.cancel(previous).await {
                    warn!(error = %err, token = %previous, "failed to cancel superseded fail-safe timer");
                }
            }

            if let Err(err) = self.deps.timer.schedule(arm.token, arm.expires_in).await {
                error!(error = %err, token = %arm.token, "failed to schedule fail-safe timer");
                fail_safe.disarm_fail_safe();
                return Err(CommissioningServerError::Timer(err).into());
            }

            self.context.breadcrumb().set(request.breadcrumb);
            Ok(CommissioningResponse::ok())
        }
        .instrument(span)
        .await
    }
}
