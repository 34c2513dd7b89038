use gc_core::commissioning::{
    CommandResult, CommandStatus, CommissioningResponse, SetTcAcknowledgementsRequest,
};
use gc_core::{SessionDescriptor, TermsAndConditions};
use tracing::{info, info_span, Instrument};

use super::{CommissioningServerError, GeneralCommissioningServer};

impl GeneralCommissioningServer {
    /// SetTCAcknowledgements.
    ///
    /// Records the acceptance, answers with the resulting T&C outcome and
    /// marks the fail-safe window so that expiry reverts and completion
    /// commits the acceptance.
    pub async fn set_tc_acknowledgements(
        &self,
        session: &SessionDescriptor,
        request: SetTcAcknowledgementsRequest,
    ) -> CommandResult {
        let span = info_span!(
            "usecase.general_commissioning.set_tc_acknowledgements",
            fabric_index = %session.fabric_index,
            tc_version = request.tc_version,
            tc_user_response = request.tc_user_response,
        );
        async move {
            let Some(flow) = &self.deps.setup_flow else {
                return Err(CommandStatus::unsupported_command(
                    "terms and conditions are not enabled",
                ));
            };

            let _dispatch = self.context.acquire_dispatch_lock().await;

            let acceptance = TermsAndConditions::new(request.tc_user_response, request.tc_version);
            flow.set_acceptance(acceptance)
                .await
                .map_err(CommissioningServerError::from)?;
            let outcome = flow
                .check_acknowledgements_state()
                .await
                .map_err(CommissioningServerError::from)?;

            self.context
                .fail_safe()
                .await
                .set_update_terms_and_conditions_has_been_invoked();

            info!(?outcome, "terms and conditions acknowledgements recorded");
            Ok(CommissioningResponse::with_error(outcome))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use gc_core::commissioning::{
        ArmFailSafeRequest, CommissioningError, InteractionStatus, SetTcAcknowledgementsRequest,
    };
    use gc_core::{FabricIndex, SessionDescriptor, TermsAndConditions};

    use super::super::test_support::{harness, HarnessOptions};

    fn ack(tc_user_response: u16, tc_version: u16) -> SetTcAcknowledgementsRequest {
        SetTcAcknowledgementsRequest {
            tc_version,
            tc_user_response,
        }
    }

    fn session() -> SessionDescriptor {
        SessionDescriptor::pase(FabricIndex::UNDEFINED)
    }

    #[tokio::test]
    async fn unsupported_when_terms_disabled() {
        let h = harness(HarnessOptions::default()).await;

        let status = h.server.set_tc_acknowledgements(&session(), ack(1, 1)).await.unwrap_err();

        assert_eq!(status.status, InteractionStatus::UnsupportedCommand);
    }

    #[tokio::test]
    async fn answers_with_gate_outcome_and_marks_fail_safe() {
        let h = harness(HarnessOptions {
            terms: Some(TermsAndConditions::new(0b11, 2)),
            ..HarnessOptions::default()
        })
        .await;
        h.server
            .arm_fail_safe(
                &session(),
                ArmFailSafeRequest {
                    expiry_length_seconds: 60,
                    breadcrumb: 1,
                },
            )
            .await
            .unwrap();

        let response = h.server.set_tc_acknowledgements(&session(), ack(0b11, 1)).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::TcMinVersionNotMet);

        let response = h.server.set_tc_acknowledgements(&session(), ack(0b01, 2)).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::RequiredTcNotAccepted);

        let response = h.server.set_tc_acknowledgements(&session(), ack(0, 2)).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::TcAcknowledgementsNotReceived);

        let response = h.server.set_tc_acknowledgements(&session(), ack(0b11, 2)).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::Ok);

        assert!(h
            .server
            .context()
            .fail_safe()
            .await
            .update_terms_and_conditions_has_been_invoked());
    }
}
