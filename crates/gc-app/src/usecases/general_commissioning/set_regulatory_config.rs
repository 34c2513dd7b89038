use gc_core::commissioning::{
    CommandResult, CommandStatus, CommissioningError, CommissioningResponse,
    RegulatoryLocationType, SetRegulatoryConfigRequest, COUNTRY_CODE_LENGTH,
};
use gc_core::SessionDescriptor;
use tracing::{error, info_span, Instrument};

use super::{CommissioningServerError, GeneralCommissioningServer};

impl GeneralCommissioningServer {
    /// SetRegulatoryConfig.
    ///
    /// The requested location must be a known value and, unless the device
    /// supports both, equal to its location capability.
    pub async fn set_regulatory_config(
        &self,
        session: &SessionDescriptor,
        request: SetRegulatoryConfigRequest,
    ) -> CommandResult {
        let span = info_span!(
            "usecase.general_commissioning.set_regulatory_config",
            fabric_index = %session.fabric_index,
            new_regulatory_config = request.new_regulatory_config,
            country_code = %request.country_code,
        );
        async move {
            let _dispatch = self.context.acquire_dispatch_lock().await;

            if request.country_code.len() != COUNTRY_CODE_LENGTH {
                return Err(CommandStatus::constraint_error(format!(
                    "country code must be {COUNTRY_CODE_LENGTH} characters"
                )));
            }

            let value_outside_range = || {
                CommissioningResponse::with_error(CommissioningError::ValueOutsideRange)
                    .with_debug_text(request.country_code.clone())
            };

            let Some(location) = RegulatoryLocationType::from_raw(request.new_regulatory_config) else {
                return Ok(value_outside_range());
            };

            let capability = self
                .deps
                .configuration
                .location_capability()
                .map_err(CommissioningServerError::from)?;
            if capability != RegulatoryLocationType::IndoorOutdoor && location != capability {
                return Ok(value_outside_range());
            }

            if let Err(err) = self
                .deps
                .device_control
                .set_regulatory_config(location, &request.country_code)
                .await
            {
                error!(error = %err, "failed to apply regulatory config");
                return Err(CommissioningServerError::DeviceControl(err).into());
            }

            self.context.breadcrumb().set(request.breadcrumb);
            Ok(CommissioningResponse::ok())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use gc_core::commissioning::{
        CommissioningError, InteractionStatus, RegulatoryLocationType, SetRegulatoryConfigRequest,
    };
    use gc_core::ports::ConfigurationPort;
    use gc_core::{FabricIndex, SessionDescriptor};

    use super::super::test_support::{harness, HarnessOptions};

    fn request(new_regulatory_config: u8, country_code: &str) -> SetRegulatoryConfigRequest {
        SetRegulatoryConfigRequest {
            new_regulatory_config,
            country_code: country_code.to_string(),
            breadcrumb: 11,
        }
    }

    fn session() -> SessionDescriptor {
        SessionDescriptor::pase(FabricIndex::UNDEFINED)
    }

    #[tokio::test]
    async fn applies_location_and_sets_breadcrumb() {
        let h = harness(HarnessOptions::default()).await;

        let response = h.server.set_regulatory_config(&session(), request(1, "DE")).await.unwrap();

        assert_eq!(response.error_code, CommissioningError::Ok);
        assert_eq!(h.server.breadcrumb(), 11);
        assert_eq!(h.device.regulatory_location().unwrap(), RegulatoryLocationType::Outdoor);
        assert_eq!(h.device.country_code().unwrap(), Some("DE".to_string()));
    }

    #[tokio::test]
    async fn bad_country_code_length_is_constraint_error() {
        let h = harness(HarnessOptions::default()).await;

        let status = h.server.set_regulatory_config(&session(), request(0, "USA")).await.unwrap_err();

        assert_eq!(status.status, InteractionStatus::ConstraintError);
        assert_eq!(h.server.breadcrumb(), 0);
    }

    #[tokio::test]
    async fn country_code_length_counts_bytes() {
        let h = harness(HarnessOptions::default()).await;

        let status = h.server.set_regulatory_config(&session(), request(0, "é1")).await.unwrap_err();

        assert_eq!(status.status, InteractionStatus::ConstraintError);
        assert_eq!(h.device.country_code().unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_location_is_value_outside_range() {
        let h = harness(HarnessOptions::default()).await;

        let response = h.server.set_regulatory_config(&session(), request(3, "US")).await.unwrap();

        assert_eq!(response.error_code, CommissioningError::ValueOutsideRange);
        assert_eq!(response.debug_text.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn location_must_match_restricted_capability() {
        let h = harness(HarnessOptions {
            location_capability: RegulatoryLocationType::Indoor,
            ..HarnessOptions::default()
        })
        .await;

        let response = h.server.set_regulatory_config(&session(), request(1, "US")).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::ValueOutsideRange);

        let response = h.server.set_regulatory_config(&session(), request(0, "US")).await.unwrap();
        assert_eq!(response.error_code, CommissioningError::Ok);
    }

    #[tokio::test]
    async fn storage_failure_is_failure_status() {
        let h = harness(HarnessOptions::default()).await;
        h.store.set_fail_writes(true);

        let status = h.server.set_regulatory_config(&session(), request(0, "US")).await.unwrap_err();

        assert_eq!(status.status, InteractionStatus::Failure);
        assert_eq!(h.server.breadcrumb(), 0);
    }
}
