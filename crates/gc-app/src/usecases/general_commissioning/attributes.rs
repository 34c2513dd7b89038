//! Attribute reads, dispatched through a table of typed accessors.

use futures::future::BoxFuture;
use gc_core::commissioning::{AttributeId, AttributeValue, RegulatoryLocationType};
use gc_core::ports::ConfigurationError;
use tracing::debug;

use super::{CommissioningServerError, GeneralCommissioningServer};
use crate::setup_flow::EnhancedSetupFlow;

type AttributeRead<'a> = BoxFuture<'a, Result<AttributeValue, CommissioningServerError>>;
type AttributeAccessor = for<'a> fn(&'a GeneralCommissioningServer) -> AttributeRead<'a>;

static ATTRIBUTE_TABLE: [(AttributeId, AttributeAccessor); 9] = [
    (AttributeId::Breadcrumb, read_breadcrumb),
    (AttributeId::BasicCommissioningInfo, read_basic_commissioning_info),
    (AttributeId::RegulatoryConfig, read_regulatory_config),
    (AttributeId::LocationCapability, read_location_capability),
    (AttributeId::SupportsConcurrentConnection, read_supports_concurrent_connection),
    (AttributeId::TcAcceptedVersion, read_tc_accepted_version),
    (AttributeId::TcMinRequiredVersion, read_tc_min_required_version),
    (AttributeId::TcAcknowledgements, read_tc_acknowledgements),
    (AttributeId::TcAcknowledgementsRequired, read_tc_acknowledgements_required),
];

impl GeneralCommissioningServer {
    pub async fn read_attribute(&self, id: AttributeId) -> Result<AttributeValue, CommissioningServerError> {
        let accessor = ATTRIBUTE_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, accessor)| *accessor)
            .ok_or(CommissioningServerError::UnsupportedAttribute(id))?;
        let value = accessor(self).await?;
        debug!(?value, "attribute read");
        Ok(value)
    }

    /// Every attribute this server supports, in table order.
    pub async fn read_attributes(&self) -> Result<Vec<AttributeValue>, CommissioningServerError> {
        let mut values = Vec::with_capacity(ATTRIBUTE_TABLE.len());
        for (id, _) in ATTRIBUTE_TABLE.iter() {
            match self.read_attribute(*id).await {
                Ok(value) => values.push(value),
                Err(CommissioningServerError::UnsupportedAttribute(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(values)
    }

    fn setup_flow_for(&self, id: AttributeId) -> Result<&EnhancedSetupFlow, CommissioningServerError> {
        self.deps
            .setup_flow
            .as_ref()
            .ok_or(CommissioningServerError::UnsupportedAttribute(id))
    }
}

/// Platforms without the value report 0.
fn raw_or_zero(
    location: Result<RegulatoryLocationType, ConfigurationError>,
) -> Result<u8, CommissioningServerError> {
    match location {
        Ok(location) => Ok(location.raw()),
        Err(ConfigurationError::Unsupported) => Ok(0),
        Err(err) => Err(err.into()),
    }
}

fn read_breadcrumb(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    let value = server.context.breadcrumb().get();
    Box::pin(async move { Ok(AttributeValue::Breadcrumb(value)) })
}

fn read_basic_commissioning_info(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    let info = server.basic_commissioning_info;
    Box::pin(async move { Ok(AttributeValue::BasicCommissioningInfo(info)) })
}

fn read_regulatory_config(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        raw_or_zero(server.deps.configuration.regulatory_location()).map(AttributeValue::RegulatoryConfig)
    })
}

fn read_location_capability(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        raw_or_zero(server.deps.configuration.location_capability())
            .map(AttributeValue::LocationCapability)
    })
}

fn read_supports_concurrent_connection(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    let supported = server.supports_concurrent_connection;
    Box::pin(async move { Ok(AttributeValue::SupportsConcurrentConnection(supported)) })
}

fn read_tc_accepted_version(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        let flow = server.setup_flow_for(AttributeId::TcAcceptedVersion)?;
        Ok(AttributeValue::TcAcceptedVersion(flow.acceptance().await?.version))
    })
}

fn read_tc_min_required_version(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        let flow = server.setup_flow_for(AttributeId::TcMinRequiredVersion)?;
        Ok(AttributeValue::TcMinRequiredVersion(flow.requirements().await.version))
    })
}

fn read_tc_acknowledgements(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        let flow = server.setup_flow_for(AttributeId::TcAcknowledgements)?;
        Ok(AttributeValue::TcAcknowledgements(flow.acceptance().await?.acknowledgements))
    })
}

fn read_tc_acknowledgements_required(server: &GeneralCommissioningServer) -> AttributeRead<'_> {
    Box::pin(async move {
        let flow = server.setup_flow_for(AttributeId::TcAcknowledgementsRequired)?;
        Ok(AttributeValue::TcAcknowledgementsRequired(flow.is_acceptance_required().await?))
    })
}
