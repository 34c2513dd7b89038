use gc_core::commissioning::{AttributeId, CommandStatus};
use gc_core::ports::ConfigurationError;
use gc_core::TermsAndConditionsError;

/// Infrastructure failures while serving the cluster.
///
/// Command handlers turn these into an interaction-level `Failure`;
/// protocol outcomes never use this type.
#[derive(Debug, thiserror::Error)]
pub enum CommissioningServerError {
    #[error("terms and conditions failed")]
    TermsAndConditions(#[from] TermsAndConditionsError),
    #[error("configuration read failed")]
    Configuration(#[from] ConfigurationError),
    #[error("fail-safe timer failed")]
    Timer(#[source] anyhow::Error),
    #[error("fabric table failed")]
    FabricTable(#[source] anyhow::Error),
    #[error("device control failed")]
    DeviceControl(#[source] anyhow::Error),
    #[error("attribute {0:?} is not supported")]
    UnsupportedAttribute(AttributeId),
}

impl From<CommissioningServerError> for CommandStatus {
    fn from(err: CommissioningServerError) -> Self {
        CommandStatus::failure(format!("{:#}", anyhow::Error::from(err)))
    }
}
