use thiserror::Error;

use crate::commissioning::RegulatoryLocationType;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The platform does not expose this value.
    #[error("configuration value not supported")]
    Unsupported,

    #[error("configuration read failed: {0}")]
    Other(String),
}

/// Read access to device configuration values.
pub trait ConfigurationPort: Send + Sync {
    fn location_capability(&self) -> Result<RegulatoryLocationType, ConfigurationError>;

    /// Currently applied regulatory location.
    fn regulatory_location(&self) -> Result<RegulatoryLocationType, ConfigurationError>;
}
