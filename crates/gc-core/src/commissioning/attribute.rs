use serde::{Deserialize, Serialize};

/// Readable attributes of the general commissioning cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    Breadcrumb,
    BasicCommissioningInfo,
    RegulatoryConfig,
    LocationCapability,
    SupportsConcurrentConnection,
    TcAcceptedVersion,
    TcMinRequiredVersion,
    TcAcknowledgements,
    TcAcknowledgementsRequired,
}

impl AttributeId {
    pub const ALL: [AttributeId; 9] = [
        AttributeId::Breadcrumb,
        AttributeId::BasicCommissioningInfo,
        AttributeId::RegulatoryConfig,
        AttributeId::LocationCapability,
        AttributeId::SupportsConcurrentConnection,
        AttributeId::TcAcceptedVersion,
        AttributeId::TcMinRequiredVersion,
        AttributeId::TcAcknowledgements,
        AttributeId::TcAcknowledgementsRequired,
    ];

    /// Attributes that only exist when terms and conditions are enabled.
    pub fn is_terms_and_conditions(self) -> bool {
        matches!(
            self,
            AttributeId::TcAcceptedVersion
                | AttributeId::TcMinRequiredVersion
                | AttributeId::TcAcknowledgements
                | AttributeId::TcAcknowledgementsRequired
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCommissioningInfo {
    pub fail_safe_expiry_length_seconds: u16,
    pub max_cumulative_failsafe_seconds: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Breadcrumb(u64),
    BasicCommissioningInfo(BasicCommissioningInfo),
    RegulatoryConfig(u8),
    LocationCapability(u8),
    SupportsConcurrentConnection(bool),
    TcAcceptedVersion(u16),
    TcMinRequiredVersion(u16),
    TcAcknowledgements(u16),
    TcAcknowledgementsRequired(bool),
}

impl AttributeValue {
    pub fn id(&self) -> AttributeId {
        match self {
            AttributeValue::Breadcrumb(_) => AttributeId::Breadcrumb,
            AttributeValue::BasicCommissioningInfo(_) => AttributeId::BasicCommissioningInfo,
            AttributeValue::RegulatoryConfig(_) => AttributeId::RegulatoryConfig,
            AttributeValue::LocationCapability(_) => AttributeId::LocationCapability,
            AttributeValue::SupportsConcurrentConnection(_) => AttributeId::SupportsConcurrentConnection,
            AttributeValue::TcAcceptedVersion(_) => AttributeId::TcAcceptedVersion,
            AttributeValue::TcMinRequiredVersion(_) => AttributeId::TcMinRequiredVersion,
            AttributeValue::TcAcknowledgements(_) => AttributeId::TcAcknowledgements,
            AttributeValue::TcAcknowledgementsRequired(_) => AttributeId::TcAcknowledgementsRequired,
        }
    }
}
