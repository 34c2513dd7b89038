//! General commissioning cluster model: command payloads, responses,
//! attributes and the breadcrumb.

mod attribute;
mod breadcrumb;
mod command;
mod error;
mod regulatory;

pub use attribute::{AttributeId, AttributeValue, BasicCommissioningInfo};
pub use breadcrumb::Breadcrumb;
pub use command::{
    ArmFailSafeRequest, CommandResult, CommandStatus, CommissioningCompleteRequest,
    CommissioningResponse, InteractionStatus, SetRegulatoryConfigRequest,
    SetTcAcknowledgementsRequest,
};
pub use error::CommissioningError;
pub use regulatory::{RegulatoryLocationType, COUNTRY_CODE_LENGTH};
