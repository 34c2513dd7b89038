//! Terms and conditions (T&C) domain module.
//!
//! Holds the acknowledgement value types, the pure evaluation rules that
//! decide whether the accepted terms satisfy the required ones, the stored
//! acceptance record codec and the provider contract.

pub mod codec;
pub mod evaluation;
mod model;
mod provider;

pub use codec::{AcceptanceRecord, RecordCodecError, ACCEPTANCE_RECORD_VERSION};
pub use evaluation::{
    evaluate_acknowledgements, has_required_acknowledgements_been_accepted,
    has_required_version_been_accepted, TermsAndConditionsVerdict,
};
pub use model::TermsAndConditions;
pub use provider::{TermsAndConditionsError, TermsAndConditionsProvider};
