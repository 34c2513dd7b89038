//! Terms-and-conditions providers.
//!
//! Both variants keep the requirements in memory and the acceptance in the
//! key-value store under [`ACCEPTANCE_RECORD_KEY`].

mod durable;
mod record_store;
mod transactional;

use std::sync::Arc;

use gc_core::{TermsAndConditions, TermsAndConditionsError, TermsAndConditionsProvider};
use tokio::sync::Mutex;

use crate::settings::TermsProviderKind;

pub use durable::DurableTermsAndConditionsProvider;
pub use record_store::{AcceptanceRecordStore, ACCEPTANCE_RECORD_KEY};
pub use transactional::TransactionalTermsAndConditionsProvider;

/// Process-wide provider handle.
pub type SharedTermsAndConditionsProvider = Arc<Mutex<dyn TermsAndConditionsProvider>>;

/// Initialize the provider variant selected by configuration.
pub fn open_provider(
    kind: TermsProviderKind,
    records: AcceptanceRecordStore,
    requirements: TermsAndConditions,
) -> Result<SharedTermsAndConditionsProvider, TermsAndConditionsError> {
    let provider: SharedTermsAndConditionsProvider = match kind {
        TermsProviderKind::Transactional => Arc::new(Mutex::new(
            TransactionalTermsAndConditionsProvider::init(records, requirements)?,
        )),
        TermsProviderKind::Durable => Arc::new(Mutex::new(DurableTermsAndConditionsProvider::init(
            records,
            requirements,
        )?)),
    };
    Ok(provider)
}
