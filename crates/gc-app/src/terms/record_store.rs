use std::sync::Arc;

use gc_core::ports::KeyValueStorePort;
use gc_core::terms::AcceptanceRecord;
use gc_core::{TermsAndConditions, TermsAndConditionsError};
use tracing::{debug, error};

/// Storage key of the acceptance record.
pub const ACCEPTANCE_RECORD_KEY: &str = "tc-acceptance:v1";

/// Reads and writes the encoded acceptance record.
#[derive(Clone)]
pub struct AcceptanceRecordStore {
    store: Arc<dyn KeyValueStorePort>,
}

impl AcceptanceRecordStore {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// `Ok(None)` when nothing was ever accepted.
    pub fn load(&self) -> Result<Option<TermsAndConditions>, TermsAndConditionsError> {
        let Some(bytes) = self.store.get(ACCEPTANCE_RECORD_KEY)? else {
            return Ok(None);
        };
        let record = AcceptanceRecord::decode(&bytes)?;
        Ok(Some(record.acceptance))
    }

    /// Startup variant of [`load`](Self::load): a record that fails to
    /// decode is logged and read as absent. Storage failures still surface.
    pub fn load_or_discard(&self) -> Result<Option<TermsAndConditions>, TermsAndConditionsError> {
        match self.load() {
            Err(TermsAndConditionsError::Codec(err)) => {
                error!(error = %err, "ignoring undecodable acceptance record");
                Ok(None)
            }
            other => other,
        }
    }

    pub fn save(&self, acceptance: TermsAndConditions) -> Result<(), TermsAndConditionsError> {
        let bytes = AcceptanceRecord::new(acceptance).encode();
        self.store.set(ACCEPTANCE_RECORD_KEY, &bytes)?;
        debug!(
            acknowledgements = acceptance.acknowledgements,
            version = acceptance.version,
            "acceptance stored"
        );
        Ok(())
    }

    pub fn delete(&self) -> Result<(), TermsAndConditionsError> {
        self.store.delete(ACCEPTANCE_RECORD_KEY)?;
        Ok(())
    }
}
