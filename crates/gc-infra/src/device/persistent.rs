use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gc_core::commissioning::RegulatoryLocationType;
use gc_core::ports::{
    ConfigurationError, ConfigurationPort, DeviceControlPort, KeyValueStorePort,
};
use gc_core::{FabricIndex, NodeId};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Storage key of the applied regulatory configuration.
pub const REGULATORY_CONFIG_KEY: &str = "regulatory-config:v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredRegulatoryConfig {
    location: RegulatoryLocationType,
    country_code: String,
}

/// A commissioning completion that was announced to the device layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissioningCompletion {
    pub peer_node_id: NodeId,
    pub fabric_index: FabricIndex,
}

/// Device-control service backed by the key-value store.
///
/// Regulatory configuration is persisted as JSON. The location capability is
/// fixed at construction. When no location was ever applied the capability
/// is reported as the current location.
///
/// 设备控制服务：监管配置持久化到键值存储。
pub struct PersistentDeviceControl {
    store: Arc<dyn KeyValueStorePort>,
    location_capability: RegulatoryLocationType,
    completions: Mutex<Vec<CommissioningCompletion>>,
    fail_notifications: AtomicBool,
}

impl PersistentDeviceControl {
    pub fn new(store: Arc<dyn KeyValueStorePort>, location_capability: RegulatoryLocationType) -> Self {
        Self {
            store,
            location_capability,
            completions: Mutex::new(Vec::new()),
            fail_notifications: AtomicBool::new(false),
        }
    }

    /// Make completion notifications fail (e.g. announcement cannot be sent).
    pub fn set_fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    pub async fn completions(&self) -> Vec<CommissioningCompletion> {
        self.completions.lock().await.clone()
    }

    /// Applied country code, if any.
    pub fn country_code(&self) -> Result<Option<String>, ConfigurationError> {
        Ok(self.load()?.map(|stored| stored.country_code))
    }

    fn load(&self) -> Result<Option<StoredRegulatoryConfig>, ConfigurationError> {
        let Some(bytes) = self
            .store
            .get(REGULATORY_CONFIG_KEY)
            .map_err(|err| ConfigurationError::Other(err.to_string()))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ConfigurationError::Other(format!("invalid regulatory config: {err}")))
    }
}

#[async_trait]
impl DeviceControlPort for PersistentDeviceControl {
    async fn set_regulatory_config(
        &self,
        location: RegulatoryLocationType,
        country_code: &str,
    ) -> anyhow::Result<()> {
        let stored = StoredRegulatoryConfig {
            location,
            country_code: country_code.to_string(),
        };
        let bytes = serde_json::to_vec(&stored)?;
        self.store.set(REGULATORY_CONFIG_KEY, &bytes)?;
        info!(?location, country_code, "regulatory config applied");
        Ok(())
    }

    async fn post_commissioning_complete_event(
        &self,
        peer_node_id: NodeId,
        fabric_index: FabricIndex,
    ) -> anyhow::Result<()> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            warn!(peer_node_id = %peer_node_id, fabric_index = %fabric_index, "commissioning complete notification failed");
            anyhow::bail!("failed to post commissioning complete event");
        }
        self.completions.lock().await.push(CommissioningCompletion {
            peer_node_id,
            fabric_index,
        });
        info!(peer_node_id = %peer_node_id, fabric_index = %fabric_index, "commissioning complete");
        Ok(())
    }
}

impl ConfigurationPort for PersistentDeviceControl {
    fn location_capability(&self) -> Result<RegulatoryLocationType, ConfigurationError> {
        Ok(self.location_capability)
    }

    fn regulatory_location(&self) -> Result<RegulatoryLocationType, ConfigurationError> {
        Ok(self
            .load()?
            .map(|stored| stored.location)
            .unwrap_or(self.location_capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    fn service(store: &InMemoryKeyValueStore) -> PersistentDeviceControl {
        PersistentDeviceControl::new(Arc::new(store.clone()), RegulatoryLocationType::IndoorOutdoor)
    }

    #[tokio::test]
    async fn regulatory_location_defaults_to_capability() {
        let store = InMemoryKeyValueStore::new();

        assert_eq!(
            service(&store).regulatory_location().unwrap(),
            RegulatoryLocationType::IndoorOutdoor
        );
    }

    #[tokio::test]
    async fn applied_regulatory_config_is_persisted() -> anyhow::Result<()> {
        let store = InMemoryKeyValueStore::new();
        service(&store)
            .set_regulatory_config(RegulatoryLocationType::Outdoor, "DE")
            .await?;

        let reopened = service(&store);
        assert_eq!(reopened.regulatory_location()?, RegulatoryLocationType::Outdoor);
        assert_eq!(reopened.country_code()?, Some("DE".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let store = InMemoryKeyValueStore::new();
        store.set_fail_writes(true);

        let result = service(&store)
            .set_regulatory_config(RegulatoryLocationType::Indoor, "US")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn completions_are_recorded_unless_failing() -> anyhow::Result<()> {
        let store = InMemoryKeyValueStore::new();
        let service = service(&store);
        service
            .post_commissioning_complete_event(NodeId::new(0x42), FabricIndex::new(1))
            .await?;
        service.set_fail_notifications(true);

        assert!(service
            .post_commissioning_complete_event(NodeId::new(0x43), FabricIndex::new(1))
            .await
            .is_err());
        assert_eq!(
            service.completions().await,
            vec![CommissioningCompletion {
                peer_node_id: NodeId::new(0x42),
                fabric_index: FabricIndex::new(1),
            }]
        );
        Ok(())
    }
}
