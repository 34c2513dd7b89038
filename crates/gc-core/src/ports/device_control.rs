use async_trait::async_trait;

use crate::commissioning::RegulatoryLocationType;
use crate::ids::{FabricIndex, NodeId};

/// 设备控制端口：接收监管配置与配网完成通知。
#[async_trait]
pub trait DeviceControlPort: Send + Sync {
    /// Apply a regulatory location and country code.
    async fn set_regulatory_config(
        &self,
        location: RegulatoryLocationType,
        country_code: &str,
    ) -> anyhow::Result<()>;

    /// Signal that commissioning finished for `peer_node_id` on `fabric_index`.
    async fn post_commissioning_complete_event(
        &self,
        peer_node_id: NodeId,
        fabric_index: FabricIndex,
    ) -> anyhow::Result<()>;
}
