use async_trait::async_trait;

/// Fabric table collaborator.
///
/// Commissioning commands stage operational credentials as pending data;
/// the general commissioning flow only decides whether they become durable.
#[async_trait]
pub trait FabricTablePort: Send + Sync {
    /// Make pending fabric data durable. On failure the table reverts the
    /// pending data itself.
    async fn commit_pending_fabric_data(&self) -> anyhow::Result<()>;

    /// Drop pending fabric data (fail-safe expiry).
    async fn revert_pending_fabric_data(&self) -> anyhow::Result<()>;
}
