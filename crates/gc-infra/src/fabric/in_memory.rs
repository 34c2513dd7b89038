use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gc_core::ports::FabricTablePort;
use gc_core::FabricIndex;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct FabricTableState {
    committed: BTreeSet<FabricIndex>,
    pending: Option<FabricIndex>,
    commits: usize,
    reverts: usize,
}

/// Fabric table kept in memory.
///
/// Operational credential commands are outside this crate; they are
/// simulated with [`InMemoryFabricTable::stage_pending_fabric`].
#[derive(Clone, Default)]
pub struct InMemoryFabricTable {
    state: Arc<Mutex<FabricTableState>>,
    fail_commit: Arc<AtomicBool>,
}

impl InMemoryFabricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fabric_index` as added but not yet committed.
    pub async fn stage_pending_fabric(&self, fabric_index: FabricIndex) {
        self.state.lock().await.pending = Some(fabric_index);
    }

    /// Make the next commits fail. A failed commit reverts pending data.
    pub fn set_fail_commit(&self, fail: bool) {
        self.fail_commit.store(fail, Ordering::SeqCst);
    }

    pub async fn committed_fabrics(&self) -> Vec<FabricIndex> {
        self.state.lock().await.committed.iter().copied().collect()
    }

    pub async fn pending_fabric(&self) -> Option<FabricIndex> {
        self.state.lock().await.pending
    }

    pub async fn commit_count(&self) -> usize {
        self.state.lock().await.commits
    }

    pub async fn revert_count(&self) -> usize {
        self.state.lock().await.reverts
    }
}

#[async_trait]
impl FabricTablePort for InMemoryFabricTable {
    async fn commit_pending_fabric_data(&self) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        if self.fail_commit.load(Ordering::SeqCst) {
            let dropped = state.pending.take();
            warn!(?dropped, "fabric commit failed, pending data reverted");
            anyhow::bail!("fabric table commit failed");
        }

        state.commits += 1;
        if let Some(fabric_index) = state.pending.take() {
            state.committed.insert(fabric_index);
            info!(fabric_index = %fabric_index, "fabric committed");
        }
        Ok(())
    }

    async fn revert_pending_fabric_data(&self) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.reverts += 1;
        if let Some(fabric_index) = state.pending.take() {
            info!(fabric_index = %fabric_index, "pending fabric reverted");
        }
        Ok(())
    }
}
