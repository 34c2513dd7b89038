//! In-process platform event bus.
//!
//! Observers register explicitly and are called in registration order, one
//! after the other, on the publishing task.
//!
//! 平台事件总线：显式注册观察者，按注册顺序依次调用。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gc_core::{FabricIndex, NodeId};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// The fail-safe expired (naturally or forced); flags are those of the
    /// expired window.
    FailSafeTimerExpired {
        fabric_index: FabricIndex,
        add_noc_command_invoked: bool,
        update_noc_command_invoked: bool,
        update_terms_and_conditions_invoked: bool,
    },
    CommissioningComplete {
        peer_node_id: NodeId,
        fabric_index: FabricIndex,
        update_terms_and_conditions_invoked: bool,
    },
}

/// Callback for platform events.
#[async_trait]
pub trait PlatformEventHandler: Send + Sync {
    async fn on_platform_event(&self, event: &PlatformEvent) -> anyhow::Result<()>;
}

/// Registration handle returned by [`PlatformEventBus::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Default)]
pub struct PlatformEventBus {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(HandlerId, Arc<dyn PlatformEventHandler>)>>,
}

impl PlatformEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, handler: Arc<dyn PlatformEventHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handlers.lock().await.push((id, handler));
        id
    }

    /// Returns whether a handler was removed.
    pub async fn unregister(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().await;
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    /// Deliver `event` to every handler. A failing handler is logged and
    /// does not stop delivery to the others.
    pub async fn publish(&self, event: PlatformEvent) {
        // Snapshot so handlers may (un)register without deadlocking.
        let handlers: Vec<_> = self
            .handlers
            .lock()
            .await
            .iter()
            .map(|(id, handler)| (*id, Arc::clone(handler)))
            .collect();

        debug!(?event, handlers = handlers.len(), "publishing platform event");
        for (id, handler) in handlers {
            if let Err(err) = handler.on_platform_event(&event).await {
                warn!(handler = id.0, error = %err, ?event, "platform event handler failed");
            }
        }
    }
}
