use std::sync::Arc;

use gc_core::FailSafeTimerToken;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::GeneralCommissioningServer;

/// Forward expired timer tokens to the server until the channel closes.
pub fn spawn_fail_safe_timer_listener(
    server: Arc<GeneralCommissioningServer>,
    mut expired_rx: mpsc::UnboundedReceiver<FailSafeTimerToken>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(token) = expired_rx.recv().await {
            server.on_fail_safe_timer_expired(token).await;
        }
        debug!("fail-safe timer listener stopped");
    })
}
