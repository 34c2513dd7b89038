use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gc_core::ports::FailSafeTimerPort;
use gc_core::FailSafeTimerToken;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Tokio-backed fail-safe timer.
///
/// Each scheduled token gets its own sleeping task. When the sleep finishes
/// the token is sent on the expiry channel; the receiving side forwards it
/// to the commissioning server.
pub struct TokioFailSafeTimer {
    timers: Arc<Mutex<HashMap<FailSafeTimerToken, tokio::task::AbortHandle>>>,
    expired_tx: mpsc::UnboundedSender<FailSafeTimerToken>,
}

impl TokioFailSafeTimer {
    pub fn new(expired_tx: mpsc::UnboundedSender<FailSafeTimerToken>) -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            expired_tx,
        }
    }

    /// Create a timer together with the receiver of expired tokens.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FailSafeTimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub async fn pending_count(&self) -> usize {
        self.timers.lock().await.len()
    }
}

#[async_trait::async_trait]
impl FailSafeTimerPort for TokioFailSafeTimer {
    async fn schedule(&self, token: FailSafeTimerToken, after: Duration) -> anyhow::Result<()> {
        let timers = Arc::clone(&self.timers);
        let expired_tx = self.expired_tx.clone();

        let mut timers_guard = self.timers.lock().await;
        if let Some(existing) = timers_guard.remove(&token) {
            existing.abort();
        }

        let handle = tokio::spawn(async move {
            sleep(after).await;
            timers.lock().await.remove(&token);
            if expired_tx.send(token).is_err() {
                warn!(%token, "fail-safe expiry receiver dropped");
            }
        });

        timers_guard.insert(token, handle.abort_handle());
        debug!(%token, after_ms = after.as_millis() as u64, "fail-safe timer scheduled");
        Ok(())
    }

    async fn cancel(&self, token: FailSafeTimerToken) -> anyhow::Result<()> {
        let mut timers_guard = self.timers.lock().await;
        if let Some(handle) = timers_guard.remove(&token) {
            handle.abort();
            debug!(%token, "fail-safe timer cancelled");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::{FabricIndex, FailSafeContext};
    use tokio::time::advance;

    fn tokens(count: usize) -> Vec<FailSafeTimerToken> {
        let mut context = FailSafeContext::new(Duration::from_secs(900));
        (0..count)
            .map(|_| {
                context
                    .arm_fail_safe(FabricIndex::new(1), Duration::from_secs(60), 0)
                    .expect("arm")
                    .token
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_delivers_token_after_delay() -> anyhow::Result<()> {
        let (timer, mut rx) = TokioFailSafeTimer::channel();
        let token = tokens(1)[0];

        timer.schedule(token, Duration::from_secs(5)).await?;
        assert_eq!(timer.pending_count().await, 1);
        advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(rx.recv().await, Some(token));
        assert_eq!(timer.pending_count().await, 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_delivery() -> anyhow::Result<()> {
        let (timer, mut rx) = TokioFailSafeTimer::channel();
        let token = tokens(1)[0];

        timer.schedule(token, Duration::from_secs(5)).await?;
        timer.cancel(token).await?;
        advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
        assert_eq!(timer.pending_count().await, 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn independent_tokens_fire_in_deadline_order() -> anyhow::Result<()> {
        let (timer, mut rx) = TokioFailSafeTimer::channel();
        let all = tokens(2);

        timer.schedule(all[0], Duration::from_secs(10)).await?;
        timer.schedule(all[1], Duration::from_secs(3)).await?;
        advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.recv().await, Some(all[1]));

        advance(Duration::from_secs(7)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.recv().await, Some(all[0]));
        Ok(())
    }
}
