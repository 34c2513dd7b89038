use std::time::Duration;

use async_trait::async_trait;

use crate::fail_safe::FailSafeTimerToken;

/// Schedules fail-safe deadlines.
///
/// When a deadline elapses the implementation delivers its token back to
/// the commissioning server. Delivery of a token that was cancelled is
/// tolerated; the fail-safe context ignores stale tokens.
#[async_trait]
pub trait FailSafeTimerPort: Send + Sync {
    async fn schedule(&self, token: FailSafeTimerToken, after: Duration) -> anyhow::Result<()>;
    async fn cancel(&self, token: FailSafeTimerToken) -> anyhow::Result<()>;
}
