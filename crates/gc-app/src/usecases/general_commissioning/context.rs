use std::sync::Arc;
use std::time::Duration;

use gc_core::fail_safe::FailSafeState;
use gc_core::{Breadcrumb, FailSafeContext};
use tokio::sync::{Mutex, MutexGuard};

/// Shared commissioning context: fail-safe state, breadcrumb and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `fail_safe`.
/// - `dispatch_lock`: held for a whole command or expiry so that check,
///   side effects and state update happen as one step.
/// - `fail_safe`: short critical sections, also taken by readers.
#[derive(Clone)]
pub struct CommissioningContext {
    fail_safe: Arc<Mutex<FailSafeContext>>,
    dispatch_lock: Arc<Mutex<()>>,
    breadcrumb: Arc<Breadcrumb>,
}

impl CommissioningContext {
    pub fn new(max_cumulative_failsafe: Duration) -> Self {
        Self {
            fail_safe: Arc::new(Mutex::new(FailSafeContext::new(max_cumulative_failsafe))),
            dispatch_lock: Arc::new(Mutex::new(())),
            breadcrumb: Arc::new(Breadcrumb::default()),
        }
    }

    /// Returns the context wrapped in Arc for shared ownership.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Serializes commands and expiries. Released when the guard drops.
    pub async fn acquire_dispatch_lock(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Mutable access to the fail-safe state machine.
    ///
    /// Mutations should only happen while holding `dispatch_lock`.
    pub async fn fail_safe(&self) -> MutexGuard<'_, FailSafeContext> {
        self.fail_safe.lock().await
    }

    /// Lightweight read; does NOT acquire `dispatch_lock`.
    pub async fn fail_safe_state(&self) -> FailSafeState {
        self.fail_safe.lock().await.state()
    }

    pub fn breadcrumb(&self) -> &Arc<Breadcrumb> {
        &self.breadcrumb
    }
}
