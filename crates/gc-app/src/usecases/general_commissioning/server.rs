use std::future::Future;
use std::sync::Arc;

use gc_core::commissioning::BasicCommissioningInfo;
use gc_core::fail_safe::FailSafeState;
use gc_core::FailSafeContext;
use tracing::info;

use super::{CommissioningContext, GeneralCommissioningEventHandler};
use crate::deps::CommissioningDeps;
use crate::events::HandlerId;
use crate::settings::CommissioningSettings;

/// Server for the general commissioning cluster on the root endpoint.
///
/// One instance per process. Owns the fail-safe context and breadcrumb via
/// its [`CommissioningContext`]; collaborators come from [`CommissioningDeps`].
pub struct GeneralCommissioningServer {
    pub(super) context: Arc<CommissioningContext>,
    pub(super) deps: CommissioningDeps,
    pub(super) basic_commissioning_info: BasicCommissioningInfo,
    pub(super) supports_concurrent_connection: bool,
}

impl GeneralCommissioningServer {
    pub fn new(deps: CommissioningDeps, settings: &CommissioningSettings) -> Self {
        Self {
            context: CommissioningContext::new(settings.max_cumulative_failsafe()).arc(),
            deps,
            basic_commissioning_info: settings.basic_commissioning_info(),
            supports_concurrent_connection: settings.supports_concurrent_connection,
        }
    }

    /// Reset the breadcrumb and subscribe the cluster's platform event handler.
    pub async fn init(&self) -> HandlerId {
        self.context.breadcrumb().reset();
        let handler = GeneralCommissioningEventHandler::new(
            Arc::clone(self.context.breadcrumb()),
            self.deps.setup_flow.clone(),
        );
        let id = self.deps.event_bus.register(Arc::new(handler)).await;
        info!(
            terms_and_conditions = self.deps.setup_flow.is_some(),
            "general commissioning server initialized"
        );
        id
    }

    pub fn context(&self) -> &Arc<CommissioningContext> {
        &self.context
    }

    pub fn breadcrumb(&self) -> u64 {
        self.context.breadcrumb().get()
    }

    pub async fn fail_safe_state(&self) -> FailSafeState {
        self.context.fail_safe_state().await
    }

    /// Run `f` against the fail-safe context under the dispatch lock.
    ///
    /// This is how other clusters (operational credentials) record the
    /// session flags consumed on expiry and completion.
    pub async fn update_fail_safe<R>(&self, f: impl FnOnce(&mut FailSafeContext) -> R) -> R {
        let _dispatch = self.context.acquire_dispatch_lock().await;
        let mut fail_safe = self.context.fail_safe().await;
        f(&mut fail_safe)
    }

    /// [`update_fail_safe`](Self::update_fail_safe), then await `follow_up`
    /// with the result before the dispatch lock is released.
    ///
    /// An expiry cannot land between the flag update and the follow-up.
    pub async fn update_fail_safe_then<R, Fut>(
        &self,
        f: impl FnOnce(&mut FailSafeContext) -> R,
        follow_up: impl FnOnce(R) -> Fut,
    ) -> R
    where
        R: Copy,
        Fut: Future<Output = ()>,
    {
        let _dispatch = self.context.acquire_dispatch_lock().await;
        let result = f(&mut *self.context.fail_safe().await);
        follow_up(result).await;
        result
    }
}
