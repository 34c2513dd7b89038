//! Fail-safe state machine.
//!
//! 失败保护（fail-safe）状态机。
//!
//! ```text
//!             arm(f, t>0)                 re-arm(f, t>0)
//!  Disarmed ──────────────▶ Armed(f) ◀──────────────┐
//!     ▲                        │  └─────────────────┘
//!     │  cleanup done          │ timer expiry / force expiry
//!     │                        ▼
//!     └─────────────────── Busy ◀── (disarm goes straight to Disarmed)
//! ```
//!
//! The context is pure: it never schedules timers itself. Every arm hands
//! back a [`FailSafeTimerToken`] that the caller schedules against its timer
//! service, and every expiry hands back a [`FailSafeExpiry`] describing what
//! must be rolled back.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::FailSafeError;
use crate::ids::FabricIndex;

/// Identifies one scheduled fail-safe deadline.
///
/// Each arm produces a fresh token; a timer firing with any other token is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailSafeTimerToken(u64);

impl FailSafeTimerToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FailSafeTimerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fail-safe#{}", self.0)
    }
}

/// Externally observable fail-safe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailSafeState {
    Disarmed,
    Armed { fabric_index: FabricIndex },
    /// Expired, rollback in progress; new arms are refused.
    Busy,
}

/// Outcome of a successful arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailSafeArm {
    pub token: FailSafeTimerToken,
    /// Time until the deadline, already clipped to the cumulative limit.
    pub expires_in: Duration,
    pub rearmed: bool,
}

/// Snapshot of the session flags at the moment the fail-safe expired.
///
/// 过期时刻的会话标志快照，用于回滚。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailSafeExpiry {
    pub token: FailSafeTimerToken,
    pub fabric_index: FabricIndex,
    pub add_noc_command_invoked: bool,
    pub update_noc_command_invoked: bool,
    pub add_trusted_root_cert_invoked: bool,
    pub update_terms_and_conditions_invoked: bool,
}

impl FailSafeExpiry {
    pub fn noc_command_has_been_invoked(&self) -> bool {
        self.add_noc_command_invoked || self.update_noc_command_invoked
    }

    /// Whether pending fabric data may exist and has to be reverted.
    pub fn has_pending_fabric_data(&self) -> bool {
        self.noc_command_has_been_invoked() || self.add_trusted_root_cert_invoked
    }
}

/// Fail-safe context. One instance per device.
#[derive(Debug)]
pub struct FailSafeContext {
    armed: bool,
    busy: bool,
    fabric_index: FabricIndex,
    generation: u64,
    max_cumulative: Duration,
    /// Monotonic instant of the first arm of the current window.
    first_armed_at_ms: Option<u64>,
    expiry_deadline_ms: Option<u64>,
    add_noc_command_invoked: bool,
    update_noc_command_invoked: bool,
    add_trusted_root_cert_invoked: bool,
    update_terms_and_conditions_invoked: bool,
}

impl FailSafeContext {
    /// Create a disarmed context whose windows can never outlive `max_cumulative`.
    pub fn new(max_cumulative: Duration) -> Self {
        Self {
            armed: false,
            busy: false,
            fabric_index: FabricIndex::UNDEFINED,
            generation: 0,
            max_cumulative,
            first_armed_at_ms: None,
            expiry_deadline_ms: None,
            add_noc_command_invoked: false,
            update_noc_command_invoked: false,
            add_trusted_root_cert_invoked: false,
            update_terms_and_conditions_invoked: false,
        }
    }

    /// Arm, or re-arm for the same fabric, for `expiry_length` from `now_ms`.
    ///
    /// Re-arming moves the deadline but keeps the accumulated session flags.
    /// The deadline is clipped so that the window never exceeds the maximum
    /// cumulative duration measured from the first arm.
    pub fn arm_fail_safe(
        &mut self,
        fabric_index: FabricIndex,
        expiry_length: Duration,
        now_ms: u64,
    ) -> Result<FailSafeArm, FailSafeError> {
        if self.busy {
            return Err(FailSafeError::Busy);
        }
        if self.armed && self.fabric_index != fabric_index {
            return Err(FailSafeError::ArmedByOtherFabric {
                armed_by: self.fabric_index,
            });
        }
        if expiry_length.is_zero() {
            return Err(FailSafeError::InvalidDuration);
        }

        let rearmed = self.armed;
        let first_armed_at_ms = *self.first_armed_at_ms.get_or_insert(now_ms);
        let cumulative_limit_ms =
            first_armed_at_ms.saturating_add(duration_ms(self.max_cumulative));
        let deadline_ms = now_ms
            .saturating_add(duration_ms(expiry_length))
            .min(cumulative_limit_ms);

        self.generation += 1;
        self.armed = true;
        self.fabric_index = fabric_index;
        self.expiry_deadline_ms = Some(deadline_ms);

        let token = FailSafeTimerToken(self.generation);
        let expires_in = Duration::from_millis(deadline_ms.saturating_sub(now_ms));
        info!(
            fabric_index = %fabric_index,
            %token,
            expires_in_ms = expires_in.as_millis() as u64,
            rearmed,
            "fail-safe armed"
        );

        Ok(FailSafeArm {
            token,
            expires_in,
            rearmed,
        })
    }

    /// Handle a timer firing. Stale tokens and firings while disarmed are ignored.
    pub fn fail_safe_timer_expired(&mut self, token: FailSafeTimerToken) -> Option<FailSafeExpiry> {
        if !self.armed || token != self.current_token() {
            debug!(%token, armed = self.armed, "ignoring stale fail-safe timer");
            return None;
        }
        Some(self.begin_expiry())
    }

    /// Expire immediately through the same path as a natural expiry.
    ///
    /// Returns `None` when nothing is armed.
    pub fn force_fail_safe_timer_expiry(&mut self) -> Option<FailSafeExpiry> {
        if !self.armed {
            return None;
        }
        Some(self.begin_expiry())
    }

    /// Leave `Busy` once expiry rollback has finished.
    pub fn complete_expiry_cleanup(&mut self) {
        if self.busy {
            debug!("fail-safe expiry cleanup complete");
        }
        self.busy = false;
    }

    /// Disarm without rollback. Returns the token of the pending timer, if any.
    pub fn disarm_fail_safe(&mut self) -> Option<FailSafeTimerToken> {
        let pending = self.armed.then(|| self.current_token());
        self.reset_window();
        info!("fail-safe disarmed");
        pending
    }

    pub fn is_fail_safe_armed(&self) -> bool {
        self.armed
    }

    pub fn is_fail_safe_busy(&self) -> bool {
        self.busy
    }

    pub fn matches_fabric_index(&self, fabric_index: FabricIndex) -> bool {
        self.armed && self.fabric_index == fabric_index
    }

    pub fn fabric_index(&self) -> Option<FabricIndex> {
        self.armed.then_some(self.fabric_index)
    }

    /// Token of the deadline currently scheduled, if armed.
    pub fn current_timer_token(&self) -> Option<FailSafeTimerToken> {
        self.armed.then(|| self.current_token())
    }

    pub fn expiry_deadline_ms(&self) -> Option<u64> {
        self.expiry_deadline_ms
    }

    pub fn state(&self) -> FailSafeState {
        match (self.busy, self.armed) {
            (true, _) => FailSafeState::Busy,
            (false, true) => FailSafeState::Armed {
                fabric_index: self.fabric_index,
            },
            (false, false) => FailSafeState::Disarmed,
        }
    }

    // ===== Session flags set by other command handlers =====

    /// Record an AddNOC; the context now belongs to the fabric being added.
    pub fn set_add_noc_command_invoked(&mut self, next_fabric_index: FabricIndex) {
        self.add_noc_command_invoked = true;
        self.fabric_index = next_fabric_index;
    }

    pub fn set_update_noc_command_invoked(&mut self) {
        self.update_noc_command_invoked = true;
    }

    pub fn set_add_trusted_root_cert_invoked(&mut self) {
        self.add_trusted_root_cert_invoked = true;
    }

    pub fn set_update_terms_and_conditions_has_been_invoked(&mut self) {
        self.update_terms_and_conditions_invoked = true;
    }

    pub fn add_noc_command_has_been_invoked(&self) -> bool {
        self.add_noc_command_invoked
    }

    pub fn update_noc_command_has_been_invoked(&self) -> bool {
        self.update_noc_command_invoked
    }

    pub fn noc_command_has_been_invoked(&self) -> bool {
        self.add_noc_command_invoked || self.update_noc_command_invoked
    }

    pub fn add_trusted_root_cert_has_been_invoked(&self) -> bool {
        self.add_trusted_root_cert_invoked
    }

    pub fn update_terms_and_conditions_has_been_invoked(&self) -> bool {
        self.update_terms_and_conditions_invoked
    }

    fn current_token(&self) -> FailSafeTimerToken {
        FailSafeTimerToken(self.generation)
    }

    fn begin_expiry(&mut self) -> FailSafeExpiry {
        let expiry = FailSafeExpiry {
            token: self.current_token(),
            fabric_index: self.fabric_index,
            add_noc_command_invoked: self.add_noc_command_invoked,
            update_noc_command_invoked: self.update_noc_command_invoked,
            add_trusted_root_cert_invoked: self.add_trusted_root_cert_invoked,
            update_terms_and_conditions_invoked: self.update_terms_and_conditions_invoked,
        };
        self.reset_window();
        self.busy = true;
        info!(fabric_index = %expiry.fabric_index, token = %expiry.token, "fail-safe expired");
        expiry
    }

    fn reset_window(&mut self) {
        self.armed = false;
        self.fabric_index = FabricIndex::UNDEFINED;
        self.first_armed_at_ms = None;
        self.expiry_deadline_ms = None;
        self.add_noc_command_invoked = false;
        self.update_noc_command_invoked = false;
        self.add_trusted_root_cert_invoked = false;
        self.update_terms_and_conditions_invoked = false;
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
