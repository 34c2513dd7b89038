//! General commissioning cluster server.
//!
//! Command handlers live in one file each and extend
//! [`GeneralCommissioningServer`]. Every handler runs under the dispatch lock
//! of the shared [`CommissioningContext`], as do fail-safe expiries delivered
//! by the timer.
//!
//! 通用配网集群服务端：命令处理、失败保护过期清理与属性读取。

mod arm_fail_safe;
mod attributes;
mod commissioning_complete;
mod context;
mod error;
mod event_handler;
mod expiry;
mod server;
mod set_regulatory_config;
mod set_tc_acknowledgements;
#[cfg(test)]
mod test_support;
mod timer_listener;

pub use context::CommissioningContext;
pub use error::CommissioningServerError;
pub use event_handler::GeneralCommissioningEventHandler;
pub use server::GeneralCommissioningServer;
pub use timer_listener::spawn_fail_safe_timer_listener;
