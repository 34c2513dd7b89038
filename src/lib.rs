//! General commissioning node
//!
//! 设备入网（通用配网）节点

pub mod bootstrap;
pub mod dispatch;

pub use bootstrap::{run_app, CommissioningRuntime};
pub use dispatch::{CommandDispatcher, InboundCommand, Outbound};
