//! # Commissioning Dependencies / 配网依赖
//!
//! Parameter grouping for [`GeneralCommissioningServer`] construction.
//! No build steps, no defaults, no hidden logic.
//!
//! [`GeneralCommissioningServer`]: crate::usecases::general_commissioning::GeneralCommissioningServer

use std::sync::Arc;

use gc_core::ports::*;

use crate::events::PlatformEventBus;
use crate::setup_flow::EnhancedSetupFlow;

/// Commissioning dependency grouping (just parameter grouping)
/// 配网依赖分组（仅参数打包）
pub struct CommissioningDeps {
    // Fabric and device collaborators / 网络与设备协作者
    pub fabric_table: Arc<dyn FabricTablePort>,
    pub device_control: Arc<dyn DeviceControlPort>,
    pub configuration: Arc<dyn ConfigurationPort>,
    pub commissioning_window: Arc<dyn CommissioningWindowPort>,

    // Time / 时间
    pub timer: Arc<dyn FailSafeTimerPort>,
    pub clock: Arc<dyn ClockPort>,

    // Terms and conditions, absent when disabled / 条款（未启用时为空）
    pub setup_flow: Option<EnhancedSetupFlow>,

    pub event_bus: Arc<PlatformEventBus>,
}
