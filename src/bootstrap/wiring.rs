//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (file store, timer, clock) / 创建 infra 层具体实现
//! - ✅ Open the configured terms-and-conditions provider / 打开配置的条款提供者
//! - ✅ Inject all dependencies into the server / 将所有依赖注入到服务
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! ❌ **No configuration validation / 禁止做配置验证**
//! - Settings arrive validated from `gc_app::settings`
//! - 设置已由 `gc_app::settings` 验证
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on gc-infra + gc-app simultaneously.**
//! > **这是唯一允许同时依赖 gc-infra 和 gc-app 的地方。**

use std::sync::Arc;

use anyhow::Context;
use gc_app::settings::CommissioningSettings;
use gc_app::terms::{open_provider, AcceptanceRecordStore};
use gc_app::usecases::general_commissioning::spawn_fail_safe_timer_listener;
use gc_app::{CommissioningDeps, EnhancedSetupFlow, GeneralCommissioningServer, PlatformEventBus};
use gc_core::ports::KeyValueStorePort;
use gc_infra::{
    CommissioningWindowFlag, FileKeyValueStore, InMemoryFabricTable, MonotonicClock,
    PersistentDeviceControl, TokioFailSafeTimer,
};
use tokio::task::JoinHandle;
use tracing::info;

/// Assembled server plus the adapters the dispatcher drives directly.
pub struct CommissioningRuntime {
    pub server: Arc<GeneralCommissioningServer>,
    /// Stand-in for the operational credentials cluster's fabric table.
    pub fabric_table: InMemoryFabricTable,
    pub commissioning_window: Arc<CommissioningWindowFlag>,
    timer_listener: JoinHandle<()>,
}

impl Drop for CommissioningRuntime {
    fn drop(&mut self) {
        self.timer_listener.abort();
    }
}

/// Wire the general commissioning server from validated settings.
///
/// Must run inside a tokio runtime: the fail-safe timer listener is spawned
/// here.
pub async fn wire_commissioning(
    settings: &CommissioningSettings,
) -> anyhow::Result<CommissioningRuntime> {
    let store: Arc<dyn KeyValueStorePort> = Arc::new(
        FileKeyValueStore::new_in_data_dir(settings.data_dir.clone()).with_context(|| {
            format!(
                "Failed to open key-value store in {}",
                settings.data_dir.display()
            )
        })?,
    );

    let setup_flow = settings
        .terms_and_conditions
        .map(|terms| -> anyhow::Result<EnhancedSetupFlow> {
            let provider = open_provider(
                terms.provider,
                AcceptanceRecordStore::new(Arc::clone(&store)),
                terms.requirements,
            )
            .context("Failed to open terms and conditions provider")?;
            Ok(EnhancedSetupFlow::new(provider))
        })
        .transpose()?;

    let fabric_table = InMemoryFabricTable::new();
    let device_control = Arc::new(PersistentDeviceControl::new(
        Arc::clone(&store),
        settings.location_capability,
    ));
    let commissioning_window = Arc::new(CommissioningWindowFlag::new(
        settings.commissioning_window_open,
    ));
    let (timer, expired_rx) = TokioFailSafeTimer::channel();

    let deps = CommissioningDeps {
        fabric_table: Arc::new(fabric_table.clone()),
        device_control: device_control.clone(),
        configuration: device_control,
        commissioning_window: commissioning_window.clone(),
        timer: Arc::new(timer),
        clock: Arc::new(MonotonicClock::new()),
        setup_flow,
        event_bus: Arc::new(PlatformEventBus::new()),
    };

    let server = Arc::new(GeneralCommissioningServer::new(deps, settings));
    server.init().await;
    let timer_listener = spawn_fail_safe_timer_listener(Arc::clone(&server), expired_rx);

    info!(
        data_dir = %settings.data_dir.display(),
        location_capability = ?settings.location_capability,
        "commissioning runtime wired"
    );

    Ok(CommissioningRuntime {
        server,
        fabric_table,
        commissioning_window,
        timer_listener,
    })
}
