//! Server wired to in-memory adapters for handler tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gc_core::commissioning::RegulatoryLocationType;
use gc_core::ports::{FabricTablePort, FailSafeTimerPort, KeyValueStorePort};
use gc_core::{FailSafeTimerToken, TermsAndConditions};
use gc_infra::{
    CommissioningWindowFlag, InMemoryFabricTable, InMemoryKeyValueStore, ManualClock,
    PersistentDeviceControl, TokioFailSafeTimer,
};
use tokio::sync::{mpsc, Mutex};

use super::GeneralCommissioningServer;
use crate::deps::CommissioningDeps;
use crate::events::PlatformEventBus;
use crate::settings::CommissioningSettings;
use crate::setup_flow::EnhancedSetupFlow;
use crate::terms::{AcceptanceRecordStore, TransactionalTermsAndConditionsProvider};

mockall::mock! {
    pub FabricTable {}

    #[async_trait]
    impl FabricTablePort for FabricTable {
        async fn commit_pending_fabric_data(&self) -> anyhow::Result<()>;
        async fn revert_pending_fabric_data(&self) -> anyhow::Result<()>;
    }
}

mockall::mock! {
    pub FailSafeTimer {}

    #[async_trait]
    impl FailSafeTimerPort for FailSafeTimer {
        async fn schedule(&self, token: FailSafeTimerToken, after: Duration) -> anyhow::Result<()>;
        async fn cancel(&self, token: FailSafeTimerToken) -> anyhow::Result<()>;
    }
}

pub(crate) struct HarnessOptions {
    pub terms: Option<TermsAndConditions>,
    pub location_capability: RegulatoryLocationType,
    pub window_open: bool,
    pub max_cumulative_seconds: u16,
    pub failing_timer: bool,
    pub fabric_table: Option<Arc<dyn FabricTablePort>>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            terms: None,
            location_capability: RegulatoryLocationType::IndoorOutdoor,
            window_open: false,
            max_cumulative_seconds: 900,
            failing_timer: false,
            fabric_table: None,
        }
    }
}

pub(crate) struct Harness {
    pub server: Arc<GeneralCommissioningServer>,
    pub store: InMemoryKeyValueStore,
    pub fabric_table: InMemoryFabricTable,
    pub device: Arc<PersistentDeviceControl>,
    pub timer: Arc<TokioFailSafeTimer>,
    pub clock: ManualClock,
    pub expired_rx: mpsc::UnboundedReceiver<FailSafeTimerToken>,
}

pub(crate) async fn harness(options: HarnessOptions) -> Harness {
    let store = InMemoryKeyValueStore::new();
    let kv: Arc<dyn KeyValueStorePort> = Arc::new(store.clone());
    let fabric_table = InMemoryFabricTable::new();
    let device = Arc::new(PersistentDeviceControl::new(
        Arc::clone(&kv),
        options.location_capability,
    ));
    let (timer, expired_rx) = TokioFailSafeTimer::channel();
    let timer = Arc::new(timer);
    let clock = ManualClock::new(0);

    let timer_port: Arc<dyn FailSafeTimerPort> = if options.failing_timer {
        let mut failing = MockFailSafeTimer::new();
        failing
            .expect_schedule()
            .returning(|_, _| Err(anyhow::anyhow!("no timer slots")));
        failing.expect_cancel().returning(|_| Ok(()));
        Arc::new(failing)
    } else {
        timer.clone()
    };

    let setup_flow = options.terms.map(|requirements| {
        let provider = TransactionalTermsAndConditionsProvider::init(
            AcceptanceRecordStore::new(Arc::clone(&kv)),
            requirements,
        )
        .expect("provider init");
        EnhancedSetupFlow::new(Arc::new(Mutex::new(provider)))
    });

    let settings = CommissioningSettings {
        data_dir: PathBuf::new(),
        fail_safe_expiry_length_seconds: 60,
        max_cumulative_failsafe_seconds: options.max_cumulative_seconds,
        location_capability: options.location_capability,
        supports_concurrent_connection: true,
        terms_and_conditions: None,
        commissioning_window_open: options.window_open,
    };

    let deps = CommissioningDeps {
        fabric_table: options
            .fabric_table
            .unwrap_or_else(|| Arc::new(fabric_table.clone())),
        device_control: device.clone(),
        configuration: device.clone(),
        commissioning_window: Arc::new(CommissioningWindowFlag::new(options.window_open)),
        timer: timer_port,
        clock: Arc::new(clock.clone()),
        setup_flow,
        event_bus: Arc::new(PlatformEventBus::new()),
    };

    let server = Arc::new(GeneralCommissioningServer::new(deps, &settings));
    server.init().await;

    Harness {
        server,
        store,
        fabric_table,
        device,
        timer,
        clock,
        expired_rx,
    }
}
