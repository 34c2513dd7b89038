//! End-to-end commissioning flows through the general commissioning server,
//! backed by file storage and the tokio fail-safe timer.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gc_app::settings::{CommissioningSettings, TermsProviderKind, TermsSettings};
use gc_app::terms::{open_provider, AcceptanceRecordStore};
use gc_app::usecases::general_commissioning::spawn_fail_safe_timer_listener;
use gc_app::{CommissioningDeps, EnhancedSetupFlow, GeneralCommissioningServer, PlatformEventBus};
use gc_core::commissioning::{
    ArmFailSafeRequest, CommissioningCompleteRequest, CommissioningError, RegulatoryLocationType,
    SetTcAcknowledgementsRequest,
};
use gc_core::fail_safe::FailSafeState;
use gc_core::ports::KeyValueStorePort;
use gc_core::{CommissioningConfig, FabricIndex, NodeId, SessionDescriptor, TermsAndConditions};
use gc_infra::{
    CommissioningWindowFlag, FileKeyValueStore, InMemoryFabricTable, ManualClock,
    PersistentDeviceControl, TokioFailSafeTimer,
};
use tempfile::TempDir;
use tokio::task::JoinHandle;

const FABRIC_A: FabricIndex = FabricIndex::new(1);
const FABRIC_B: FabricIndex = FabricIndex::new(2);
const COMMISSIONER: NodeId = NodeId::new(0x0102_0304);

struct Device {
    server: Arc<GeneralCommissioningServer>,
    setup_flow: Option<EnhancedSetupFlow>,
    fabric_table: InMemoryFabricTable,
    _listener: JoinHandle<()>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn boot(data_dir: &Path, terms: Option<TermsSettings>) -> Device {
    init_tracing();
    let config = CommissioningConfig::with_data_dir(data_dir.to_path_buf());
    let mut settings = CommissioningSettings::from_config(&config).unwrap();
    settings.terms_and_conditions = terms;

    let store: Arc<dyn KeyValueStorePort> =
        Arc::new(FileKeyValueStore::new_in_data_dir(data_dir.to_path_buf()).unwrap());
    let setup_flow = settings.terms_and_conditions.map(|terms| {
        let provider = open_provider(
            terms.provider,
            AcceptanceRecordStore::new(Arc::clone(&store)),
            terms.requirements,
        )
        .unwrap();
        EnhancedSetupFlow::new(provider)
    });

    let fabric_table = InMemoryFabricTable::new();
    let device_control = Arc::new(PersistentDeviceControl::new(
        Arc::clone(&store),
        RegulatoryLocationType::IndoorOutdoor,
    ));
    let (timer, expired_rx) = TokioFailSafeTimer::channel();

    let deps = CommissioningDeps {
        fabric_table: Arc::new(fabric_table.clone()),
        device_control: device_control.clone(),
        configuration: device_control,
        commissioning_window: Arc::new(CommissioningWindowFlag::new(false)),
        timer: Arc::new(timer),
        clock: Arc::new(ManualClock::new(0)),
        setup_flow: setup_flow.clone(),
        event_bus: Arc::new(PlatformEventBus::new()),
    };
    let server = Arc::new(GeneralCommissioningServer::new(deps, &settings));
    server.init().await;
    let listener = spawn_fail_safe_timer_listener(Arc::clone(&server), expired_rx);

    Device {
        server,
        setup_flow,
        fabric_table,
        _listener: listener,
    }
}

fn terms(provider: TermsProviderKind) -> Option<TermsSettings> {
    Some(TermsSettings {
        requirements: TermsAndConditions::new(1, 1),
        provider,
    })
}

fn pase() -> SessionDescriptor {
    SessionDescriptor::pase(FabricIndex::UNDEFINED)
}

fn arm(expiry_length_seconds: u16, breadcrumb: u64) -> ArmFailSafeRequest {
    ArmFailSafeRequest {
        expiry_length_seconds,
        breadcrumb,
    }
}

/// Stand-in for the operational credentials cluster adding a NOC.
async fn add_noc(device: &Device, fabric_index: FabricIndex) {
    device.fabric_table.stage_pending_fabric(fabric_index).await;
    device
        .server
        .update_fail_safe(|fail_safe| fail_safe.set_add_noc_command_invoked(fabric_index))
        .await;
}

#[tokio::test(start_paused = true)]
async fn full_commissioning_commits_fabric_and_terms() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), terms(TermsProviderKind::Transactional)).await;

    let response = device.server.arm_fail_safe(&pase(), arm(60, 1)).await.unwrap();
    assert_eq!(response.error_code, CommissioningError::Ok);

    let response = device
        .server
        .set_tc_acknowledgements(
            &pase(),
            SetTcAcknowledgementsRequest {
                tc_version: 1,
                tc_user_response: 1,
            },
        )
        .await
        .unwrap();
    assert_eq!(response.error_code, CommissioningError::Ok);

    add_noc(&device, FABRIC_A).await;

    let response = device
        .server
        .commissioning_complete(
            &SessionDescriptor::case(FABRIC_A, COMMISSIONER),
            CommissioningCompleteRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(response.error_code, CommissioningError::Ok);
    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
    assert_eq!(device.server.breadcrumb(), 0);
    assert_eq!(device.fabric_table.committed_fabrics().await, vec![FABRIC_A]);

    // Acceptance was committed and is visible after a restart.
    let restarted = boot(dir.path(), terms(TermsProviderKind::Transactional)).await;
    let flow = restarted.setup_flow.as_ref().unwrap();
    assert_eq!(flow.acceptance().await.unwrap(), TermsAndConditions::new(1, 1));
}

#[tokio::test(start_paused = true)]
async fn fail_safe_expiry_rolls_back_terms_and_fabric() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), terms(TermsProviderKind::Transactional)).await;

    device.server.arm_fail_safe(&pase(), arm(30, 8)).await.unwrap();
    device
        .server
        .set_tc_acknowledgements(
            &pase(),
            SetTcAcknowledgementsRequest {
                tc_version: 1,
                tc_user_response: 1,
            },
        )
        .await
        .unwrap();
    add_noc(&device, FABRIC_A).await;
    assert_eq!(device.server.breadcrumb(), 8);

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
    assert_eq!(device.server.breadcrumb(), 0);
    assert_eq!(device.fabric_table.pending_fabric().await, None);
    assert!(device.fabric_table.committed_fabrics().await.is_empty());
    let flow = device.setup_flow.as_ref().unwrap();
    assert_eq!(flow.acceptance().await.unwrap(), TermsAndConditions::NONE);

    // The device can be commissioned again afterwards.
    let response = device.server.arm_fail_safe(&pase(), arm(30, 9)).await.unwrap();
    assert_eq!(response.error_code, CommissioningError::Ok);
}

#[tokio::test(start_paused = true)]
async fn durable_terms_survive_fail_safe_expiry() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), terms(TermsProviderKind::Durable)).await;

    device.server.arm_fail_safe(&pase(), arm(30, 1)).await.unwrap();
    device
        .server
        .set_tc_acknowledgements(
            &pase(),
            SetTcAcknowledgementsRequest {
                tc_version: 2,
                tc_user_response: 1,
            },
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
    let flow = device.setup_flow.as_ref().unwrap();
    assert_eq!(flow.acceptance().await.unwrap(), TermsAndConditions::new(1, 2));
}

#[tokio::test(start_paused = true)]
async fn rearm_pushes_expiry_out() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), None).await;
    let session = SessionDescriptor::case(FABRIC_A, COMMISSIONER);

    device.server.arm_fail_safe(&session, arm(10, 1)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(8)).await;
    device.server.arm_fail_safe(&session, arm(10, 2)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(8)).await;

    assert_eq!(
        device.server.fail_safe_state().await,
        FailSafeState::Armed { fabric_index: FABRIC_A }
    );

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
}

#[tokio::test]
async fn second_admin_is_refused_while_first_holds_fail_safe() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), None).await;

    let first = device
        .server
        .arm_fail_safe(&SessionDescriptor::case(FABRIC_A, COMMISSIONER), arm(60, 1))
        .await
        .unwrap();
    let second = device
        .server
        .arm_fail_safe(&SessionDescriptor::case(FABRIC_B, NodeId::new(7)), arm(60, 2))
        .await
        .unwrap();

    assert_eq!(first.error_code, CommissioningError::Ok);
    assert_eq!(second.error_code, CommissioningError::BusyWithOtherAdmin);
    assert_eq!(
        device.server.fail_safe_state().await,
        FailSafeState::Armed { fabric_index: FABRIC_A }
    );
}

#[tokio::test]
async fn zero_expiry_disarms_immediately() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), None).await;
    let session = SessionDescriptor::case(FABRIC_A, COMMISSIONER);
    device.server.arm_fail_safe(&session, arm(60, 3)).await.unwrap();

    let response = device.server.arm_fail_safe(&session, arm(0, 4)).await.unwrap();

    assert_eq!(response.error_code, CommissioningError::Ok);
    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
    assert_eq!(device.server.breadcrumb(), 0);
}

#[tokio::test]
async fn completion_without_fail_safe_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let device = boot(dir.path(), terms(TermsProviderKind::Transactional)).await;

    let response = device
        .server
        .commissioning_complete(
            &SessionDescriptor::case(FABRIC_A, COMMISSIONER),
            CommissioningCompleteRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.error_code, CommissioningError::NoFailSafe);
    assert_eq!(device.server.fail_safe_state().await, FailSafeState::Disarmed);
    assert!(device.fabric_table.committed_fabrics().await.is_empty());
}
