//! End-to-end sweep tests
//!
//! Real HTTP adapter and file sink against a mock device-management server.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use devsweep_core::application::{FetchCompletion, LifecycleOutcome, SweepMode, SweepService};
use devsweep_core::config::SweepConfig;
use devsweep_core::domain::BatchState;
use devsweep_core::port::sleeper::mocks::RecordingSleeper;
use devsweep_core::port::time_provider::mocks::FixedTimeProvider;
use devsweep_core::port::StaticTokenProvider;
use devsweep_infra_http::{HttpDeviceService, ServiceConfig};
use devsweep_infra_report::{FileReportSink, ReportConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRID: &str = "/api/v2/devicegrid";
const DELETE: &str = "/api/v2/device/delete";

fn service_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        base_url: server.uri(),
        username: "ops@example.com".into(),
        password: "secret".into(),
        api_key: "e2e-key".into(),
        request_timeout_ms: 300,
        ..Default::default()
    }
    .resolved()
}

fn sweep(server: &MockServer, reports: &Path, token: &str) -> SweepService {
    let config = SweepConfig {
        page_size: 2,
        ..Default::default()
    };
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    SweepService::new(
        &config,
        Arc::new(HttpDeviceService::new(&service_config(server)).unwrap()),
        Arc::new(
            FileReportSink::new(&ReportConfig {
                output_dir: reports.to_path_buf(),
            })
            .unwrap(),
        ),
        Arc::new(StaticTokenProvider::new(token)),
        Arc::new(FixedTimeProvider(now)),
        Arc::new(RecordingSleeper::new()),
    )
}

async fn mount_page(server: &MockServer, offset: u64, rows: Value) {
    Mock::given(method("POST"))
        .and(path(GRID))
        .and(header("ApiKey", "e2e-key"))
        .and(body_partial_json(json!({"Offset": offset, "Limit": 2})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": true, "data": {"rows": rows}})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_fleet(server: &MockServer) {
    mount_page(
        server,
        0,
        json!([
            {"DeviceID": "101", "DeviceName": "Kiosk A", "DeviceTimeStamp": "2023-01-01T00:00:00Z"},
            {"DeviceID": "102", "DeviceName": "Kiosk B", "DeviceTimeStamp": "05/30/2024 09:00:00 AM"}
        ]),
    )
    .await;
    mount_page(
        server,
        2,
        json!([
            {"DeviceID": "103", "DeviceName": "Kiosk C", "DeviceTimeStamp": "2022-06-01T12:00:00+0200"},
            {"DeviceID": "104", "DeviceName": "Kiosk D"}
        ]),
    )
    .await;
    mount_page(server, 4, json!([])).await;
}

#[tokio::test]
async fn test_full_sweep_over_http() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;

    Mock::given(method("PUT"))
        .and(path(DELETE))
        .and(body_json(json!({"Action": "SEND_TO_DELETED_LIST", "DeviceId": "103,101"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(DELETE))
        .and(body_json(json!({
            "Action": "FORCEDELETE_DEVICE",
            "DeviceId": "103,101",
            "VerificationMsg": "2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&server)
        .await;

    let reports = tempfile::tempdir().unwrap();
    let summary = sweep(&server, reports.path(), "2")
        .run(SweepMode::Full)
        .await
        .unwrap();

    assert_eq!(summary.total_devices, 4);
    assert_eq!(summary.completion, FetchCompletion::Complete);
    assert_eq!(summary.stale.device_ids(), vec!["103", "101"]);
    assert_eq!(summary.stale.excluded.missing_timestamp, 1);
    assert!(summary.recycle.is_completed());
    assert!(summary.purge.is_completed());
    assert_eq!(summary.batch_state, BatchState::PermanentlyDeleted);

    let all: Value = serde_json::from_str(
        &std::fs::read_to_string(reports.path().join("all_devices.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 4);

    let csv = std::fs::read_to_string(reports.path().join("stale_devices.csv")).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec![
            "DeviceID,DeviceName,DeviceTimeStamp",
            "103,Kiosk C,2022-06-01T12:00:00+0200",
            "101,Kiosk A,2023-01-01T00:00:00Z",
        ]
    );
}

#[tokio::test]
async fn test_scan_never_touches_delete_endpoint() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let reports = tempfile::tempdir().unwrap();
    let summary = sweep(&server, reports.path(), "2")
        .run(SweepMode::Scan)
        .await
        .unwrap();

    assert_eq!(summary.stale.len(), 2);
    assert!(reports.path().join("stale_devices.json").exists());
}

#[tokio::test]
async fn test_rejected_recycle_still_attempts_force_delete() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;

    Mock::given(method("PUT"))
        .and(body_partial_json(json!({"Action": "SEND_TO_DELETED_LIST"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(body_partial_json(json!({"Action": "FORCEDELETE_DEVICE"})))
        .respond_with(ResponseTemplate::new(400).set_body_string("Verification failed"))
        .expect(1)
        .mount(&server)
        .await;

    let reports = tempfile::tempdir().unwrap();
    let summary = sweep(&server, reports.path(), "wrong")
        .run(SweepMode::Full)
        .await
        .unwrap();

    assert!(matches!(summary.recycle, LifecycleOutcome::Failed { .. }));
    match &summary.purge {
        LifecycleOutcome::Failed { error, .. } => assert!(error.contains("Verification failed")),
        other => panic!("unexpected purge outcome: {other:?}"),
    }
    assert_eq!(summary.batch_state, BatchState::Active);
}

#[tokio::test]
async fn test_missing_token_leaves_devices_in_recycle_bin() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;

    Mock::given(method("PUT"))
        .and(body_partial_json(json!({"Action": "SEND_TO_DELETED_LIST"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(body_partial_json(json!({"Action": "FORCEDELETE_DEVICE"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let reports = tempfile::tempdir().unwrap();
    let summary = sweep(&server, reports.path(), "")
        .run(SweepMode::Full)
        .await
        .unwrap();

    assert!(summary.recycle.is_completed());
    assert!(matches!(summary.purge, LifecycleOutcome::Skipped { .. }));
    assert_eq!(summary.batch_state, BatchState::RecycleBin);
}
