//! Fetch edge cases over HTTP
//!
//! Retry exhaustion, service rejection and the partial-inventory halt.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use devsweep_core::application::{
    DeviceFetcher, FetchCompletion, LifecycleOutcome, RetryPolicy, SweepMode, SweepService,
};
use devsweep_core::config::{PartialInventoryPolicy, SweepConfig};
use devsweep_core::port::report_sink::mocks::MemoryReportSink;
use devsweep_core::port::sleeper::mocks::RecordingSleeper;
use devsweep_core::port::time_provider::mocks::FixedTimeProvider;
use devsweep_core::port::StaticTokenProvider;
use devsweep_infra_http::{HttpDeviceService, ServiceConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRID: &str = "/api/v2/devicegrid";

fn http_service(server: &MockServer) -> Arc<HttpDeviceService> {
    let config = ServiceConfig {
        base_url: server.uri(),
        username: "ops@example.com".into(),
        password: "secret".into(),
        api_key: "edge-key".into(),
        request_timeout_ms: 200,
        ..Default::default()
    }
    .resolved();
    Arc::new(HttpDeviceService::new(&config).unwrap())
}

fn sweep_config() -> SweepConfig {
    SweepConfig {
        page_size: 2,
        ..Default::default()
    }
}

async fn mount_first_page(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(GRID))
        .and(body_partial_json(json!({"Offset": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {"rows": [
                {"DeviceID": "1", "DeviceName": "old", "DeviceTimeStamp": "2020-01-01T00:00:00Z"},
                {"DeviceID": "2", "DeviceName": "older", "DeviceTimeStamp": "01/01/2019 08:00:00 AM"}
            ]}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_slow_page_exhausts_retries_and_keeps_prior_devices() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;
    Mock::given(method("POST"))
        .and(path(GRID))
        .and(body_partial_json(json!({"Offset": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(1_000))
                .set_body_json(json!({"status": true, "data": {"rows": []}})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let config = sweep_config();
    let sleeper = Arc::new(RecordingSleeper::new());
    let fetcher = DeviceFetcher::new(
        http_service(&server),
        Arc::new(RetryPolicy::from_config(&config)),
        sleeper.clone(),
        &config,
    );

    let inventory = fetcher.fetch_all().await;

    assert_eq!(inventory.len(), 2);
    assert!(inventory.is_partial());
    match &inventory.completion {
        FetchCompletion::Exhausted {
            offset, attempts, ..
        } => {
            assert_eq!(*offset, 2);
            assert_eq!(*attempts, 3);
        }
        other => panic!("unexpected completion: {other:?}"),
    }
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn test_status_false_stops_without_retry() {
    let server = MockServer::start().await;
    mount_first_page(&server).await;
    Mock::given(method("POST"))
        .and(path(GRID))
        .and(body_partial_json(json!({"Offset": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": false, "message": "License expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = sweep_config();
    let sleeper = Arc::new(RecordingSleeper::new());
    let fetcher = DeviceFetcher::new(
        http_service(&server),
        Arc::new(RetryPolicy::from_config(&config)),
        sleeper.clone(),
        &config,
    );

    let inventory = fetcher.fetch_all().await;

    assert_eq!(inventory.len(), 2);
    assert!(matches!(
        inventory.completion,
        FetchCompletion::Rejected { offset: 2, .. }
    ));
    assert!(sleeper.delays().is_empty());
}

async fn partial_sweep(policy: PartialInventoryPolicy, expected_deletes: u64) -> LifecycleOutcome {
    let server = MockServer::start().await;
    mount_first_page(&server).await;
    Mock::given(method("POST"))
        .and(path(GRID))
        .and(body_partial_json(json!({"Offset": 2})))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_deletes)
        .mount(&server)
        .await;

    let config = SweepConfig {
        partial_inventory: policy,
        ..sweep_config()
    };
    let sink = Arc::new(MemoryReportSink::new());
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let sweep = SweepService::new(
        &config,
        http_service(&server),
        sink.clone(),
        Arc::new(StaticTokenProvider::new("1234")),
        Arc::new(FixedTimeProvider(now)),
        Arc::new(RecordingSleeper::new()),
    );

    let summary = sweep.run(SweepMode::Full).await.unwrap();

    // Reports are still written for what was fetched
    assert_eq!(sink.inventory().map(|d| d.len()), Some(2));
    assert_eq!(summary.stale.len(), 2);
    summary.recycle
}

#[tokio::test]
async fn test_partial_inventory_halts_lifecycle_by_default() {
    let recycle = partial_sweep(PartialInventoryPolicy::Halt, 0).await;
    assert_eq!(recycle, LifecycleOutcome::skipped("partial inventory"));
}

#[tokio::test]
async fn test_partial_inventory_can_proceed() {
    let recycle = partial_sweep(PartialInventoryPolicy::Proceed, 2).await;
    assert!(recycle.is_completed());
}
