//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use cryocore_sim::api::{AppState, router};
use cryocore_sim::config::ScenarioConfig;
use cryocore_sim::reporting::NullSink;
use cryocore_sim::sim::kpi::RunSummary;

/// Run the battery-night preset to completion and return the API state.
fn build_api_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::battery_night();
    let mut controller = scenario.build_controller().expect("valid controller");
    controller.initialize();
    let results = controller
        .run(scenario.simulation.ticks, &mut NullSink)
        .expect("run completes");
    let summary = RunSummary::from_results(&results, controller.config().dt_hours());
    controller.shutdown();

    Arc::new(AppState {
        status: controller.status(),
        summary,
        results,
    })
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn full_scenario_status_endpoint() {
    let (code, json) = get("/status").await;
    assert_eq!(code, StatusCode::OK);

    // Final snapshot after shutdown
    let status = &json["status"];
    assert_eq!(status["cluster_id"], "cryocore");
    assert_eq!(status["operational"], false);
    assert_eq!(status["ticks_completed"], 120);
    assert_eq!(status["source_type"], "battery");
    assert_eq!(status["battery_status"]["battery_capacity_wh"], 60.0);
    assert_eq!(
        status["cluster_status"]["unit_statuses"]
            .as_array()
            .map(Vec::len),
        Some(9)
    );
    assert!(status["environment"]["air_volume_m3"].as_f64().is_some());

    let summary = &json["summary"];
    assert_eq!(summary["cooled_ticks"], 10);
    assert_eq!(summary["shortfall_ticks"], 110);
    assert!(summary["min_temp_c"].as_f64().unwrap() < 45.0);
}

#[tokio::test]
async fn full_scenario_telemetry_endpoint() {
    let (code, json) = get("/telemetry").await;
    assert_eq!(code, StatusCode::OK);

    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 120);

    // CSV column names are used
    let first = &records[0];
    assert!(first.get("source_w").is_some());
    assert!(first.get("delivered_w").is_some());
    assert!(first.get("shortfall").is_some());
    assert!(first.get("unit_temp_c").is_some());
    assert!(first.get("battery_wh").is_some());

    // Internal field names are not exposed
    assert!(first.get("source_watts").is_none());
    assert!(first.get("power_shortfall").is_none());
    assert!(first.get("mean_unit_temp_c").is_none());
}

#[tokio::test]
async fn full_scenario_telemetry_range() {
    let (code, json) = get("/telemetry?from=8&to=11").await;
    assert_eq!(code, StatusCode::OK);

    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["tick"], 8);
    assert_eq!(records[1]["cooled"], true);
    assert_eq!(records[2]["shortfall"], true);
    assert_eq!(records[3]["tick"], 11);
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (code, json) = get("/telemetry?from=11&to=8").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}
