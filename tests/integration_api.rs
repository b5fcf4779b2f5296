//! Router-level checks of the REST API.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use common::{REFERENCE_POWER_KW, assert_close, reference_plant, reference_range};
use hydrogpt::api::{AppState, router};
use hydrogpt::assistant::Conversation;

fn state() -> Arc<AppState> {
    let plant = reference_plant();
    let head_range = reference_range();
    Arc::new(AppState {
        plant,
        estimate: plant.estimate(),
        head_range,
        curve: plant.efficiency_curve(&head_range),
        conversation: Conversation::new(),
    })
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state()).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn state_exposes_reference_curve() {
    let (status, json) = get_json("/state").await;
    assert_eq!(status, StatusCode::OK);

    let curve = json["curve"].as_array().expect("curve array");
    assert_eq!(curve.len(), 15);
    assert_eq!(curve[0]["head_m"], 10.0);
    assert_close(
        json["estimate"]["power_kw"].as_f64().unwrap(),
        REFERENCE_POWER_KW,
        5e-6,
    );
    assert_eq!(json["head_range"]["step_m"], 10.0);
    assert_eq!(json["conversation"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn curve_power_matches_estimate_endpoint_at_sweep_efficiency() {
    let (_, curve) = get_json("/curve?flow_lps=80&loss_pct=10").await;
    let (_, est) = get_json("/estimate?flow_lps=80&loss_pct=10&head_m=60&efficiency=0.7").await;

    let at_60 = curve
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["head_m"] == 60.0)
        .expect("60 m in reference sweep");
    assert_eq!(at_60["power_kw"], est["estimate"]["power_kw"]);
}

#[tokio::test]
async fn negative_flow_is_bad_request() {
    let (status, json) = get_json("/estimate?flow_lps=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "flow_rate_lps");
}

#[tokio::test]
async fn zero_step_curve_is_bad_request() {
    let (status, json) = get_json("/curve?step_m=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "step_m");
}

#[tokio::test]
async fn huge_curve_end_is_bad_request() {
    let (status, json) = get_json("/curve?end_m=1e20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "step_m");
}
