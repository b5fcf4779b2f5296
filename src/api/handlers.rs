//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use super::AppState;
use super::types::{CurveQuery, ErrorResponse, EstimateQuery, EstimateResponse, StateResponse};
use crate::hydro::{HeadRange, ParameterError, PlantParameters, SweepResult};
use crate::report::{PdfRenderer, Report, ReportRenderer};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: ParameterError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
            field: err.field(),
        }),
    )
}

/// Returns the plant, estimate, curve and conversation.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        plant: state.plant,
        estimate: state.estimate,
        head_range: state.head_range,
        curve: state.curve.clone(),
        conversation: state.conversation.clone(),
    })
}

/// Estimates power for the server's plant with any query overrides applied.
///
/// `GET /estimate?flow_lps=100&head_m=50&loss_pct=0` → 200 + `EstimateResponse`
/// `GET /estimate?loss_pct=120` → 400 + `ErrorResponse`
pub async fn get_estimate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EstimateQuery>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let base = state.plant;
    let plant = PlantParameters::new(
        query.flow_lps.unwrap_or(base.flow_rate_lps()),
        query.head_m.unwrap_or(base.head_m()),
        query.loss_pct.unwrap_or(base.loss_percent()),
        query.efficiency.unwrap_or(base.efficiency()),
    )
    .and_then(|p| {
        p.with_piezometric_head(
            query
                .piezometric_head_m
                .unwrap_or(base.piezometric_head_m()),
        )
    })
    .map_err(bad_request)?;

    Ok(Json(EstimateResponse {
        plant,
        estimate: plant.estimate(),
    }))
}

/// Sweeps power over a head range.
///
/// `GET /curve` → the curve the server was started with
/// `GET /curve?flow_lps=20&start_m=50&end_m=100&step_m=25` → 3 points
pub async fn get_curve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CurveQuery>,
) -> Result<Json<SweepResult>, ApiError> {
    let base = state.plant;
    let plant = PlantParameters::new(
        query.flow_lps.unwrap_or(base.flow_rate_lps()),
        base.head_m(),
        query.loss_pct.unwrap_or(base.loss_percent()),
        base.efficiency(),
    )
    .map_err(bad_request)?;

    let range = &state.head_range;
    let range = HeadRange::new(
        query.start_m.unwrap_or(range.start_m()),
        query.end_m.unwrap_or(range.end_m()),
        query.step_m.unwrap_or(range.step_m()),
    )
    .map_err(bad_request)?;

    Ok(Json(plant.efficiency_curve(&range)))
}

/// Renders the PDF report for the server's plant and conversation.
///
/// `GET /report` → 200 + `application/pdf` attachment
pub async fn get_report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let renderer = PdfRenderer::default();
    let report = Report::new(&state.plant, &state.estimate, &state.conversation);
    (
        [
            (header::CONTENT_TYPE, renderer.media_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", renderer.file_name()),
            ),
        ],
        renderer.render(&report),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::assistant::{Conversation, Exchange};

    fn make_test_state() -> Arc<AppState> {
        let plant = PlantParameters::default();
        let head_range = HeadRange::reference();
        let mut conversation = Conversation::new();
        conversation.push(Exchange {
            question: "Which turbine?".into(),
            reply: "A Francis turbine.".into(),
        });
        Arc::new(AppState {
            plant,
            estimate: plant.estimate(),
            head_range,
            curve: plant.efficiency_curve(&head_range),
            conversation,
        })
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn state_returns_200() {
        let (status, body) = get("/state").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["plant"]["flow_rate_lps"], 50.0);
        assert_eq!(json["curve"].as_array().map(Vec::len), Some(15));
        assert_eq!(json["conversation"][0]["question"], "Which turbine?");
    }

    #[tokio::test]
    async fn estimate_uses_server_plant_by_default() {
        let (status, body) = get("/estimate").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let kw = json["estimate"]["power_kw"].as_f64().unwrap();
        assert!((kw - 22.52376).abs() < 1e-5, "got {kw}");
    }

    #[tokio::test]
    async fn estimate_applies_query_overrides() {
        let (status, body) = get("/estimate?flow_lps=100&head_m=50&loss_pct=0").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let kw = json["estimate"]["power_kw"].as_f64().unwrap();
        assert!((kw - 34.335).abs() < 1e-9, "got {kw}");
        assert_eq!(json["plant"]["piezometric_head_m"], 120.0);
    }

    #[tokio::test]
    async fn estimate_rejects_out_of_range_loss() {
        let (status, body) = get("/estimate?loss_pct=120").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["field"], "loss_percent");
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn curve_accepts_custom_range() {
        let (status, body) = get("/curve?flow_lps=20&start_m=50&end_m=100&step_m=25").await;
        assert_eq!(status, StatusCode::OK);

        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 3);
        assert_eq!(json[0]["head_m"], 50.0);
        assert_eq!(json[2]["head_m"], 100.0);
    }

    #[tokio::test]
    async fn curve_rejects_inverted_range() {
        let (status, _) = get("/curve?start_m=100&end_m=50").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_is_pdf_attachment() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/report")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"hydrogpt_report.pdf\""
        );
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF-1.4"));
    }
}
