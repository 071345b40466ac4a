use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use strategist_common::{ErrorKind, PlanRequest, StrategistError};
use strategist_engine::{CompetitorOutcome, PlanOutcome};

use crate::AppState;

#[derive(Deserialize)]
pub struct CompetitorBody {
    pub url: String,
}

fn warning(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "warning": message })),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn failure(e: StrategistError) -> Response {
    let status = match e.kind() {
        ErrorKind::Validation => return bad_request(e.user_message()),
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    };
    warn!(error = %e, "Pipeline failed");
    (
        status,
        Json(serde_json::json!({
            "error": e.user_message(),
            "kind": format!("{:?}", e.kind()),
        })),
    )
        .into_response()
}

/// POST /api/plan
pub async fn api_plan(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match state.strategist.run_plan(request).await {
        PlanOutcome::Ready(report) => Json(report).into_response(),
        outcome @ PlanOutcome::NoData { .. } => {
            warning(outcome.notice().map(|n| n.message).unwrap_or_default())
        }
        PlanOutcome::Failed(e) => failure(e),
    }
}

/// POST /api/competitor
pub async fn api_competitor(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CompetitorBody>, JsonRejection>,
) -> Response {
    let Json(CompetitorBody { url }) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match state.strategist.run_competitor(&url).await {
        CompetitorOutcome::Ready(report) => Json(report).into_response(),
        outcome @ CompetitorOutcome::NoHeadlines { .. } => {
            warning(outcome.notice().map(|n| n.message).unwrap_or_default())
        }
        CompetitorOutcome::Failed(e) => failure(e),
    }
}
