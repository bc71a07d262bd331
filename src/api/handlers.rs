//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, IncentivesResponse, ProjectionQuery};
use crate::engine::finance::YearlyProjection;
use crate::engine::{Assessment, AssessmentRequest};

/// Returns the assessment for the loaded scenario.
///
/// `GET /assessment` → 200 + `Assessment` JSON
pub async fn get_assessment(State(state): State<Arc<AppState>>) -> Json<Assessment> {
    Json(state.assessment.clone())
}

/// Returns projection years, optionally filtered by range.
///
/// `GET /projection` → 200 + `Vec<YearlyProjection>` JSON
/// `GET /projection?from=N&to=M` → filtered range (inclusive)
/// `GET /projection?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_projection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectionQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(u32::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let years: Vec<YearlyProjection> = state
        .assessment
        .projection
        .range(from, to)
        .copied()
        .collect();
    Ok(Json(years))
}

/// Returns the incentive summary with category subtotals.
///
/// `GET /incentives` → 200 + `IncentivesResponse` JSON
pub async fn get_incentives(State(state): State<Arc<AppState>>) -> Json<IncentivesResponse> {
    Json(IncentivesResponse::from(&state.assessment.incentives))
}

/// Assesses the posted location against the loaded regional data.
///
/// `POST /assess` → 200 + `Assessment` JSON
/// unresolved coordinates or out-of-range overrides → 422 + `ErrorResponse`
pub async fn post_assess(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssessmentRequest>,
) -> impl IntoResponse {
    state.engine.assess(&request).map(Json).map_err(|e| {
        warn!(error = %e, "assessment rejected");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}
