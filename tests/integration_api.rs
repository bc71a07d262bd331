//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use solar_suitability::api::{AppState, router};
use solar_suitability::engine::Assessment;

/// Assess the baseline preset and return the API state.
fn build_api_state() -> Arc<AppState> {
    let (engine, request) = common::preset("baseline");
    let assessment = engine.assess(&request).unwrap();
    Arc::new(AppState { engine, assessment })
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_assess(body: String) -> (StatusCode, Vec<u8>) {
    let app = router(build_api_state());
    let req = Request::builder()
        .method("POST")
        .uri("/assess")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn assessment_round_trips_through_json() {
    let (status, json) = get("/assessment").await;
    assert_eq!(status, StatusCode::OK);

    let assessment: Assessment = serde_json::from_value(json).unwrap();
    assert_eq!(assessment.score.value, 87);
    assert_eq!(assessment.design.panel_count, 18);
    assert_eq!(assessment.incentives.total, 14_000.0);
}

#[tokio::test]
async fn incentives_include_category_subtotals() {
    let (status, json) = get("/incentives").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 14_000.0);
    assert_eq!(json["horizon_years"], 10);
    assert_eq!(json["records"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["subtotals"]["federal"], 7200.0);
    assert_eq!(json["subtotals"]["tax"], 4500.0);
}

#[tokio::test]
async fn projection_open_ended_range() {
    let (status, json) = get("/projection?from=20").await;
    assert_eq!(status, StatusCode::OK);
    let years = json.as_array().unwrap();
    assert_eq!(years.len(), 6);
    assert_eq!(years[0]["year"], 20);
    assert_eq!(years[5]["year"], 25);
}

#[tokio::test]
async fn projection_out_of_horizon_is_empty() {
    let (status, json) = get("/projection?from=30&to=40").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn post_assess_returns_assessment() {
    let body = serde_json::json!({
        "location": {
            "address": "12 Elm St, Davis, CA",
            "latitude": 38.544,
            "longitude": -121.740
        },
        "property": { "roof_area_sqft": 330.0, "orientation": 0.9 },
        "overrides": { "target_offset_kwh": 12320.0 }
    });
    let (status, bytes) = post_assess(body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let a: Assessment = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(a.design.target_panel_count, 22);
    assert_eq!(a.design.panel_count, 18);
    assert!(a.design.area_constrained);
    assert_eq!(a.location.address, "12 Elm St, Davis, CA");
}

#[tokio::test]
async fn post_assess_rejects_out_of_range_latitude() {
    let body = serde_json::json!({
        "location": { "address": "Nowhere", "latitude": 123.0, "longitude": 0.0 }
    });
    let (status, bytes) = post_assess(body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|e| e.contains("latitude out of range"))
    );
}

#[tokio::test]
async fn post_assess_rejects_bad_overrides() {
    let overrides = [
        serde_json::json!({ "escalation_rate": -2.5 }),
        serde_json::json!({ "energy_price_per_kwh": -0.1 }),
        serde_json::json!({ "target_offset_kwh": -500.0 }),
        serde_json::json!({ "horizon_years": 4_294_967_295_u32 }),
    ];
    for o in overrides {
        let body = serde_json::json!({
            "location": { "address": "12 Elm St", "latitude": 38.5, "longitude": -121.7 },
            "overrides": o
        });
        let (status, bytes) = post_assess(body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "overrides {o}");

        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            json["error"]
                .as_str()
                .is_some_and(|e| e.contains("invalid override")),
            "overrides {o}: {json}"
        );
    }
}
