mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn setup_owner(app: &TestApp, slug: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/owners")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Caps Test", "email": "owner@example.com",
                "booking_slug": slug, "timezone": "UTC"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["owner_id"].as_str().unwrap().to_string()
}

async fn create_capped_type(app: &TestApp, owner_id: &str, cap: i32) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/appointment-types", owner_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Capped Session", "duration_minutes": 60, "max_per_day": cap
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn book(app: &TestApp, slug: &str, type_id: &str, time: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/book/{}", slug))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "appointment_type_id": type_id,
                "date": "2026-01-05", "time": time,
                "name": "Jane", "email": "jane@example.com"
            }).to_string())).unwrap()
    ).await.unwrap()
}

async fn slot_starts(app: &TestApp, slug: &str, type_id: &str) -> Vec<String> {
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/book/{}/slots?type_id={}&date=2026-01-05", slug, type_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["slots"].as_array().unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap().to_string())
        .collect()
}

fn freeze_monday_morning(app: &TestApp) {
    app.clock.set(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());
}

#[tokio::test]
async fn test_day_cap_empties_slot_list() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "cap-full").await;
    let type_id = create_capped_type(&app, &owner_id, 2).await;
    freeze_monday_morning(&app);

    assert_eq!(book(&app, "cap-full", &type_id, "09:00").await.status(), StatusCode::OK);
    assert_eq!(book(&app, "cap-full", &type_id, "10:00").await.status(), StatusCode::OK);

    // Open hours remain, but the cap is met.
    let slots = slot_starts(&app, "cap-full", &type_id).await;
    assert!(slots.is_empty(), "Cap reached: no slots expected, got {:?}", slots);

    let res = book(&app, "cap-full", &type_id, "11:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancellation_frees_cap() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "cap-release").await;
    let type_id = create_capped_type(&app, &owner_id, 2).await;
    freeze_monday_morning(&app);

    let first = book(&app, "cap-release", &type_id, "09:00").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_id = parse_body(first).await["id"].as_str().unwrap().to_string();

    assert_eq!(book(&app, "cap-release", &type_id, "10:00").await.status(), StatusCode::OK);
    assert!(slot_starts(&app, "cap-release", &type_id).await.is_empty());

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/appointments/{}/cancel", owner_id, first_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"reason": "sick"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let slots = slot_starts(&app, "cap-release", &type_id).await;
    assert!(!slots.is_empty());
    assert!(slots.iter().any(|s| s.contains("T09:00:00")), "Cancelled start must reopen");
}

#[tokio::test]
async fn test_cap_zero_means_unlimited() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "cap-none").await;
    let type_id = create_capped_type(&app, &owner_id, 0).await;
    freeze_monday_morning(&app);

    for time in ["09:00", "10:00", "11:00"] {
        assert_eq!(book(&app, "cap-none", &type_id, time).await.status(), StatusCode::OK);
    }

    // Still offering the rest of the day.
    let slots = slot_starts(&app, "cap-none", &type_id).await;
    assert!(slots.iter().any(|s| s.contains("T12:00:00")));
}
