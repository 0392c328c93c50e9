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
                "name": "Booking Test", "email": "owner@example.com",
                "booking_slug": slug, "timezone": "UTC"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["owner_id"].as_str().unwrap().to_string()
}

async fn create_type(app: &TestApp, owner_id: &str, payload: Value) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/appointment-types", owner_id))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn book_payload(app: &TestApp, slug: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/book/{}", slug))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

// 2026-01-05 is a Monday; default provisioning opens Mon-Fri 09:00-17:00.
const MONDAY: &str = "2026-01-05";

fn freeze_monday_morning(app: &TestApp) {
    app.clock.set(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());
}

#[tokio::test]
async fn test_public_booking_succeeds() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-ok").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Intro Call", "duration_minutes": 60})).await;
    freeze_monday_morning(&app);

    let res = book_payload(&app, "book-ok", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["booked_via"], "public");
    assert_eq!(body["attendee_name"], "Jane");
    assert_eq!(body["confirmation_token"].as_str().unwrap().len(), 48);
    assert!(body["start_datetime"].as_str().unwrap().contains("T10:00:00"));
    assert!(body["end_datetime"].as_str().unwrap().contains("T11:00:00"));

    // Dispatch happens after the insert committed.
    let events = app.notifier.recorded();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, format!("created:{}", body["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_double_booking_is_conflict() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-twice").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Intro Call", "duration_minutes": 60})).await;
    freeze_monday_morning(&app);

    let payload = json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    });

    let first = book_payload(&app, "book-twice", payload.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = book_payload(&app, "book-twice", payload).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // The loser must not have notified anyone.
    assert_eq!(app.notifier.recorded().len(), 1);
}

#[tokio::test]
async fn test_required_phone_enforced() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-phone").await;
    let type_id = create_type(&app, &owner_id, json!({
        "name": "Site Visit", "duration_minutes": 60, "require_phone": true
    })).await;
    freeze_monday_morning(&app);

    let missing = book_payload(&app, "book-phone", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let blank = book_payload(&app, "book-phone", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com", "phone": "  "
    })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let present = book_payload(&app, "book-phone", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com", "phone": "+49 30 1234567"
    })).await;
    assert_eq!(present.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_inactive_type_rejected() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-inactive").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Old Offer", "duration_minutes": 60})).await;
    freeze_monday_morning(&app);

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE")
            .uri(format!("/api/v1/{}/appointment-types/{}", owner_id, type_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = book_payload(&app, "book-inactive", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disabled_booking_page_is_forbidden() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-off").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Intro Call", "duration_minutes": 60})).await;
    freeze_monday_morning(&app);

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/policy", owner_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"is_booking_enabled": false}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let slots = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/book/book-off/slots?type_id={}&date={}", type_id, MONDAY))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(slots.status(), StatusCode::FORBIDDEN);

    let booked = book_payload(&app, "book-off", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(booked.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/book/nope/slots?type_id=x&date=2026-01-05")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_slot_outside_open_hours_is_conflict() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-closed-hour").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Intro Call", "duration_minutes": 60})).await;
    freeze_monday_morning(&app);

    // Default schedule closes at 17:00.
    let res = book_payload(&app, "book-closed-hour", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "18:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_notice_window_blocks_near_slots() {
    let app = TestApp::new().await;
    let owner_id = setup_owner(&app, "book-notice").await;
    let type_id = create_type(&app, &owner_id, json!({"name": "Intro Call", "duration_minutes": 60})).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/{}/policy", owner_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"min_booking_notice_hours": 2}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    freeze_monday_morning(&app);

    // 08:00 + 2h notice puts 09:00 out of reach; 10:00 is fine.
    let early = book_payload(&app, "book-notice", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "09:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(early.status(), StatusCode::CONFLICT);

    let ok = book_payload(&app, "book-notice", json!({
        "appointment_type_id": type_id,
        "date": MONDAY, "time": "10:00",
        "name": "Jane", "email": "jane@example.com"
    })).await;
    assert_eq!(ok.status(), StatusCode::OK);
}
