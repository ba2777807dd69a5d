//! Integration tests for routing and request admission.
//!
//! These tests use a lazy pool that never connects: every asserted path
//! is rejected before the first query runs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use scholaris_api_timetables::extractors::ORGANIZATION_HEADER;
use scholaris_api_timetables::{bindings_router, timetables_router};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

fn timetables_app() -> Router {
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost/test").unwrap();
    timetables_router(pool)
}

fn bindings_app() -> Router {
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost/test").unwrap();
    bindings_router(pool)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test that requests without the organization header are rejected.
#[tokio::test]
async fn test_missing_organization_header_is_rejected() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/timetables/{}/entries/validate", Uuid::new_v4()))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "binding_id": Uuid::new_v4(),
                        "day_of_week": 1,
                        "period": 1
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains(ORGANIZATION_HEADER));
}

/// Test that a malformed organization header is rejected.
#[tokio::test]
async fn test_malformed_organization_header_is_rejected() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/timetables/{}/entries", Uuid::new_v4()))
                .header(ORGANIZATION_HEADER, "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
}

/// Test that an out-of-range day is rejected before any lookup.
#[tokio::test]
async fn test_validate_rejects_day_out_of_range() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/timetables/{}/entries/validate", Uuid::new_v4()))
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "binding_id": Uuid::new_v4(),
                        "day_of_week": 9,
                        "period": 1
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["message"], "day_of_week must be between 1 and 7");
}

/// Test that an empty bulk lock request is rejected.
#[tokio::test]
async fn test_bulk_lock_rejects_empty_id_list() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!(
                    "/timetables/{}/entries/lock-status",
                    Uuid::new_v4()
                ))
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "entry_ids": [],
                        "is_locked": true
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["message"], "entry_ids must not be empty");
}

/// Test that the grid view rejects an out-of-range day filter.
#[tokio::test]
async fn test_list_entries_rejects_bad_day_filter() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/timetables/{}/entries?day_of_week=0",
                    Uuid::new_v4()
                ))
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test that a binding creation naming both targets is rejected.
#[tokio::test]
async fn test_create_binding_rejects_double_target() {
    let app = bindings_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bindings")
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "plan_settings_id": Uuid::new_v4(),
                        "teacher_id": Uuid::new_v4(),
                        "subject_id": Uuid::new_v4(),
                        "room_id": Uuid::new_v4(),
                        "class_id": Uuid::new_v4(),
                        "class_band_id": Uuid::new_v4(),
                        "periods_per_week": 3
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Exactly one of class_id and class_band_id must be set"
    );
}

/// Test that unknown paths fall through to 404.
#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = timetables_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/timetables/{}/rooms", Uuid::new_v4()))
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test that a wrong method on a known path yields 405.
#[tokio::test]
async fn test_wrong_method_is_405() {
    let app = bindings_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/bindings/{}", Uuid::new_v4()))
                .header(ORGANIZATION_HEADER, Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
