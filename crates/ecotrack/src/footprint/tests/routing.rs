use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::footprint::router::footprint_router;
use crate::footprint::service::FootprintService;
use crate::identity::{ADMIN_HEADER, COMPANY_HEADER, EMPLOYEE_HEADER};

use super::common::*;

fn router_with_store() -> (Arc<MemoryStore>, axum::Router) {
    let store = Arc::new(MemoryStore::with_employees([
        employee(1, "E-100", 1),
        employee(2, "E-200", 1),
    ]));
    let service = Arc::new(FootprintService::new(
        store.clone(),
        StaticPredictor::offline(),
    ));
    (store, footprint_router(service))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn submit_request(employee: &str) -> Request<Body> {
    Request::post("/api/v1/footprints")
        .header(EMPLOYEE_HEADER, employee)
        .header(COMPANY_HEADER, "1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&vegan_commuter_input()).unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn submit_route_creates_a_record() {
    let (store, router) = router_with_store();

    let response = router.oneshot(submit_request("1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["employee_id"], 1);
    assert_eq!(body["total_footprint"], 227.0);
    assert_eq!(body["calculation_method"], "fallback");
    assert_eq!(store.record_count(), 1);
}

#[tokio::test]
async fn routes_reject_requests_without_identity_headers() {
    let (_, router) = router_with_store();

    let response = router
        .oneshot(
            Request::post("/api/v1/footprints")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&vegan_commuter_input()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn employee_listing_is_owner_gated() {
    let (_, router) = router_with_store();

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/footprints/employee/2")
                .header(EMPLOYEE_HEADER, "1")
                .header(COMPANY_HEADER, "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin_response = router
        .oneshot(
            Request::get("/api/v1/footprints/employee/2")
                .header(EMPLOYEE_HEADER, "1")
                .header(COMPANY_HEADER, "1")
                .header(ADMIN_HEADER, "true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(admin_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_record_maps_to_not_found() {
    let (_, router) = router_with_store();

    let response = router
        .oneshot(
            Request::get("/api/v1/footprints/42")
                .header(EMPLOYEE_HEADER, "1")
                .header(COMPANY_HEADER, "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "footprint calculation not found");
}

#[tokio::test]
async fn delete_route_removes_owned_records() {
    let (store, router) = router_with_store();

    let created = router
        .clone()
        .oneshot(submit_request("1"))
        .await
        .unwrap();
    let id = json_body(created).await["id"].as_u64().unwrap();

    let response = router
        .oneshot(
            Request::delete(format!("/api/v1/footprints/{id}"))
                .header(EMPLOYEE_HEADER, "1")
                .header(COMPANY_HEADER, "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.record_count(), 0);
}

#[tokio::test]
async fn company_period_route_returns_joined_rows() {
    let (_, router) = router_with_store();

    let created = router.clone().oneshot(submit_request("2")).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            Request::get("/api/v1/footprints/company/1/month/1/year/2026")
                .header(EMPLOYEE_HEADER, "1")
                .header(COMPANY_HEADER, "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
