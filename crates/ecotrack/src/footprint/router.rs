use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use crate::identity::Identity;

use super::domain::{ActivityInput, CompanyId, EmployeeId, FootprintId};
use super::predictor::FootprintPredictor;
use super::repository::{FootprintRepository, RepositoryError};
use super::service::{FootprintService, FootprintServiceError};

/// Router builder exposing the footprint submission and retrieval endpoints.
pub fn footprint_router<R, P>(service: Arc<FootprintService<R, P>>) -> Router
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    Router::new()
        .route("/api/v1/footprints", post(submit_handler::<R, P>))
        .route(
            "/api/v1/footprints/employee/:employee_id",
            get(by_employee_handler::<R, P>),
        )
        .route(
            "/api/v1/footprints/company/:company_id/month/:month/year/:year",
            get(company_period_handler::<R, P>),
        )
        .route(
            "/api/v1/footprints/:id",
            get(get_handler::<R, P>).delete(delete_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) fn error_response(err: FootprintServiceError) -> Response {
    let (status, message) = match &err {
        FootprintServiceError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
        FootprintServiceError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        FootprintServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        FootprintServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        FootprintServiceError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };

    (status, axum::Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn submit_handler<R, P>(
    State(service): State<Arc<FootprintService<R, P>>>,
    identity: Identity,
    axum::Json(input): axum::Json<ActivityInput>,
) -> Response
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    match service.submit(input, &identity, Utc::now()).await {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn by_employee_handler<R, P>(
    State(service): State<Arc<FootprintService<R, P>>>,
    identity: Identity,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    match service.list_for_employee(EmployeeId(employee_id), &identity) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn company_period_handler<R, P>(
    State(service): State<Arc<FootprintService<R, P>>>,
    _identity: Identity,
    Path((company_id, month, year)): Path<(u64, u32, i32)>,
) -> Response
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    match service.company_period(CompanyId(company_id), month, year) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<R, P>(
    State(service): State<Arc<FootprintService<R, P>>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    match service.get(FootprintId(id), &identity) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R, P>(
    State(service): State<Arc<FootprintService<R, P>>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    match service.delete(FootprintId(id), &identity) {
        Ok(()) => {
            let payload = json!({ "message": "footprint calculation deleted" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}
