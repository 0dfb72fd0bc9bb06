use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::footprint::domain::{CompanyId, EmployeeId};
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, RepositoryError,
};
use crate::identity::Identity;

use super::service::{CompanyUpdate, DirectoryService, DirectoryServiceError, EmployeeUpdate};

/// Router builder for the employee and company directory endpoints.
pub fn directory_router<E, C, F>(service: Arc<DirectoryService<E, C, F>>) -> Router
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    Router::new()
        .route("/api/v1/employees", get(list_employees_handler::<E, C, F>))
        .route(
            "/api/v1/employees/:id",
            get(get_employee_handler::<E, C, F>)
                .patch(update_employee_handler::<E, C, F>)
                .delete(delete_employee_handler::<E, C, F>),
        )
        .route(
            "/api/v1/employees/:id/statistics",
            get(statistics_handler::<E, C, F>),
        )
        .route("/api/v1/companies", get(list_companies_handler::<E, C, F>))
        .route(
            "/api/v1/companies/:id",
            get(get_company_handler::<E, C, F>).patch(update_company_handler::<E, C, F>),
        )
        .with_state(service)
}

pub(crate) fn error_response(err: DirectoryServiceError) -> Response {
    let (status, message) = match &err {
        DirectoryServiceError::EmployeeNotFound | DirectoryServiceError::CompanyNotFound => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DirectoryServiceError::Forbidden | DirectoryServiceError::AdminFlagForbidden => {
            (StatusCode::FORBIDDEN, err.to_string())
        }
        DirectoryServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DirectoryServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        DirectoryServiceError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };

    (status, axum::Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn list_employees_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.find_all(&identity) {
        Ok(employees) => (StatusCode::OK, axum::Json(employees)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_employee_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.find_one(EmployeeId(id), &identity) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_employee_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
    Path(id): Path<u64>,
    axum::Json(patch): axum::Json<EmployeeUpdate>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.update(EmployeeId(id), patch, &identity) {
        Ok(employee) => (StatusCode::OK, axum::Json(employee)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_employee_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.remove(EmployeeId(id), &identity) {
        Ok(()) => {
            let payload = json!({ "message": "employee deleted" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn statistics_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.statistics(EmployeeId(id), &identity) {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_companies_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    _identity: Identity,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.companies() {
        Ok(companies) => (StatusCode::OK, axum::Json(companies)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_company_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    _identity: Identity,
    Path(id): Path<u64>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.company(CompanyId(id)) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_company_handler<E, C, F>(
    State(service): State<Arc<DirectoryService<E, C, F>>>,
    identity: Identity,
    Path(id): Path<u64>,
    axum::Json(patch): axum::Json<CompanyUpdate>,
) -> Response
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    match service.update_company(CompanyId(id), patch, &identity) {
        Ok(company) => (StatusCode::OK, axum::Json(company)).into_response(),
        Err(err) => error_response(err),
    }
}
