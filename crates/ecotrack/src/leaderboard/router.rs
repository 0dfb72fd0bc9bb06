use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::json;

use crate::footprint::domain::EmployeeId;
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, RepositoryError,
};
use crate::identity::Identity;

use super::service::{
    ComparisonQuery, CompanyRankingQuery, LeaderboardError, LeaderboardQuery, LeaderboardService,
    TrendQuery,
};

/// Router builder for the ranking and analytics endpoints. All of them are
/// scoped to the caller's company via the identity headers.
pub fn leaderboard_router<F, E, C>(service: Arc<LeaderboardService<F, E, C>>) -> Router
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    Router::new()
        .route("/api/v1/leaderboard/employees", get(employees_handler::<F, E, C>))
        .route(
            "/api/v1/leaderboard/departments",
            get(departments_handler::<F, E, C>),
        )
        .route(
            "/api/v1/leaderboard/companies",
            get(companies_handler::<F, E, C>),
        )
        .route("/api/v1/leaderboard/trends", get(trends_handler::<F, E, C>))
        .route("/api/v1/leaderboard/compare", get(compare_handler::<F, E, C>))
        .route("/api/v1/leaderboard/my-rank", get(my_rank_handler::<F, E, C>))
        .route(
            "/api/v1/leaderboard/achievements/:employee_id",
            get(achievements_handler::<F, E, C>),
        )
        .with_state(service)
}

pub(crate) fn error_response(err: LeaderboardError) -> Response {
    let (status, message) = match &err {
        LeaderboardError::NoData => (StatusCode::NOT_FOUND, err.to_string()),
        LeaderboardError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        LeaderboardError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        LeaderboardError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };

    (status, axum::Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn employees_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.employee_leaderboard(identity.company_id, &query, today) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn departments_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.department_rankings(identity.company_id, &query, today) {
        Ok(rankings) => (StatusCode::OK, axum::Json(rankings)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn companies_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    _identity: Identity,
    Query(query): Query<CompanyRankingQuery>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.company_rankings(query.limit, today) {
        Ok(rankings) => (StatusCode::OK, axum::Json(rankings)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn trends_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
    Query(query): Query<TrendQuery>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.monthly_trends(identity.company_id, &query, today) {
        Ok(trends) => (StatusCode::OK, axum::Json(trends)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn compare_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
    Query(query): Query<ComparisonQuery>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.compare_performance(identity.employee_id, identity.company_id, &query, today) {
        Ok(comparison) => (StatusCode::OK, axum::Json(comparison)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn my_rank_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.my_rank(identity.employee_id, identity.company_id, today) {
        Ok(Some(summary)) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Ok(None) => {
            let payload = json!({
                "message": "no footprint data for current month",
                "rank": null,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn achievements_handler<F, E, C>(
    State(service): State<Arc<LeaderboardService<F, E, C>>>,
    identity: Identity,
    Path(employee_id): Path<u64>,
) -> Response
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    // Non-admins always see their own achievements, whatever id they ask for.
    let employee_id = if identity.is_admin {
        EmployeeId(employee_id)
    } else {
        identity.employee_id
    };

    match service.achievements(employee_id) {
        Ok(achievements) => (StatusCode::OK, axum::Json(achievements)).into_response(),
        Err(err) => error_response(err),
    }
}
