//! Request identity supplied by the upstream gateway.
//!
//! Authentication happens outside this service. By the time a request lands
//! here the gateway has already validated the session and forwards the
//! caller as three headers; the extractor only parses them.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::footprint::domain::{CompanyId, EmployeeId};

pub const EMPLOYEE_HEADER: &str = "x-employee-id";
pub const COMPANY_HEADER: &str = "x-company-id";
pub const ADMIN_HEADER: &str = "x-admin";

/// Authenticated caller context: who is asking, for which company, and
/// whether they hold the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub employee_id: EmployeeId,
    pub company_id: CompanyId,
    pub is_admin: bool,
}

impl Identity {
    /// Owner-or-admin check used by every record-level authorization gate.
    pub fn can_access(&self, owner: EmployeeId) -> bool {
        self.is_admin || self.employee_id == owner
    }
}

/// Rejection emitted when the gateway headers are absent or unparseable.
#[derive(Debug)]
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": "missing or invalid identity headers" }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let employee_id = header_u64(parts, EMPLOYEE_HEADER).ok_or(IdentityRejection)?;
        let company_id = header_u64(parts, COMPANY_HEADER).ok_or(IdentityRejection)?;
        let is_admin = match parts.headers.get(ADMIN_HEADER) {
            Some(value) => {
                let value = value.to_str().map_err(|_| IdentityRejection)?;
                matches!(value.trim(), "1" | "true" | "TRUE" | "True")
            }
            None => false,
        };

        Ok(Identity {
            employee_id: EmployeeId(employee_id),
            company_id: CompanyId(company_id),
            is_admin,
        })
    }
}

fn header_u64(parts: &Parts, name: &str) -> Option<u64> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
