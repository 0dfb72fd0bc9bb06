//! Footprint submission workflow: activity input is scored through the
//! prediction service (or the deterministic fallback when it is down),
//! persisted, and served back with the derived tree-offset figure.

pub mod domain;
pub mod estimator;
pub mod predictor;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityInput, CalculationMethod, Company, CompanyId, Employee, EmployeeId, EmployeeSummary,
    FootprintId, FootprintRecord, NewFootprintRecord,
};
pub use estimator::{FootprintEstimate, FootprintEstimator, PredictionFeatures};
pub use predictor::{FootprintPredictor, HttpPredictor, PredictionBreakdown, PredictorError};
pub use repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, PeriodRecord, RepositoryError,
};
pub use router::footprint_router;
pub use service::{FootprintService, FootprintServiceError, FootprintView, PeriodFootprintView};
