use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::info;

use crate::identity::Identity;

use super::domain::{
    trees_needed, ActivityInput, CalculationMethod, CompanyId, EmployeeId, EmployeeSummary,
    FootprintId, FootprintRecord, NewFootprintRecord,
};
use super::estimator::FootprintEstimator;
use super::predictor::FootprintPredictor;
use super::repository::{FootprintRepository, RepositoryError};

/// Error raised by the footprint service.
#[derive(Debug, thiserror::Error)]
pub enum FootprintServiceError {
    #[error("access denied")]
    Forbidden,
    #[error("footprint calculation not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Caller-facing projection of a record; `trees_needed` is derived on the
/// way out, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct FootprintView {
    pub id: FootprintId,
    pub employee_id: EmployeeId,
    pub total_footprint: f64,
    pub travel_footprint: f64,
    pub energy_footprint: f64,
    pub waste_footprint: f64,
    pub diet_footprint: f64,
    pub trees_needed: i64,
    pub calculation_method: CalculationMethod,
    pub month: u32,
    pub year: i32,
    pub calculated_at: DateTime<Utc>,
    pub activity: ActivityInput,
}

impl FootprintView {
    pub fn from_record(record: FootprintRecord) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            total_footprint: record.total,
            travel_footprint: record.travel,
            energy_footprint: record.energy,
            waste_footprint: record.waste,
            diet_footprint: record.diet,
            trees_needed: trees_needed(record.total),
            calculation_method: record.method,
            month: record.month,
            year: record.year,
            calculated_at: record.calculated_at,
            activity: record.activity,
        }
    }
}

/// A period view joined with the owning employee, for company listings.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodFootprintView {
    pub footprint: FootprintView,
    pub employee: EmployeeSummary,
}

/// Service composing the estimator and the footprint repository. Access
/// control uses the identity context supplied by the boundary layer.
pub struct FootprintService<R, P> {
    repository: Arc<R>,
    estimator: FootprintEstimator<P>,
}

impl<R, P> FootprintService<R, P>
where
    R: FootprintRepository + 'static,
    P: FootprintPredictor + 'static,
{
    pub fn new(repository: Arc<R>, predictor: P) -> Self {
        Self {
            repository,
            estimator: FootprintEstimator::new(predictor),
        }
    }

    /// Score a submission and persist it. Month and year come from the
    /// server clock, not the caller.
    pub async fn submit(
        &self,
        input: ActivityInput,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<FootprintView, FootprintServiceError> {
        let estimate = self.estimator.estimate(&input).await;

        let record = self.repository.insert(NewFootprintRecord {
            employee_id: identity.employee_id,
            total: estimate.total,
            travel: estimate.travel,
            energy: estimate.energy,
            waste: estimate.waste,
            diet: estimate.diet,
            method: estimate.method,
            month: now.month(),
            year: now.year(),
            calculated_at: now,
            activity: input,
        })?;

        info!(
            employee = record.employee_id.0,
            method = record.method.label(),
            total = record.total,
            "footprint calculation stored"
        );

        Ok(FootprintView::from_record(record))
    }

    /// All of one employee's calculations, newest first. Owner or admin only.
    pub fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        identity: &Identity,
    ) -> Result<Vec<FootprintView>, FootprintServiceError> {
        if !identity.can_access(employee_id) {
            return Err(FootprintServiceError::Forbidden);
        }

        let records = self.repository.by_employee(employee_id)?;
        Ok(records.into_iter().map(FootprintView::from_record).collect())
    }

    pub fn get(
        &self,
        id: FootprintId,
        identity: &Identity,
    ) -> Result<FootprintView, FootprintServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(FootprintServiceError::NotFound)?;

        if !identity.can_access(record.employee_id) {
            return Err(FootprintServiceError::Forbidden);
        }

        Ok(FootprintView::from_record(record))
    }

    /// Company-wide records for one calendar month, best performer first.
    pub fn company_period(
        &self,
        company_id: CompanyId,
        month: u32,
        year: i32,
    ) -> Result<Vec<PeriodFootprintView>, FootprintServiceError> {
        let records = self.repository.by_company_period(company_id, month, year)?;
        Ok(records
            .into_iter()
            .map(|entry| PeriodFootprintView {
                footprint: FootprintView::from_record(entry.record),
                employee: entry.employee,
            })
            .collect())
    }

    pub fn delete(
        &self,
        id: FootprintId,
        identity: &Identity,
    ) -> Result<(), FootprintServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(FootprintServiceError::NotFound)?;

        if !identity.can_access(record.employee_id) {
            return Err(FootprintServiceError::Forbidden);
        }

        self.repository.delete(id)?;
        Ok(())
    }
}
