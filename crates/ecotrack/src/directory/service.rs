use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::footprint::domain::{Company, CompanyId, Employee, EmployeeId, FootprintRecord};
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, RepositoryError,
};
use crate::identity::Identity;

const PROFILE_HISTORY_LIMIT: usize = 5;
const COMPANY_LIST_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("company not found")]
    CompanyNotFound,
    #[error("access denied")]
    Forbidden,
    #[error("cannot modify admin status")]
    AdminFlagForbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Partial employee update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub industry: Option<String>,
}

/// One past calculation in an employee's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub footprint: i64,
    pub month: u32,
    pub year: i32,
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    fn from_record(record: &FootprintRecord) -> Self {
        Self {
            footprint: record.total.round() as i64,
            month: record.month,
            year: record.year,
            date: record.calculated_at,
        }
    }
}

/// Movement of the latest calculation against the average of the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryTrend {
    #[serde(rename = "no data")]
    NoData,
    Improving,
    Worsening,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeStatistics {
    pub total_calculations: usize,
    pub average_footprint: i64,
    pub latest_footprint: Option<i64>,
    pub trend: HistoryTrend,
    pub history: Vec<HistoryEntry>,
}

/// Employee profile with company context and the most recent calculations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeProfile {
    #[serde(flatten)]
    pub employee: Employee,
    pub company: Option<Company>,
    pub recent_footprints: Vec<HistoryEntry>,
}

/// Employee and company directory with per-record access control.
pub struct DirectoryService<E, C, F> {
    employees: Arc<E>,
    companies: Arc<C>,
    footprints: Arc<F>,
}

impl<E, C, F> DirectoryService<E, C, F>
where
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
    F: FootprintRepository + 'static,
{
    pub fn new(employees: Arc<E>, companies: Arc<C>, footprints: Arc<F>) -> Self {
        Self {
            employees,
            companies,
            footprints,
        }
    }

    /// Roster of the caller's company, newest hire first.
    pub fn find_all(&self, identity: &Identity) -> Result<Vec<Employee>, DirectoryServiceError> {
        Ok(self.employees.by_company(identity.company_id)?)
    }

    /// Single profile with company context and the last few calculations.
    /// Owner or admin only.
    pub fn find_one(
        &self,
        id: EmployeeId,
        identity: &Identity,
    ) -> Result<EmployeeProfile, DirectoryServiceError> {
        let employee = self
            .employees
            .fetch(id)?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;

        if !identity.can_access(employee.id) {
            return Err(DirectoryServiceError::Forbidden);
        }

        let company = self.companies.fetch(employee.company_id)?;
        let recent_footprints = self
            .footprints
            .by_employee(employee.id)?
            .iter()
            .take(PROFILE_HISTORY_LIMIT)
            .map(HistoryEntry::from_record)
            .collect();

        Ok(EmployeeProfile {
            employee,
            company,
            recent_footprints,
        })
    }

    /// Applies a partial update. Owner or admin only; the admin flag itself
    /// can only be changed by an admin.
    pub fn update(
        &self,
        id: EmployeeId,
        patch: EmployeeUpdate,
        identity: &Identity,
    ) -> Result<Employee, DirectoryServiceError> {
        let mut employee = self
            .employees
            .fetch(id)?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;

        if !identity.can_access(employee.id) {
            return Err(DirectoryServiceError::Forbidden);
        }
        if !identity.is_admin && patch.is_admin.is_some() {
            return Err(DirectoryServiceError::AdminFlagForbidden);
        }

        if let Some(name) = patch.name {
            employee.name = name;
        }
        if let Some(email) = patch.email {
            employee.email = email;
        }
        if let Some(department) = patch.department {
            employee.department = Some(department);
        }
        if let Some(position) = patch.position {
            employee.position = Some(position);
        }
        if let Some(is_admin) = patch.is_admin {
            employee.is_admin = is_admin;
        }

        self.employees.update(employee.clone())?;
        Ok(employee)
    }

    /// Removes an employee. Admin only.
    pub fn remove(&self, id: EmployeeId, identity: &Identity) -> Result<(), DirectoryServiceError> {
        if !identity.is_admin {
            return Err(DirectoryServiceError::Forbidden);
        }

        self.employees
            .fetch(id)?
            .ok_or(DirectoryServiceError::EmployeeNotFound)?;
        self.employees.delete(id)?;
        Ok(())
    }

    /// Per-employee aggregates over the full calculation history. The trend
    /// compares the latest record with the average of everything before it.
    pub fn statistics(
        &self,
        employee_id: EmployeeId,
        identity: &Identity,
    ) -> Result<EmployeeStatistics, DirectoryServiceError> {
        if !identity.can_access(employee_id) {
            return Err(DirectoryServiceError::Forbidden);
        }

        let history = self.footprints.by_employee(employee_id)?;
        let Some(latest) = history.first() else {
            return Ok(EmployeeStatistics {
                total_calculations: 0,
                average_footprint: 0,
                latest_footprint: None,
                trend: HistoryTrend::NoData,
                history: Vec::new(),
            });
        };

        let total: f64 = history.iter().map(|record| record.total).sum();
        let average = total / history.len() as f64;

        let trend = if history.len() > 1 {
            let rest: f64 = history[1..].iter().map(|record| record.total).sum();
            let previous_average = rest / (history.len() - 1) as f64;
            if latest.total < previous_average * 0.9 {
                HistoryTrend::Improving
            } else if latest.total > previous_average * 1.1 {
                HistoryTrend::Worsening
            } else {
                HistoryTrend::Stable
            }
        } else {
            HistoryTrend::Stable
        };

        Ok(EmployeeStatistics {
            total_calculations: history.len(),
            average_footprint: average.round() as i64,
            latest_footprint: Some(latest.total.round() as i64),
            trend,
            history: history.iter().map(HistoryEntry::from_record).collect(),
        })
    }

    pub fn companies(&self) -> Result<Vec<Company>, DirectoryServiceError> {
        Ok(self.companies.list(COMPANY_LIST_LIMIT)?)
    }

    pub fn company(&self, id: CompanyId) -> Result<Company, DirectoryServiceError> {
        self.companies
            .fetch(id)?
            .ok_or(DirectoryServiceError::CompanyNotFound)
    }

    /// Updates company details. Admin only.
    pub fn update_company(
        &self,
        id: CompanyId,
        patch: CompanyUpdate,
        identity: &Identity,
    ) -> Result<Company, DirectoryServiceError> {
        if !identity.is_admin {
            return Err(DirectoryServiceError::Forbidden);
        }

        let mut company = self
            .companies
            .fetch(id)?
            .ok_or(DirectoryServiceError::CompanyNotFound)?;

        if let Some(name) = patch.name {
            company.name = name;
        }
        if let Some(industry) = patch.industry {
            company.industry = Some(industry);
        }

        self.companies.update(company.clone())?;
        Ok(company)
    }
}
