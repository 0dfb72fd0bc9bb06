use serde::Serialize;

use super::domain::{
    Company, CompanyId, Employee, EmployeeId, EmployeeSummary, FootprintId, FootprintRecord,
    NewFootprintRecord,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A footprint joined with the owning employee, as needed by period queries.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodRecord {
    pub record: FootprintRecord,
    pub employee: EmployeeSummary,
}

/// Storage abstraction for footprint records so services and analytics can
/// be exercised against in-memory fakes.
pub trait FootprintRepository: Send + Sync {
    fn insert(&self, record: NewFootprintRecord) -> Result<FootprintRecord, RepositoryError>;
    fn fetch(&self, id: FootprintId) -> Result<Option<FootprintRecord>, RepositoryError>;
    /// All records for one employee, newest first by `calculated_at`.
    fn by_employee(&self, employee_id: EmployeeId) -> Result<Vec<FootprintRecord>, RepositoryError>;
    /// All records for a company in one calendar month, ascending by total
    /// (best performer first), joined with the owning employee.
    fn by_company_period(
        &self,
        company_id: CompanyId,
        month: u32,
        year: i32,
    ) -> Result<Vec<PeriodRecord>, RepositoryError>;
    fn delete(&self, id: FootprintId) -> Result<(), RepositoryError>;
}

/// Employee lookups and profile mutations.
pub trait EmployeeRepository: Send + Sync {
    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    /// Company roster, newest hire first.
    fn by_company(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError>;
    fn update(&self, employee: Employee) -> Result<(), RepositoryError>;
    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError>;
}

/// Company directory access.
pub trait CompanyRepository: Send + Sync {
    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<Company>, RepositoryError>;
    fn update(&self, company: Company) -> Result<(), RepositoryError>;
}
