use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::footprint::domain::{
    ActivityInput, Company, CompanyId, Employee, EmployeeId, FootprintId, FootprintRecord,
    NewFootprintRecord,
};
use crate::footprint::estimator::PredictionFeatures;
use crate::footprint::predictor::{FootprintPredictor, PredictionBreakdown, PredictorError};
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, PeriodRecord, RepositoryError,
};
use crate::identity::Identity;

/// In-memory store backing every repository trait the workflow needs.
#[derive(Default)]
pub(super) struct MemoryStore {
    pub records: Mutex<Vec<FootprintRecord>>,
    pub employees: Mutex<HashMap<EmployeeId, Employee>>,
    pub companies: Mutex<HashMap<CompanyId, Company>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::default();
        {
            let mut map = store.employees.lock().unwrap();
            for employee in employees {
                map.insert(employee.id, employee);
            }
        }
        store
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl FootprintRepository for MemoryStore {
    fn insert(&self, record: NewFootprintRecord) -> Result<FootprintRecord, RepositoryError> {
        let id = FootprintId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = FootprintRecord {
            id,
            employee_id: record.employee_id,
            activity: record.activity,
            total: record.total,
            travel: record.travel,
            energy: record.energy,
            waste: record.waste,
            diet: record.diet,
            method: record.method,
            month: record.month,
            year: record.year,
            calculated_at: record.calculated_at,
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: FootprintId) -> Result<Option<FootprintRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    fn by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        Ok(records)
    }

    fn by_company_period(
        &self,
        company_id: CompanyId,
        month: u32,
        year: i32,
    ) -> Result<Vec<PeriodRecord>, RepositoryError> {
        let employees = self.employees.lock().unwrap();
        let mut rows: Vec<PeriodRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.month == month && record.year == year)
            .filter_map(|record| {
                let employee = employees.get(&record.employee_id)?;
                (employee.company_id == company_id).then(|| PeriodRecord {
                    record: record.clone(),
                    employee: employee.summary(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.record.total.total_cmp(&b.record.total));
        Ok(rows)
    }

    fn delete(&self, id: FootprintId) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl EmployeeRepository for MemoryStore {
    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.employees.lock().unwrap().get(&id).cloned())
    }

    fn by_company(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError> {
        let mut roster: Vec<_> = self
            .employees
            .lock()
            .unwrap()
            .values()
            .filter(|employee| employee.company_id == company_id)
            .cloned()
            .collect();
        roster.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roster)
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut map = self.employees.lock().unwrap();
        if !map.contains_key(&employee.id) {
            return Err(RepositoryError::NotFound);
        }
        map.insert(employee.id, employee);
        Ok(())
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        self.employees
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl CompanyRepository for MemoryStore {
    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.companies.lock().unwrap().get(&id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Company>, RepositoryError> {
        let mut companies: Vec<_> = self.companies.lock().unwrap().values().cloned().collect();
        companies.sort_by_key(|company| company.id);
        companies.truncate(limit);
        Ok(companies)
    }

    fn update(&self, company: Company) -> Result<(), RepositoryError> {
        let mut map = self.companies.lock().unwrap();
        if !map.contains_key(&company.id) {
            return Err(RepositoryError::NotFound);
        }
        map.insert(company.id, company);
        Ok(())
    }
}

/// Repository that fails every call, for surfacing storage errors.
pub(super) struct UnavailableRepository;

impl FootprintRepository for UnavailableRepository {
    fn insert(&self, _record: NewFootprintRecord) -> Result<FootprintRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: FootprintId) -> Result<Option<FootprintRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn by_employee(
        &self,
        _employee_id: EmployeeId,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn by_company_period(
        &self,
        _company_id: CompanyId,
        _month: u32,
        _year: i32,
    ) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn delete(&self, _id: FootprintId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Canned predictor: availability and response are fixed at construction.
pub(super) struct StaticPredictor {
    pub available: bool,
    pub response: Option<PredictionBreakdown>,
}

impl StaticPredictor {
    pub fn offline() -> Self {
        Self {
            available: false,
            response: None,
        }
    }

    pub fn responding(breakdown: PredictionBreakdown) -> Self {
        Self {
            available: true,
            response: Some(breakdown),
        }
    }

    /// Healthy on probe, then errors on the actual prediction call.
    pub fn flaky() -> Self {
        Self {
            available: true,
            response: None,
        }
    }
}

#[async_trait]
impl FootprintPredictor for StaticPredictor {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn predict(
        &self,
        _features: &PredictionFeatures,
    ) -> Result<PredictionBreakdown, PredictorError> {
        self.response.clone().ok_or(PredictorError::Unhealthy)
    }
}

pub(super) fn employee(id: u64, code: &str, company: u64) -> Employee {
    Employee {
        id: EmployeeId(id),
        employee_code: code.to_string(),
        name: format!("Employee {code}"),
        email: format!("{}@example.test", code.to_lowercase()),
        department: Some("Engineering".to_string()),
        position: None,
        is_admin: false,
        company_id: CompanyId(company),
        created_at: timestamp(2025, 1, 1),
    }
}

pub(super) fn identity(employee_id: u64, company_id: u64, is_admin: bool) -> Identity {
    Identity {
        employee_id: EmployeeId(employee_id),
        company_id: CompanyId(company_id),
        is_admin,
    }
}

pub(super) fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn vegan_commuter_input() -> ActivityInput {
    ActivityInput {
        diet: Some("vegan".to_string()),
        transport: Some("public".to_string()),
        vehicle_km: Some(50.0),
        air_travel: Some("rarely".to_string()),
        waste_bag_count: Some(2.0),
        recycle_paper: Some(true),
        recycle_plastic: Some(true),
        daily_tv_pc: Some(2.0),
        internet_daily: Some(4.0),
        grocery_bill: Some(200.0),
        clothes_monthly: Some(1.0),
        ..ActivityInput::default()
    }
}
