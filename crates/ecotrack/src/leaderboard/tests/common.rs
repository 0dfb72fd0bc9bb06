use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::footprint::domain::{
    ActivityInput, CalculationMethod, Company, CompanyId, Employee, EmployeeId, FootprintId,
    FootprintRecord, NewFootprintRecord,
};
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, PeriodRecord, RepositoryError,
};
use crate::leaderboard::service::LeaderboardService;

/// In-memory backing store for the analytics tests.
#[derive(Default)]
pub(super) struct MemoryStore {
    pub records: Mutex<Vec<FootprintRecord>>,
    pub employees: Mutex<HashMap<EmployeeId, Employee>>,
    pub companies: Mutex<HashMap<CompanyId, Company>>,
    next_id: AtomicU64,
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
        Ok(self
            .employees
            .lock()
            .unwrap()
            .values()
            .filter(|employee| employee.company_id == company_id)
            .cloned()
            .collect())
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.employees.lock().unwrap().insert(employee.id, employee);
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
        self.companies.lock().unwrap().insert(company.id, company);
        Ok(())
    }
}

pub(super) type TestService = LeaderboardService<MemoryStore, MemoryStore, MemoryStore>;

pub(super) fn build_service(
    employees: impl IntoIterator<Item = Employee>,
    companies: impl IntoIterator<Item = Company>,
) -> (Arc<MemoryStore>, TestService) {
    let store = Arc::new(MemoryStore::default());
    {
        let mut map = store.employees.lock().unwrap();
        for employee in employees {
            map.insert(employee.id, employee);
        }
    }
    {
        let mut map = store.companies.lock().unwrap();
        for company in companies {
            map.insert(company.id, company);
        }
    }
    let service = LeaderboardService::new(store.clone(), store.clone(), store.clone());
    (store, service)
}

pub(super) fn employee(id: u64, code: &str, company: u64, department: Option<&str>) -> Employee {
    Employee {
        id: EmployeeId(id),
        employee_code: code.to_string(),
        name: format!("Employee {code}"),
        email: format!("{}@example.test", code.to_lowercase()),
        department: department.map(str::to_string),
        position: None,
        is_admin: false,
        company_id: CompanyId(company),
        created_at: at(2025, 1, 1, 0),
    }
}

pub(super) fn company(id: u64, name: &str) -> Company {
    Company {
        id: CompanyId(id),
        name: name.to_string(),
        industry: Some("Technology".to_string()),
    }
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Inserts a record with the period taken from `calculated_at`.
pub(super) fn record(
    store: &MemoryStore,
    employee_id: u64,
    total: f64,
    calculated_at: DateTime<Utc>,
) -> FootprintRecord {
    record_with_activity(store, employee_id, total, calculated_at, ActivityInput::default())
}

pub(super) fn record_with_activity(
    store: &MemoryStore,
    employee_id: u64,
    total: f64,
    calculated_at: DateTime<Utc>,
    activity: ActivityInput,
) -> FootprintRecord {
    use chrono::Datelike;
    FootprintRepository::insert(
        store,
        NewFootprintRecord {
            employee_id: EmployeeId(employee_id),
            activity,
            total,
            travel: 0.0,
            energy: 0.0,
            waste: 0.0,
            diet: 0.0,
            method: CalculationMethod::Fallback,
            month: calculated_at.month(),
            year: calculated_at.year(),
            calculated_at,
        },
    )
    .expect("insert succeeds")
}
