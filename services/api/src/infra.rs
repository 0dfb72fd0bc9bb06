use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use ecotrack::footprint::{
    Company, CompanyId, CompanyRepository, Employee, EmployeeId, EmployeeRepository, FootprintId,
    FootprintRecord, FootprintRepository, NewFootprintRecord, PeriodRecord, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single in-memory store backing every repository trait the services need.
/// One `Arc` serves the footprint, directory, and analytics layers alike.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    records: Mutex<Vec<FootprintRecord>>,
    employees: Mutex<HashMap<EmployeeId, Employee>>,
    companies: Mutex<HashMap<CompanyId, Company>>,
    next_footprint_id: AtomicU64,
}

impl InMemoryStore {
    pub(crate) fn insert_company(&self, company: Company) {
        self.companies
            .lock()
            .expect("store mutex poisoned")
            .insert(company.id, company);
    }

    pub(crate) fn insert_employee(&self, employee: Employee) {
        self.employees
            .lock()
            .expect("store mutex poisoned")
            .insert(employee.id, employee);
    }
}

impl FootprintRepository for InMemoryStore {
    fn insert(&self, record: NewFootprintRecord) -> Result<FootprintRecord, RepositoryError> {
        let id = FootprintId(self.next_footprint_id.fetch_add(1, Ordering::SeqCst) + 1);
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
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: FootprintId) -> Result<Option<FootprintRecord>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn by_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut records: Vec<_> = guard
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
        let employees = self.employees.lock().expect("store mutex poisoned");
        let records = self.records.lock().expect("store mutex poisoned");
        let mut rows: Vec<PeriodRecord> = records
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
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl EmployeeRepository for InMemoryStore {
    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let guard = self.employees.lock().expect("store mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn by_company(&self, company_id: CompanyId) -> Result<Vec<Employee>, RepositoryError> {
        let guard = self.employees.lock().expect("store mutex poisoned");
        let mut roster: Vec<_> = guard
            .values()
            .filter(|employee| employee.company_id == company_id)
            .cloned()
            .collect();
        roster.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roster)
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut guard = self.employees.lock().expect("store mutex poisoned");
        if !guard.contains_key(&employee.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(employee.id, employee);
        Ok(())
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut guard = self.employees.lock().expect("store mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

impl CompanyRepository for InMemoryStore {
    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let guard = self.companies.lock().expect("store mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Company>, RepositoryError> {
        let guard = self.companies.lock().expect("store mutex poisoned");
        let mut companies: Vec<_> = guard.values().cloned().collect();
        companies.sort_by_key(|company| company.id);
        companies.truncate(limit);
        Ok(companies)
    }

    fn update(&self, company: Company) -> Result<(), RepositoryError> {
        let mut guard = self.companies.lock().expect("store mutex poisoned");
        if !guard.contains_key(&company.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(company.id, company);
        Ok(())
    }
}

/// Predictor stub that never reports the model as available, so every
/// submission takes the deterministic fallback path. Used by the demo and
/// anywhere the real prediction service is not wired up.
pub(crate) struct OfflinePredictor;

#[async_trait::async_trait]
impl ecotrack::footprint::FootprintPredictor for OfflinePredictor {
    async fn is_available(&self) -> bool {
        false
    }

    async fn predict(
        &self,
        _features: &ecotrack::footprint::PredictionFeatures,
    ) -> Result<ecotrack::footprint::PredictionBreakdown, ecotrack::footprint::PredictorError>
    {
        Err(ecotrack::footprint::PredictorError::Unhealthy)
    }
}

/// Seeds one sample company with a small roster. Employee 1 is the admin.
pub(crate) fn seed_directory(store: &InMemoryStore) {
    store.insert_company(Company {
        id: CompanyId(1),
        name: "Evergreen Logistics".to_string(),
        industry: Some("Transport".to_string()),
    });

    let hired = Utc
        .with_ymd_and_hms(2025, 1, 6, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    for (id, code, name, department) in [
        (1, "EVG-001", "Noor Haddad", "Operations"),
        (2, "EVG-002", "Sam Ortiz", "Operations"),
        (3, "EVG-003", "Priya Nair", "Finance"),
        (4, "EVG-004", "Jonas Berg", "Finance"),
    ] {
        store.insert_employee(Employee {
            id: EmployeeId(id),
            employee_code: code.to_string(),
            name: name.to_string(),
            email: format!("{}@evergreen.example", code.to_lowercase()),
            department: Some(department.to_string()),
            position: None,
            is_admin: id == 1,
            company_id: CompanyId(1),
            created_at: hired + chrono::Duration::days(id as i64),
        });
    }
}
