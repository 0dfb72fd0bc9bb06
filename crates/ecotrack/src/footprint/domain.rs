use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key for an employee row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

/// Surrogate key for a company row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub u64);

/// Surrogate key for a footprint calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FootprintId(pub u64);

/// Average annual CO2 absorption of a single tree, in kilograms.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 411.4;

/// Trees required to offset a footprint. Always derived, never stored.
pub fn trees_needed(total_kg: f64) -> i64 {
    (total_kg / TREE_ABSORPTION_KG_PER_YEAR).round() as i64
}

/// Company that owns a set of employees. Read-mostly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub industry: Option<String>,
}

/// Employee profile. `employee_code` is the human-facing badge number,
/// distinct from the surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_admin: bool,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            employee_code: self.employee_code.clone(),
            name: self.name.clone(),
            department: self.department.clone(),
        }
    }
}

/// The slice of an employee joined onto footprint query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: EmployeeId,
    pub employee_code: String,
    pub name: String,
    pub department: Option<String>,
}

/// Raw monthly activity report. Every field is optional; the estimator
/// substitutes defaults for whatever the employee left blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityInput {
    // Personal
    pub body_type: Option<String>,
    pub sex: Option<String>,
    pub diet: Option<String>,
    pub shower_frequency: Option<String>,
    pub social_activity: Option<String>,
    // Travel
    pub transport: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_km: Option<f64>,
    pub air_travel: Option<String>,
    // Waste
    pub waste_bag_size: Option<String>,
    pub waste_bag_count: Option<f64>,
    pub recycle_paper: Option<bool>,
    pub recycle_plastic: Option<bool>,
    pub recycle_glass: Option<bool>,
    pub recycle_metal: Option<bool>,
    // Energy
    pub heating_energy: Option<String>,
    pub cooking_microwave: Option<bool>,
    pub cooking_oven: Option<bool>,
    pub cooking_grill: Option<bool>,
    pub cooking_airfryer: Option<bool>,
    pub cooking_stove: Option<bool>,
    pub energy_efficiency: Option<String>,
    pub daily_tv_pc: Option<f64>,
    pub internet_daily: Option<f64>,
    // Consumption
    pub grocery_bill: Option<f64>,
    pub clothes_monthly: Option<f64>,
}

impl ActivityInput {
    pub fn recycles_everything(&self) -> bool {
        self.recycle_paper.unwrap_or(false)
            && self.recycle_plastic.unwrap_or(false)
            && self.recycle_glass.unwrap_or(false)
            && self.recycle_metal.unwrap_or(false)
    }
}

/// Which scoring path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Ml,
    Fallback,
}

impl CalculationMethod {
    pub const fn label(self) -> &'static str {
        match self {
            CalculationMethod::Ml => "ml",
            CalculationMethod::Fallback => "fallback",
        }
    }
}

/// One persisted footprint calculation. Immutable once created; only
/// deletion is allowed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub id: FootprintId,
    pub employee_id: EmployeeId,
    pub activity: ActivityInput,
    pub total: f64,
    pub travel: f64,
    pub energy: f64,
    pub waste: f64,
    pub diet: f64,
    pub method: CalculationMethod,
    /// Calendar month 1-12, captured from the server clock at creation.
    pub month: u32,
    pub year: i32,
    pub calculated_at: DateTime<Utc>,
}

/// Insert payload; the repository assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFootprintRecord {
    pub employee_id: EmployeeId,
    pub activity: ActivityInput,
    pub total: f64,
    pub travel: f64,
    pub energy: f64,
    pub waste: f64,
    pub diet: f64,
    pub method: CalculationMethod,
    pub month: u32,
    pub year: i32,
    pub calculated_at: DateTime<Utc>,
}
