//! Serializable shapes returned by the ranking and analytics endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::footprint::domain::CompanyId;

/// Month-over-month movement of a single employee's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

impl Trend {
    pub const fn label(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Worsening => "worsening",
            Trend::Stable => "stable",
        }
    }
}

/// Movement of a company-wide monthly average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Up,
    Down,
    Stable,
}

/// One row of the employee leaderboard; rank 1 is the lowest footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub employee_code: String,
    pub name: String,
    pub department: Option<String>,
    pub total_footprint: i64,
    pub trees_needed: i64,
    pub calculation_count: usize,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
}

/// Lowest-footprint employee within a department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub name: String,
    pub footprint: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRanking {
    pub rank: usize,
    pub department: String,
    pub employee_count: usize,
    pub average_footprint: i64,
    pub total_footprint: i64,
    pub trees_needed: i64,
    pub top_performer: TopPerformer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRanking {
    pub rank: usize,
    pub company_id: CompanyId,
    pub company_name: String,
    pub industry: Option<String>,
    pub employee_count: usize,
    pub average_footprint: i64,
    pub total_footprint: i64,
}

/// Company average for one calendar month, with the percent change against
/// the month before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub month: u32,
    pub year: i32,
    pub average_footprint: i64,
    pub total_calculations: usize,
    pub change: i64,
    pub change_direction: ChangeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeFigures {
    pub footprint: i64,
    pub trees_needed: i64,
}

/// How one employee's period footprint sits against company and department
/// averages. Lower percentile is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceComparison {
    pub employee: EmployeeFigures,
    pub company_average: i64,
    pub department_average: Option<i64>,
    pub percentile: i64,
    pub comparison_to_average: i64,
    pub status: PerformanceStatus,
}

/// The caller's own leaderboard entry plus the size of the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub total_participants: usize,
}
