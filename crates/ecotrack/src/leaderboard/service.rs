use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::footprint::domain::{trees_needed, CompanyId, EmployeeId};
use crate::footprint::repository::{
    CompanyRepository, EmployeeRepository, FootprintRepository, RepositoryError,
};

use super::achievements;
use super::rankings::{self, DEFAULT_LIMIT};
use super::trends::{self, DEFAULT_TREND_MONTHS};
use super::views::{
    Achievement, CompanyRanking, DepartmentRanking, EmployeeFigures, LeaderboardEntry,
    MonthlyTrend, PerformanceComparison, RankSummary,
};

const MY_RANK_SCAN_LIMIT: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("no footprint data for this period")]
    NoData,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Query string for the employee leaderboard and department rankings.
/// Month and year default to the current calendar month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub department: Option<String>,
    /// When set, only each employee's most recent record of the period
    /// competes; the default ranks every record.
    #[serde(default)]
    pub dedupe: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonQuery {
    pub department: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRankingQuery {
    pub limit: Option<usize>,
}

/// Read-side analytics over the footprint store. Rankings and trends are
/// computed per request; nothing here mutates state.
pub struct LeaderboardService<F, E, C> {
    footprints: Arc<F>,
    employees: Arc<E>,
    companies: Arc<C>,
}

impl<F, E, C> LeaderboardService<F, E, C>
where
    F: FootprintRepository + 'static,
    E: EmployeeRepository + 'static,
    C: CompanyRepository + 'static,
{
    pub fn new(footprints: Arc<F>, employees: Arc<E>, companies: Arc<C>) -> Self {
        Self {
            footprints,
            employees,
            companies,
        }
    }

    /// Ranked employees for one period, lowest footprint first.
    pub fn employee_leaderboard(
        &self,
        company_id: CompanyId,
        query: &LeaderboardQuery,
        today: NaiveDate,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let (month, year) = resolve_period(query.month, query.year, today);

        let mut rows = self.footprints.by_company_period(company_id, month, year)?;
        if let Some(department) = &query.department {
            rows.retain(|row| row.employee.department.as_deref() == Some(department.as_str()));
        }
        if query.dedupe {
            rows = rankings::dedupe_latest(rows);
        }
        rows.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let previous = self.previous_totals(company_id, month, year)?;
        Ok(rankings::rank_entries(&rows, &previous))
    }

    pub fn department_rankings(
        &self,
        company_id: CompanyId,
        query: &LeaderboardQuery,
        today: NaiveDate,
    ) -> Result<Vec<DepartmentRanking>, LeaderboardError> {
        let (month, year) = resolve_period(query.month, query.year, today);
        let rows = self.footprints.by_company_period(company_id, month, year)?;
        Ok(rankings::department_rankings(&rows))
    }

    /// Cross-company comparison over the current calendar month. Companies
    /// with no calculations this month are left out.
    pub fn company_rankings(
        &self,
        limit: Option<usize>,
        today: NaiveDate,
    ) -> Result<Vec<CompanyRanking>, LeaderboardError> {
        let (month, year) = (today.month(), today.year());
        let companies = self.companies.list(limit.unwrap_or(DEFAULT_LIMIT))?;

        let mut data = Vec::with_capacity(companies.len());
        for company in companies {
            let totals: Vec<f64> = self
                .footprints
                .by_company_period(company.id, month, year)?
                .into_iter()
                .map(|row| row.record.total)
                .collect();
            let employee_count = self.employees.by_company(company.id)?.len();
            data.push((company, employee_count, totals));
        }

        Ok(rankings::company_rankings(data))
    }

    /// Company-wide monthly averages for the trailing window, oldest first.
    /// Months without any calculation are omitted rather than zero-filled.
    pub fn monthly_trends(
        &self,
        company_id: CompanyId,
        query: &TrendQuery,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyTrend>, LeaderboardError> {
        let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
        let mut result = Vec::new();

        for back in 0..months {
            let (month, year) = rankings::months_back(today.month(), today.year(), i64::from(back));
            let totals = self.period_totals(company_id, month, year)?;
            let Some(average) = trends::average(&totals) else {
                continue;
            };

            let (prev_month, prev_year) = rankings::previous_month(month, year);
            let previous_totals = self.period_totals(company_id, prev_month, prev_year)?;
            let (change, change_direction) =
                trends::month_over_month(average, trends::average(&previous_totals));

            result.push(MonthlyTrend {
                month,
                year,
                average_footprint: average.round() as i64,
                total_calculations: totals.len(),
                change,
                change_direction,
            });
        }

        result.reverse();
        Ok(result)
    }

    /// Positions one employee against the company (and optionally their
    /// department) for a period. `NoData` when the employee has no record
    /// in that period.
    pub fn compare_performance(
        &self,
        employee_id: EmployeeId,
        company_id: CompanyId,
        query: &ComparisonQuery,
        today: NaiveDate,
    ) -> Result<PerformanceComparison, LeaderboardError> {
        let (month, year) = resolve_period(query.month, query.year, today);
        let rows = self.footprints.by_company_period(company_id, month, year)?;

        let employee_total = rows
            .iter()
            .find(|row| row.record.employee_id == employee_id)
            .map(|row| row.record.total)
            .ok_or(LeaderboardError::NoData)?;

        let mut totals: Vec<f64> = rows.iter().map(|row| row.record.total).collect();
        totals.sort_by(f64::total_cmp);
        let company_average =
            trends::average(&totals).ok_or(LeaderboardError::NoData)?;

        let department_average = match &query.department {
            Some(department) => {
                let department_totals: Vec<f64> = rows
                    .iter()
                    .filter(|row| {
                        row.employee.department.as_deref() == Some(department.as_str())
                    })
                    .map(|row| row.record.total)
                    .collect();
                trends::average(&department_totals).map(|avg| avg.round() as i64)
            }
            None => None,
        };

        Ok(PerformanceComparison {
            employee: EmployeeFigures {
                footprint: employee_total.round() as i64,
                trees_needed: trees_needed(employee_total),
            },
            company_average: company_average.round() as i64,
            department_average,
            percentile: trends::percentile(&totals, employee_total),
            comparison_to_average: trends::comparison_to_average(employee_total, company_average),
            status: trends::performance_status(employee_total, company_average),
        })
    }

    /// All achievements the employee's history currently earns.
    pub fn achievements(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Achievement>, LeaderboardError> {
        let history = self.footprints.by_employee(employee_id)?;
        Ok(achievements::evaluate(&history))
    }

    /// The caller's own entry in the current-month leaderboard, or `None`
    /// when they have no calculation yet.
    pub fn my_rank(
        &self,
        employee_id: EmployeeId,
        company_id: CompanyId,
        today: NaiveDate,
    ) -> Result<Option<RankSummary>, LeaderboardError> {
        let Some(employee) = self.employees.fetch(employee_id)? else {
            return Ok(None);
        };

        let query = LeaderboardQuery {
            limit: Some(MY_RANK_SCAN_LIMIT),
            ..LeaderboardQuery::default()
        };
        let leaderboard = self.employee_leaderboard(company_id, &query, today)?;
        let total_participants = leaderboard.len();

        Ok(leaderboard
            .into_iter()
            .find(|entry| entry.employee_code == employee.employee_code)
            .map(|entry| RankSummary {
                entry,
                total_participants,
            }))
    }

    /// Prior-month totals per employee, for trend classification. When an
    /// employee logged several records that month the last row wins.
    fn previous_totals(
        &self,
        company_id: CompanyId,
        month: u32,
        year: i32,
    ) -> Result<HashMap<EmployeeId, f64>, LeaderboardError> {
        let (prev_month, prev_year) = rankings::previous_month(month, year);
        let rows = self
            .footprints
            .by_company_period(company_id, prev_month, prev_year)?;
        Ok(rows
            .into_iter()
            .map(|row| (row.record.employee_id, row.record.total))
            .collect())
    }

    fn period_totals(
        &self,
        company_id: CompanyId,
        month: u32,
        year: i32,
    ) -> Result<Vec<f64>, LeaderboardError> {
        Ok(self
            .footprints
            .by_company_period(company_id, month, year)?
            .into_iter()
            .map(|row| row.record.total)
            .collect())
    }
}

fn resolve_period(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> (u32, i32) {
    (
        month.unwrap_or_else(|| today.month()),
        year.unwrap_or_else(|| today.year()),
    )
}
