//! Pure ranking rules. Everything here operates on already-fetched rows so
//! the rules stay independent of storage and the clock.

use std::collections::{BTreeMap, HashMap};

use crate::footprint::domain::{trees_needed, Company, EmployeeId};
use crate::footprint::repository::PeriodRecord;

use super::views::{
    CompanyRanking, DepartmentRanking, LeaderboardEntry, TopPerformer, Trend,
};

pub(crate) const DEFAULT_LIMIT: usize = 10;
pub(crate) const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// Calendar month immediately before the given one.
pub(crate) fn previous_month(month: u32, year: i32) -> (u32, i32) {
    months_back(month, year, 1)
}

/// Walks `back` calendar months into the past, crossing year boundaries.
pub(crate) fn months_back(month: u32, year: i32, back: i64) -> (u32, i32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 - back;
    ((index.rem_euclid(12) + 1) as u32, index.div_euclid(12) as i32)
}

/// A footprint counts as moving only when it leaves a 10% band around the
/// previous month's value. No prior record reads as stable.
pub(crate) fn classify_trend(current: f64, previous: Option<f64>) -> Trend {
    match previous {
        Some(previous) if current < previous * 0.9 => Trend::Improving,
        Some(previous) if current > previous * 1.1 => Trend::Worsening,
        _ => Trend::Stable,
    }
}

/// First matching badge wins, so a rank-1 entry under 500 kg is still the
/// Champion rather than Elite.
pub(crate) fn badge_for(rank: usize, total: f64) -> Option<&'static str> {
    if rank == 1 {
        Some("Champion")
    } else if rank == 2 {
        Some("Runner-up")
    } else if rank == 3 {
        Some("Third Place")
    } else if total < 500.0 {
        Some("Elite")
    } else if total < 1000.0 {
        Some("Outstanding")
    } else if rank <= 10 {
        Some("Top 10")
    } else {
        None
    }
}

/// Ranks rows that are already sorted ascending by total. `previous` maps
/// each employee to their prior-month total for the trend classification.
pub(crate) fn rank_entries(
    rows: &[PeriodRecord],
    previous: &HashMap<EmployeeId, f64>,
) -> Vec<LeaderboardEntry> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let rank = index + 1;
            LeaderboardEntry {
                rank,
                employee_code: row.employee.employee_code.clone(),
                name: row.employee.name.clone(),
                department: row.employee.department.clone(),
                total_footprint: row.record.total.round() as i64,
                trees_needed: trees_needed(row.record.total),
                calculation_count: 1,
                trend: classify_trend(
                    row.record.total,
                    previous.get(&row.record.employee_id).copied(),
                ),
                badge: badge_for(rank, row.record.total),
            }
        })
        .collect()
}

/// Collapses the rows to each employee's most recent record of the period,
/// re-sorted ascending by total.
pub(crate) fn dedupe_latest(rows: Vec<PeriodRecord>) -> Vec<PeriodRecord> {
    let mut latest: HashMap<EmployeeId, PeriodRecord> = HashMap::new();
    for row in rows {
        match latest.get(&row.record.employee_id) {
            Some(kept) if kept.record.calculated_at >= row.record.calculated_at => {}
            _ => {
                latest.insert(row.record.employee_id, row);
            }
        }
    }
    let mut rows: Vec<_> = latest.into_values().collect();
    rows.sort_by(|a, b| a.record.total.total_cmp(&b.record.total));
    rows
}

struct DepartmentBucket {
    totals: Vec<f64>,
    employees: std::collections::HashSet<String>,
    top_performer: TopPerformer,
    best_total: f64,
}

/// Groups period rows by department and ranks the groups by rounded average,
/// lowest first.
pub(crate) fn department_rankings(rows: &[PeriodRecord]) -> Vec<DepartmentRanking> {
    let mut buckets: BTreeMap<String, DepartmentBucket> = BTreeMap::new();

    for row in rows {
        let department = row
            .employee
            .department
            .clone()
            .unwrap_or_else(|| UNASSIGNED_DEPARTMENT.to_string());
        let bucket = buckets
            .entry(department)
            .or_insert_with(|| DepartmentBucket {
                totals: Vec::new(),
                employees: std::collections::HashSet::new(),
                top_performer: TopPerformer {
                    name: row.employee.name.clone(),
                    footprint: row.record.total.round() as i64,
                },
                best_total: row.record.total,
            });
        bucket.totals.push(row.record.total);
        bucket.employees.insert(row.employee.name.clone());
        if row.record.total < bucket.best_total {
            bucket.best_total = row.record.total;
            bucket.top_performer = TopPerformer {
                name: row.employee.name.clone(),
                footprint: row.record.total.round() as i64,
            };
        }
    }

    let mut rankings: Vec<DepartmentRanking> = buckets
        .into_iter()
        .map(|(department, bucket)| {
            let total: f64 = bucket.totals.iter().sum();
            let average = total / bucket.totals.len() as f64;
            DepartmentRanking {
                rank: 0,
                department,
                employee_count: bucket.employees.len(),
                average_footprint: average.round() as i64,
                total_footprint: total.round() as i64,
                trees_needed: trees_needed(total),
                top_performer: bucket.top_performer,
            }
        })
        .collect();

    rankings.sort_by_key(|ranking| ranking.average_footprint);
    for (index, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = index + 1;
    }
    rankings
}

/// Ranks companies by their rounded current-month average. Companies with
/// no records in the period are excluded entirely.
pub(crate) fn company_rankings(
    data: impl IntoIterator<Item = (Company, usize, Vec<f64>)>,
) -> Vec<CompanyRanking> {
    let mut rankings: Vec<CompanyRanking> = data
        .into_iter()
        .filter(|(_, _, totals)| !totals.is_empty())
        .map(|(company, employee_count, totals)| {
            let total: f64 = totals.iter().sum();
            let average = total / totals.len() as f64;
            CompanyRanking {
                rank: 0,
                company_id: company.id,
                company_name: company.name,
                industry: company.industry,
                employee_count,
                average_footprint: average.round() as i64,
                total_footprint: total.round() as i64,
            }
        })
        .collect();

    rankings.sort_by_key(|ranking| ranking.average_footprint);
    for (index, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = index + 1;
    }
    rankings
}
