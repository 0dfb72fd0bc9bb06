//! Pure pieces of the trend and comparison analytics.

use super::views::{ChangeDirection, PerformanceStatus};

pub(crate) const DEFAULT_TREND_MONTHS: u32 = 6;

/// Percent change of a monthly average against the month before it, with
/// the direction bucket. Stays at zero when there is no prior data or the
/// prior average is zero.
pub(crate) fn month_over_month(average: f64, previous: Option<f64>) -> (i64, ChangeDirection) {
    let Some(previous) = previous else {
        return (0, ChangeDirection::Stable);
    };
    if previous == 0.0 {
        return (0, ChangeDirection::Stable);
    }

    let change = (average - previous) / previous * 100.0;
    let direction = if change < -5.0 {
        ChangeDirection::Down
    } else if change > 5.0 {
        ChangeDirection::Up
    } else {
        ChangeDirection::Stable
    };
    (change.round() as i64, direction)
}

/// Non-strict percentile over the ascending-sorted company totals: the
/// position of the first value not below the employee's, as a percentage of
/// the field. Ties land on the first matching index, so a shared lowest
/// value reads as the 0th percentile. Lower is better.
pub(crate) fn percentile(sorted_totals: &[f64], employee_total: f64) -> i64 {
    if sorted_totals.is_empty() {
        return 0;
    }
    let position = sorted_totals
        .iter()
        .position(|total| *total >= employee_total)
        .unwrap_or(sorted_totals.len());
    ((position as f64 / sorted_totals.len() as f64) * 100.0).round() as i64
}

/// Percent distance from the company average, rounded. Zero when the
/// average itself is zero.
pub(crate) fn comparison_to_average(employee_total: f64, company_average: f64) -> i64 {
    if company_average == 0.0 {
        return 0;
    }
    ((employee_total - company_average) / company_average * 100.0).round() as i64
}

/// Status bands around the company average, mirroring the 10% trend bands.
pub(crate) fn performance_status(employee_total: f64, company_average: f64) -> PerformanceStatus {
    if employee_total < company_average * 0.9 {
        PerformanceStatus::Excellent
    } else if employee_total < company_average {
        PerformanceStatus::Good
    } else if employee_total < company_average * 1.1 {
        PerformanceStatus::Average
    } else {
        PerformanceStatus::NeedsImprovement
    }
}

/// Average of a non-empty slice; `None` when empty.
pub(crate) fn average(totals: &[f64]) -> Option<f64> {
    if totals.is_empty() {
        return None;
    }
    Some(totals.iter().sum::<f64>() / totals.len() as f64)
}
