//! Rankings, trends, achievements, and performance comparison, all derived
//! on the read path from the footprint store. Lower footprints always rank
//! higher.

pub(crate) mod achievements;
pub(crate) mod rankings;
pub(crate) mod trends;

pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use router::leaderboard_router;
pub use service::{
    ComparisonQuery, CompanyRankingQuery, LeaderboardError, LeaderboardQuery, LeaderboardService,
    TrendQuery,
};
pub use views::{
    Achievement, ChangeDirection, CompanyRanking, DepartmentRanking, EmployeeFigures,
    LeaderboardEntry, MonthlyTrend, PerformanceComparison, PerformanceStatus, RankSummary,
    TopPerformer, Trend,
};
