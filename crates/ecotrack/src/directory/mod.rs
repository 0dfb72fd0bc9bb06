//! Employee and company directory: rosters, profiles with calculation
//! history, partial updates, and per-employee statistics.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::directory_router;
pub use service::{
    CompanyUpdate, DirectoryService, DirectoryServiceError, EmployeeProfile, EmployeeStatistics,
    EmployeeUpdate, HistoryEntry, HistoryTrend,
};
