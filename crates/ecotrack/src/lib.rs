//! Carbon footprint tracking for company sustainability programs.
//!
//! Employees submit monthly activity data; the estimator scores it in kg
//! CO2-equivalent (through the prediction service when healthy, through the
//! deterministic fallback otherwise), records land in a repository, and the
//! leaderboard layer derives rankings, trends, comparisons, and achievements
//! on demand.

pub mod config;
pub mod directory;
pub mod error;
pub mod footprint;
pub mod identity;
pub mod leaderboard;
pub mod telemetry;
