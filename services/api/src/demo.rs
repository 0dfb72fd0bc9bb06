use std::sync::Arc;

use chrono::{Months, Utc};
use clap::Args;

use ecotrack::error::AppError;
use ecotrack::footprint::{ActivityInput, CompanyId, EmployeeId, FootprintService};
use ecotrack::identity::Identity;
use ecotrack::leaderboard::{ComparisonQuery, LeaderboardQuery, LeaderboardService, TrendQuery};

use crate::infra::{seed_directory, InMemoryStore, OfflinePredictor};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// How many months of history to fabricate per employee
    #[arg(long, default_value_t = 3)]
    pub(crate) months: u32,
}

/// Seeds the in-memory store, pushes submissions through the scoring
/// service (fallback path, no ML service required), and prints the
/// analytics a browser client would render.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryStore::default());
    seed_directory(&store);

    let footprints = FootprintService::new(store.clone(), OfflinePredictor);
    let analytics = LeaderboardService::new(store.clone(), store.clone(), store.clone());

    println!("Carbon footprint tracking demo");
    println!("Seeded Evergreen Logistics with 4 employees\n");

    let months = args.months.max(1);
    let now = Utc::now();

    // Employee 2 trims their car use every month; the others stay put.
    for back in (0..months).rev() {
        let when = now
            .checked_sub_months(Months::new(back))
            .unwrap_or(now);
        let steps_taken = months - 1 - back;

        submit(&footprints, 2, commuter_input(2000.0 / f64::from(steps_taken + 1)), when).await?;
        submit(&footprints, 3, commuter_input(1200.0), when).await?;
        submit(&footprints, 4, green_input(), when).await?;
    }

    let today = now.date_naive();

    println!("Leaderboard (current month, lowest first):");
    let entries = analytics
        .employee_leaderboard(CompanyId(1), &LeaderboardQuery::default(), today)
        .map_err(demo_error)?;
    for entry in &entries {
        let badge = entry.badge.map(|b| format!(" [{b}]")).unwrap_or_default();
        println!(
            "  #{} {} ({}) - {} kg CO2, {} trees, {}{}",
            entry.rank,
            entry.name,
            entry.department.as_deref().unwrap_or("Unassigned"),
            entry.total_footprint,
            entry.trees_needed,
            entry.trend.label(),
            badge
        );
    }

    println!("\nMonthly trend (company average):");
    let trends = analytics
        .monthly_trends(CompanyId(1), &TrendQuery::default(), today)
        .map_err(demo_error)?;
    for trend in &trends {
        println!(
            "  {:>4}-{:02}: {} kg avg over {} calculations ({:+}%)",
            trend.year, trend.month, trend.average_footprint, trend.total_calculations, trend.change
        );
    }

    println!("\nAchievements for Sam Ortiz:");
    for achievement in analytics.achievements(EmployeeId(2)).map_err(demo_error)? {
        println!("  {} {} - {}", achievement.icon, achievement.name, achievement.description);
    }

    println!("\nHow Sam compares to the company:");
    let comparison = analytics
        .compare_performance(EmployeeId(2), CompanyId(1), &ComparisonQuery::default(), today)
        .map_err(demo_error)?;
    println!(
        "  {} kg vs {} kg company average ({:+}%), percentile {}, status {:?}",
        comparison.employee.footprint,
        comparison.company_average,
        comparison.comparison_to_average,
        comparison.percentile,
        comparison.status
    );

    Ok(())
}

async fn submit(
    service: &FootprintService<InMemoryStore, OfflinePredictor>,
    employee_id: u64,
    input: ActivityInput,
    when: chrono::DateTime<Utc>,
) -> Result<(), AppError> {
    let identity = Identity {
        employee_id: EmployeeId(employee_id),
        company_id: CompanyId(1),
        is_admin: false,
    };
    service
        .submit(input, &identity, when)
        .await
        .map_err(demo_error)?;
    Ok(())
}

fn demo_error(err: impl std::fmt::Display) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}

fn commuter_input(vehicle_km: f64) -> ActivityInput {
    ActivityInput {
        diet: Some("omnivore".to_string()),
        transport: Some("private".to_string()),
        vehicle_km: Some(vehicle_km),
        air_travel: Some("rarely".to_string()),
        waste_bag_count: Some(3.0),
        daily_tv_pc: Some(4.0),
        internet_daily: Some(6.0),
        grocery_bill: Some(300.0),
        ..ActivityInput::default()
    }
}

fn green_input() -> ActivityInput {
    ActivityInput {
        diet: Some("vegan".to_string()),
        transport: Some("walk/bicycle".to_string()),
        recycle_paper: Some(true),
        recycle_plastic: Some(true),
        recycle_glass: Some(true),
        recycle_metal: Some(true),
        waste_bag_count: Some(1.0),
        daily_tv_pc: Some(1.0),
        internet_daily: Some(2.0),
        ..ActivityInput::default()
    }
}
