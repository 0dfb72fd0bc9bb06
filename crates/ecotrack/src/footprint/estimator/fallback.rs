use super::FootprintEstimate;
use crate::footprint::domain::{ActivityInput, CalculationMethod};

const VEHICLE_KG_PER_KM: f64 = 0.2;
const WASTE_KG_PER_BAG: f64 = 10.0;
const RECYCLING_DISCOUNT_PER_MATERIAL: f64 = 5.0;
const TV_PC_KG_PER_HOUR: f64 = 5.0;
const INTERNET_KG_PER_HOUR: f64 = 3.0;
const GROCERY_KG_PER_CURRENCY: f64 = 0.1;
const CLOTHES_KG_PER_ITEM: f64 = 15.0;

/// Deterministic scoring used whenever the prediction service is down.
///
/// Consumption (groceries, clothing) is folded into the total without its
/// own category, so the four category values need not sum to the total.
pub(crate) fn estimate(input: &ActivityInput) -> FootprintEstimate {
    let diet = diet_base(input.diet.as_deref());
    let travel = input.vehicle_km.unwrap_or(0.0) * VEHICLE_KG_PER_KM
        + air_travel_impact(input.air_travel.as_deref());
    let waste = (input.waste_bag_count.unwrap_or(0.0) * WASTE_KG_PER_BAG
        - recycling_discount(input))
    .max(0.0);
    let energy = input.daily_tv_pc.unwrap_or(0.0) * TV_PC_KG_PER_HOUR
        + input.internet_daily.unwrap_or(0.0) * INTERNET_KG_PER_HOUR;
    let consumption = input.grocery_bill.unwrap_or(0.0) * GROCERY_KG_PER_CURRENCY
        + input.clothes_monthly.unwrap_or(0.0) * CLOTHES_KG_PER_ITEM;

    let total = (diet + travel + waste + energy + consumption).max(0.0);

    FootprintEstimate {
        total: total.round(),
        travel: travel.round(),
        energy: energy.round(),
        waste: waste.round(),
        diet: diet.round(),
        method: CalculationMethod::Fallback,
    }
}

/// Diet base contribution. An absent or unrecognized diet string scores 150
/// (the pescatarian value), not the omnivore 250 — long-standing behavior
/// the leaderboard history depends on.
fn diet_base(diet: Option<&str>) -> f64 {
    match diet.map(str::to_ascii_lowercase).as_deref() {
        Some("vegan") => 50.0,
        Some("vegetarian") => 100.0,
        Some("pescatarian") => 150.0,
        Some("omnivore") => 250.0,
        _ => 150.0,
    }
}

fn air_travel_impact(air_travel: Option<&str>) -> f64 {
    match air_travel.map(str::to_ascii_lowercase).as_deref() {
        Some("never") => 0.0,
        Some("rarely") => 100.0,
        Some("frequently") => 300.0,
        Some("very frequently") => 500.0,
        _ => 0.0,
    }
}

fn recycling_discount(input: &ActivityInput) -> f64 {
    let count = [
        input.recycle_paper,
        input.recycle_plastic,
        input.recycle_glass,
        input.recycle_metal,
    ]
    .iter()
    .filter(|flag| flag.unwrap_or(false))
    .count();
    count as f64 * RECYCLING_DISCOUNT_PER_MATERIAL
}
