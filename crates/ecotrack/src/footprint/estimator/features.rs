use serde::Serialize;

use crate::footprint::domain::ActivityInput;

/// Normalized feature vector sent to the prediction service. Field names
/// match the wire contract exactly; every absent input is substituted with
/// the model's training default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFeatures {
    // Personal
    pub body_type: String,
    pub sex: String,
    pub diet: String,
    pub shower_frequency: String,
    pub social_activity: String,
    // Travel
    pub transport: String,
    pub vehicle_type: String,
    pub vehicle_km: f64,
    pub air_travel: String,
    // Waste
    pub waste_bag_size: String,
    pub waste_bag_count: f64,
    pub recycle_paper: bool,
    pub recycle_plastic: bool,
    pub recycle_glass: bool,
    pub recycle_metal: bool,
    // Energy
    pub heating_energy: String,
    pub cooking_microwave: bool,
    pub cooking_oven: bool,
    pub cooking_grill: bool,
    pub cooking_airfryer: bool,
    pub cooking_stove: bool,
    pub energy_efficiency: String,
    pub daily_tv_pc: f64,
    pub internet_daily: f64,
    // Consumption
    pub grocery_bill: f64,
    pub clothes_monthly: f64,
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

impl From<&ActivityInput> for PredictionFeatures {
    fn from(input: &ActivityInput) -> Self {
        Self {
            body_type: or_default(&input.body_type, "average"),
            sex: or_default(&input.sex, "male"),
            diet: or_default(&input.diet, "omnivore"),
            shower_frequency: or_default(&input.shower_frequency, "daily"),
            social_activity: or_default(&input.social_activity, "often"),
            transport: or_default(&input.transport, "private"),
            vehicle_type: or_default(&input.vehicle_type, "petrol"),
            vehicle_km: input.vehicle_km.unwrap_or(0.0),
            air_travel: or_default(&input.air_travel, "never"),
            waste_bag_size: or_default(&input.waste_bag_size, "medium"),
            waste_bag_count: input.waste_bag_count.unwrap_or(0.0),
            recycle_paper: input.recycle_paper.unwrap_or(false),
            recycle_plastic: input.recycle_plastic.unwrap_or(false),
            recycle_glass: input.recycle_glass.unwrap_or(false),
            recycle_metal: input.recycle_metal.unwrap_or(false),
            heating_energy: or_default(&input.heating_energy, "natural gas"),
            cooking_microwave: input.cooking_microwave.unwrap_or(false),
            cooking_oven: input.cooking_oven.unwrap_or(false),
            cooking_grill: input.cooking_grill.unwrap_or(false),
            cooking_airfryer: input.cooking_airfryer.unwrap_or(false),
            cooking_stove: input.cooking_stove.unwrap_or(false),
            energy_efficiency: or_default(&input.energy_efficiency, "sometimes"),
            daily_tv_pc: input.daily_tv_pc.unwrap_or(0.0),
            internet_daily: input.internet_daily.unwrap_or(0.0),
            grocery_bill: input.grocery_bill.unwrap_or(0.0),
            clothes_monthly: input.clothes_monthly.unwrap_or(0.0),
        }
    }
}
