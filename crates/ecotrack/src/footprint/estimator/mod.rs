mod fallback;
mod features;

pub use features::PredictionFeatures;

use tracing::warn;

use super::domain::{ActivityInput, CalculationMethod};
use super::predictor::FootprintPredictor;

/// Scored footprint with its four-way category breakdown, all values
/// rounded to whole kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintEstimate {
    pub total: f64,
    pub travel: f64,
    pub energy: f64,
    pub waste: f64,
    pub diet: f64,
    pub method: CalculationMethod,
}

/// Scores activity input through the prediction service when it is healthy
/// and through the deterministic fallback otherwise. Estimation never
/// fails: every predictor error degrades to the fallback within the same
/// call.
pub struct FootprintEstimator<P> {
    predictor: P,
}

impl<P: FootprintPredictor> FootprintEstimator<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub async fn estimate(&self, input: &ActivityInput) -> FootprintEstimate {
        if self.predictor.is_available().await {
            let features = PredictionFeatures::from(input);
            match self.predictor.predict(&features).await {
                Ok(breakdown) => {
                    return FootprintEstimate {
                        total: breakdown.total_footprint.round().max(0.0),
                        travel: breakdown.travel_footprint.round(),
                        energy: breakdown.energy_footprint.round(),
                        waste: breakdown.waste_footprint.round(),
                        diet: breakdown.diet_footprint.round(),
                        method: CalculationMethod::Ml,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "prediction failed, degrading to fallback estimate");
                }
            }
        }

        fallback::estimate(input)
    }
}
