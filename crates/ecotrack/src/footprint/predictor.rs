use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MlConfig;

use super::estimator::PredictionFeatures;

/// Category breakdown returned by the prediction service, in kg CO2e.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionBreakdown {
    pub total_footprint: f64,
    pub travel_footprint: f64,
    pub energy_footprint: f64,
    pub waste_footprint: f64,
    pub diet_footprint: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictorHealth {
    pub status: String,
    pub model_loaded: bool,
}

impl PredictorHealth {
    pub fn is_available(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}

/// Failures talking to the prediction service. Callers recover locally via
/// the fallback estimator; none of these ever reach a request boundary.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("prediction service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("prediction service reported itself unavailable")]
    Unhealthy,
}

/// Outbound seam to the prediction capability.
#[async_trait]
pub trait FootprintPredictor: Send + Sync {
    /// Cheap availability probe; failures report `false`, never an error.
    async fn is_available(&self) -> bool;
    async fn predict(&self, features: &PredictionFeatures)
        -> Result<PredictionBreakdown, PredictorError>;
}

/// HTTP client for the external ML service: `GET /health` gated by a short
/// deadline, `POST /predict` by a longer one.
pub struct HttpPredictor {
    client: reqwest::Client,
    base_url: String,
    health_timeout: std::time::Duration,
    predict_timeout: std::time::Duration,
}

impl HttpPredictor {
    pub fn new(config: &MlConfig) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            health_timeout: config.health_timeout,
            predict_timeout: config.predict_timeout,
        })
    }

    async fn health(&self) -> Result<PredictorHealth, PredictorError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PredictorError::Status(response.status()));
        }

        Ok(response.json::<PredictorHealth>().await?)
    }
}

#[async_trait]
impl FootprintPredictor for HttpPredictor {
    async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(health) if health.is_available() => true,
            Ok(health) => {
                debug!(status = %health.status, model_loaded = health.model_loaded,
                    "prediction service not ready");
                false
            }
            Err(err) => {
                warn!(error = %err, "prediction service health check failed");
                false
            }
        }
    }

    async fn predict(
        &self,
        features: &PredictionFeatures,
    ) -> Result<PredictionBreakdown, PredictorError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .timeout(self.predict_timeout)
            .json(features)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PredictorError::Status(response.status()));
        }

        Ok(response.json::<PredictionBreakdown>().await?)
    }
}
