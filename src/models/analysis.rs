//! Maintenance analysis request models

use serde::Deserialize;
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::optimizer::{MissingTelemetryPolicy, OptimizerParams};
use super::SafetyCheckRecord;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OptimalWindowsRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 1, max = 720))]
    pub min_window_duration_hours: Option<i64>,
    #[validate(length(max = 500))]
    pub clusters: Option<Vec<String>>,
    #[serde(default)]
    pub missing_telemetry: MissingTelemetryPolicy,
}

/// What-if analysis over caller-supplied checks instead of stored ones.
///
/// `validate()` covers `checks` only; `window` is validated by `to_params`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub window: OptimalWindowsRequest,
    #[validate(length(max = 100000))]
    pub checks: Vec<SafetyCheckRecord>,
}

impl OptimalWindowsRequest {
    /// Validate against `config` limits and build optimizer parameters.
    pub fn to_params(&self, config: &Config) -> AppResult<OptimizerParams> {
        self.validate()?;

        if self.end_date < self.start_date {
            return Err(AppError::ValidationError(
                "end_date must not be before start_date".to_string(),
            ));
        }

        let days = (self.end_date - self.start_date).num_days();
        if days > config.max_analysis_days {
            return Err(AppError::ValidationError(format!(
                "analysis range of {} days exceeds the limit of {} days",
                days, config.max_analysis_days
            )));
        }

        let mut params = OptimizerParams::new(self.start_date, self.end_date)
            .with_min_window_hours(
                self.min_window_duration_hours
                    .unwrap_or(config.default_min_window_hours),
            )
            .with_missing_telemetry(self.missing_telemetry);

        if let Some(clusters) = self.clusters.as_ref().filter(|c| !c.is_empty()) {
            params = params.with_clusters(clusters.clone());
        }

        Ok(params)
    }
}
