//! Maintenance window handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{AnalyzeRequest, OptimalWindowsRequest, SafetyCheckRecord};
use crate::optimizer::{self, OptimizationResult};

/// Compute optimal windows from stored safety checks
pub async fn optimal_windows(
    State(state): State<AppState>,
    Json(req): Json<OptimalWindowsRequest>,
) -> AppResult<Json<OptimizationResult>> {
    let params = req.to_params(&state.config)?;

    let records = SafetyCheckRecord::fetch_in_range(
        &state.pool,
        params.start_date,
        params.end_date,
        params.clusters.as_deref(),
    )
    .await?;

    tracing::debug!(
        "Fetched {} safety checks for {} .. {}",
        records.len(),
        params.start_date,
        params.end_date
    );

    let result = optimizer::optimize(&params, &records)?;
    log_result(&result);

    Ok(Json(result))
}

/// Compute optimal windows from checks supplied in the request body
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<OptimizationResult>> {
    req.validate()?;
    let params = req.window.to_params(&state.config)?;

    // Same contract as the stored path: only rows inside the range count
    let records: Vec<SafetyCheckRecord> = req
        .checks
        .into_iter()
        .filter(|r| r.check_timestamp >= params.start_date && r.check_timestamp <= params.end_date)
        .collect();

    let result = optimizer::optimize(&params, &records)?;
    log_result(&result);

    Ok(Json(result))
}

/// List clusters that have reported safety checks
pub async fn list_clusters(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<String>>> {
    let clusters = SafetyCheckRecord::list_clusters(&state.pool).await?;
    Ok(Json(clusters))
}

fn log_result(result: &OptimizationResult) {
    tracing::info!(
        windows = result.optimal_windows.len(),
        clusters = result.cluster_statistics.len(),
        "Maintenance window analysis complete"
    );
}
