//! Maintenance Window Optimizer
//!
//! Turns historical per-cluster safety checks into ranked maintenance windows
//! during which every tracked cluster was safe to touch.
//!
//! # Architecture
//! - `aggregate.rs`: last-observation-wins status per (UTC day, cluster)
//! - `classify.rs`: tri-state cluster verdicts, global safe-day decision
//! - `merge.rs`: fold over the day sequence into contiguous windows
//! - `rank.rs`: confidence tiers and top-N ordering
//! - `stats.rs`: per-cluster uptime and best weekdays (raw rows)
//! - `recommend.rs`: advisory messages
//!
//! Pure and synchronous: no I/O, no logging, no shared state.

pub mod types;
pub mod aggregate;
pub mod classify;
pub mod merge;
pub mod rank;
pub mod stats;
pub mod recommend;
#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use crate::models::SafetyCheckRecord;

pub use types::{
    ClusterDayState, ClusterStatistics, Confidence, DailyStatus, DaySummary,
    MissingTelemetryPolicy, OptimalWindow, OptimizationResult, OptimizerError,
    OptimizerParams, DEFAULT_MIN_WINDOW_HOURS, MAX_RANKED_WINDOWS,
};

/// Run the full pipeline over an already-fetched row set.
///
/// Fails fast on a malformed row; no partial result is produced.
pub fn optimize(
    params: &OptimizerParams,
    records: &[SafetyCheckRecord],
) -> Result<OptimizationResult, OptimizerError> {
    let allow_list = params.allow_list();
    let relevant: Vec<&SafetyCheckRecord> = records
        .iter()
        .filter(|r| allow_list.as_ref().map_or(true, |a| a.contains(r.cluster_id.as_str())))
        .collect();

    // Rows outside the allow-list are ignored entirely, malformed or not
    aggregate::validate_records(relevant.iter().copied())?;

    if relevant.is_empty() {
        return Ok(OptimizationResult {
            optimal_windows: Vec::new(),
            cluster_statistics: BTreeMap::new(),
            recommendations: vec![recommend::NO_DATA_MESSAGE.to_string()],
        });
    }

    let clusters: BTreeSet<String> = match &allow_list {
        Some(allowed) => allowed.iter().map(|c| c.to_string()).collect(),
        None => relevant.iter().map(|r| r.cluster_id.clone()).collect(),
    };

    let daily = aggregate::aggregate_daily(relevant.iter().copied());
    let days = classify::summarize_days(
        &daily,
        &clusters,
        params.start_date.date_naive(),
        params.end_date.date_naive(),
        params.missing_telemetry,
    );

    let windows: Vec<OptimalWindow> = merge::merge_windows(&days, params.min_window_duration_hours)
        .into_iter()
        .map(|candidate| rank::label_window(candidate, &clusters))
        .collect();
    let optimal_windows = rank::rank_windows(windows);

    let cluster_statistics = stats::cluster_statistics(relevant.iter().copied(), &clusters);
    let recommendations = recommend::generate_recommendations(&optimal_windows);

    Ok(OptimizationResult {
        optimal_windows,
        cluster_statistics,
        recommendations,
    })
}
