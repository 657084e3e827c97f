//! Optimizer input/output types

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SafetyCheckRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const DEFAULT_MIN_WINDOW_HOURS: i64 = 4;
pub const MAX_RANKED_WINDOWS: usize = 10;
pub const MAX_BEST_DAYS: usize = 3;

pub const HIGH_CONFIDENCE_HOURS: f64 = 48.0;
pub const MEDIUM_CONFIDENCE_HOURS: f64 = 24.0;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// How a cluster with no check on a given day affects that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTelemetryPolicy {
    /// Missing telemetry makes the whole day unsafe.
    #[default]
    Veto,
    /// Silent clusters abstain; reporting clusters decide the day.
    Ignore,
}

/// Parameters for one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerParams {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_window_duration_hours: i64,
    /// Explicit allow-list. `None` or empty tracks every cluster seen in the rows.
    pub clusters: Option<Vec<String>>,
    pub missing_telemetry: MissingTelemetryPolicy,
}

impl OptimizerParams {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
            min_window_duration_hours: DEFAULT_MIN_WINDOW_HOURS,
            clusters: None,
            missing_telemetry: MissingTelemetryPolicy::default(),
        }
    }

    pub fn with_min_window_hours(mut self, hours: i64) -> Self {
        self.min_window_duration_hours = hours;
        self
    }

    pub fn with_clusters(mut self, clusters: Vec<String>) -> Self {
        self.clusters = Some(clusters);
        self
    }

    pub fn with_missing_telemetry(mut self, policy: MissingTelemetryPolicy) -> Self {
        self.missing_telemetry = policy;
        self
    }

    /// Allow-list as a set, if one was supplied and is non-empty.
    pub(crate) fn allow_list(&self) -> Option<BTreeSet<&str>> {
        self.clusters
            .as_ref()
            .filter(|c| !c.is_empty())
            .map(|c| c.iter().map(String::as_str).collect())
    }
}

// ============================================================================
// INTERMEDIATE STAGES
// ============================================================================

/// The representative (last observed) check for one cluster on one UTC day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatus {
    pub date: NaiveDate,
    pub record: SafetyCheckRecord,
}

pub type DailyStatusMap = BTreeMap<NaiveDate, BTreeMap<String, DailyStatus>>;

/// Per-cluster verdict for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterDayState {
    Safe,
    Unsafe,
    Unknown,
}

/// Day-level input to the window merger.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub globally_safe: bool,
    /// Every tracked cluster reported and was safe (not just the reporters).
    pub all_clusters_safe: bool,
    pub avg_healthy_hosts: f64,
    pub avg_total_hosts: f64,
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: f64,
    pub confidence: Confidence,
    pub all_clusters_safe: bool,
    pub affected_clusters: BTreeSet<String>,
    pub avg_healthy_hosts: f64,
    pub avg_total_hosts: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatistics {
    pub avg_uptime_pct: f64,
    pub total_checks: u64,
    pub safe_checks: u64,
    pub best_days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimal_windows: Vec<OptimalWindow>,
    pub cluster_statistics: BTreeMap<String, ClusterStatistics>,
    pub recommendations: Vec<String>,
}
