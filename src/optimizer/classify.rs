//! Safe-day classification across the tracked cluster set.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::types::{
    ClusterDayState, DailyStatus, DailyStatusMap, DaySummary, MissingTelemetryPolicy,
};

/// Resolve one cluster's verdict for a day.
pub fn cluster_day_state(
    day: Option<&BTreeMap<String, DailyStatus>>,
    cluster_id: &str,
) -> ClusterDayState {
    match day.and_then(|d| d.get(cluster_id)) {
        Some(status) if status.record.safe_to_proceed => ClusterDayState::Safe,
        Some(_) => ClusterDayState::Unsafe,
        None => ClusterDayState::Unknown,
    }
}

/// Combine per-cluster verdicts into a single day verdict.
///
/// `Unsafe` always vetoes. An empty cluster set is never safe.
pub fn is_globally_safe<I>(states: I, policy: MissingTelemetryPolicy) -> bool
where
    I: IntoIterator<Item = ClusterDayState>,
{
    let mut any_safe = false;
    for state in states {
        match (state, policy) {
            (ClusterDayState::Safe, _) => any_safe = true,
            (ClusterDayState::Unsafe, _) => return false,
            (ClusterDayState::Unknown, MissingTelemetryPolicy::Veto) => return false,
            (ClusterDayState::Unknown, MissingTelemetryPolicy::Ignore) => {}
        }
    }
    any_safe
}

/// Build the chronological day sequence fed to the window merger.
///
/// Covers every calendar day from `first` to `last` inclusive, widened to
/// include any day present in `daily`. Days without data are unsafe.
pub fn summarize_days(
    daily: &DailyStatusMap,
    clusters: &BTreeSet<String>,
    first: NaiveDate,
    last: NaiveDate,
    policy: MissingTelemetryPolicy,
) -> Vec<DaySummary> {
    let first = daily.keys().next().map_or(first, |d| first.min(*d));
    let last = daily.keys().next_back().map_or(last, |d| last.max(*d));

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let day = daily.get(&date);
            let states: Vec<ClusterDayState> =
                clusters.iter().map(|c| cluster_day_state(day, c)).collect();
            let globally_safe = is_globally_safe(states.iter().copied(), policy);
            let all_clusters_safe = !states.is_empty()
                && states.iter().all(|s| *s == ClusterDayState::Safe);
            let (avg_healthy_hosts, avg_total_hosts) = day_host_averages(day, clusters);

            DaySummary {
                date,
                globally_safe,
                all_clusters_safe,
                avg_healthy_hosts,
                avg_total_hosts,
            }
        })
        .collect()
}

/// Cross-cluster mean of healthy/total hosts for the clusters that reported.
fn day_host_averages(
    day: Option<&BTreeMap<String, DailyStatus>>,
    clusters: &BTreeSet<String>,
) -> (f64, f64) {
    let Some(day) = day else {
        return (0.0, 0.0);
    };

    let (count, healthy, total) = clusters
        .iter()
        .filter_map(|c| day.get(c))
        .fold((0usize, 0.0f64, 0.0f64), |(n, h, t), s| {
            (n + 1, h + f64::from(s.record.healthy_hosts), t + f64::from(s.record.total_hosts))
        });

    if count == 0 {
        (0.0, 0.0)
    } else {
        (healthy / count as f64, total / count as f64)
    }
}
