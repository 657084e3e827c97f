//! Confidence labelling and output ranking.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::merge::WindowCandidate;
use super::types::{
    Confidence, OptimalWindow, HIGH_CONFIDENCE_HOURS, MAX_RANKED_WINDOWS,
    MEDIUM_CONFIDENCE_HOURS,
};

/// Confidence depends on duration only; both bounds are inclusive.
pub fn classify_confidence(duration_hours: f64) -> Confidence {
    if duration_hours >= HIGH_CONFIDENCE_HOURS {
        Confidence::High
    } else if duration_hours >= MEDIUM_CONFIDENCE_HOURS {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn label_window(candidate: WindowCandidate, clusters: &BTreeSet<String>) -> OptimalWindow {
    OptimalWindow {
        start: candidate.start,
        end: candidate.end,
        duration_hours: candidate.duration_hours,
        confidence: classify_confidence(candidate.duration_hours),
        all_clusters_safe: candidate.all_clusters_safe,
        affected_clusters: clusters.clone(),
        avg_healthy_hosts: candidate.avg_healthy_hosts,
        avg_total_hosts: candidate.avg_total_hosts,
    }
}

/// Tier desc, then duration desc, then earliest start.
fn compare_windows(a: &OptimalWindow, b: &OptimalWindow) -> Ordering {
    b.confidence
        .cmp(&a.confidence)
        .then_with(|| b.duration_hours.total_cmp(&a.duration_hours))
        .then_with(|| a.start.cmp(&b.start))
}

pub fn rank_windows(mut windows: Vec<OptimalWindow>) -> Vec<OptimalWindow> {
    windows.sort_by(compare_windows);
    windows.truncate(MAX_RANKED_WINDOWS);
    windows
}
