use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::aggregate::{aggregate_daily, validate_records};
use super::classify::{cluster_day_state, is_globally_safe, summarize_days};
use super::merge::{merge_windows, midnight_utc};
use super::rank::{classify_confidence, rank_windows};
use super::recommend::{
    generate_recommendations, LIMITED_WINDOWS_MESSAGE, NO_DATA_MESSAGE, NO_WINDOWS_MESSAGE,
    STABILITY_MESSAGE,
};
use super::stats::cluster_statistics;
use super::*;

// 2024-01-01 is a Monday.
fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
}

fn at(n: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, hour, 0, 0).unwrap()
}

fn check(cluster: &str, ts: DateTime<Utc>, safe: bool) -> SafetyCheckRecord {
    SafetyCheckRecord {
        cluster_id: cluster.to_string(),
        check_timestamp: ts,
        safe_to_proceed: safe,
        healthy_hosts: if safe { 4 } else { 1 },
        total_hosts: 4,
    }
}

fn params(first: u32, last: u32) -> OptimizerParams {
    OptimizerParams::new(at(first, 0), at(last, 23))
}

fn summary(n: u32, safe: bool) -> DaySummary {
    DaySummary {
        date: day(n),
        globally_safe: safe,
        all_clusters_safe: safe,
        avg_healthy_hosts: 3.0,
        avg_total_hosts: 4.0,
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_three_safe_days_make_one_high_window() {
    let records = vec![
        check("c1", at(1, 10), true),
        check("c1", at(2, 10), true),
        check("c1", at(3, 10), true),
        check("c1", at(4, 10), false),
    ];

    let result = optimize(&params(1, 4), &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 1);
    let w = &result.optimal_windows[0];
    assert_eq!(w.duration_hours, 72.0);
    assert_eq!(w.confidence, Confidence::High);
    assert_eq!(w.start, midnight_utc(day(1)));
    assert_eq!(w.end, midnight_utc(day(4)));
    assert!(w.all_clusters_safe);
}

#[test]
fn test_empty_input_returns_no_data_result() {
    let result = optimize(&params(1, 7), &[]).unwrap();

    assert!(result.optimal_windows.is_empty());
    assert!(result.cluster_statistics.is_empty());
    assert_eq!(result.recommendations, vec![NO_DATA_MESSAGE.to_string()]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "optimal_windows": [],
            "cluster_statistics": {},
            "recommendations": ["No safety check data available for the selected period"]
        })
    );
}

#[test]
fn test_missing_telemetry_splits_windows() {
    let mut records = Vec::new();
    for n in 1..=5 {
        records.push(check("x", at(n, 8), true));
        if n != 3 {
            records.push(check("y", at(n, 8), true));
        }
    }

    let result = optimize(&params(1, 5), &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 2);
    let mut starts: Vec<_> = result.optimal_windows.iter().map(|w| w.start).collect();
    starts.sort();
    assert_eq!(starts, vec![midnight_utc(day(1)), midnight_utc(day(4))]);
    for w in &result.optimal_windows {
        assert_eq!(w.duration_hours, 48.0);
        assert!(w.end <= midnight_utc(day(3)) || w.start >= midnight_utc(day(4)));
    }
}

#[test]
fn test_safe_hours_inside_an_unsafe_day_yield_nothing() {
    // Safe for 20 hours, then the last check of the day flips unsafe.
    let mut records: Vec<_> = (0..20).map(|h| check("c1", at(2, h), true)).collect();
    records.push(check("c1", at(2, 21), false));

    let result = optimize(&params(2, 2).with_min_window_hours(24), &records).unwrap();

    assert!(result.optimal_windows.is_empty());
    assert_eq!(result.recommendations, vec![NO_WINDOWS_MESSAGE.to_string()]);
}

#[test]
fn test_short_run_below_minimum_is_discarded() {
    let records = vec![
        check("c1", at(1, 9), false),
        check("c1", at(2, 9), true),
        check("c1", at(3, 9), false),
    ];

    let result = optimize(&params(1, 3).with_min_window_hours(48), &records).unwrap();

    assert!(result.optimal_windows.is_empty());
}

#[test]
fn test_exact_day_is_medium_confidence() {
    assert_eq!(classify_confidence(24.0), Confidence::Medium);
    assert_eq!(classify_confidence(47.9), Confidence::Medium);
    assert_eq!(classify_confidence(48.0), Confidence::High);
    assert_eq!(classify_confidence(23.9), Confidence::Low);
    assert_eq!(classify_confidence(4.0), Confidence::Low);

    let records = vec![check("c1", at(1, 9), true), check("c1", at(2, 9), false)];
    let result = optimize(&params(1, 2), &records).unwrap();
    assert_eq!(result.optimal_windows[0].duration_hours, 24.0);
    assert_eq!(result.optimal_windows[0].confidence, Confidence::Medium);
}

// ============================================================================
// DAILY AGGREGATOR
// ============================================================================

#[test]
fn test_last_observation_of_day_wins() {
    let records = vec![
        check("c1", at(1, 18), true),
        check("c1", at(1, 6), false),
        check("c1", at(2, 1), false),
    ];

    let daily = aggregate_daily(&records);

    assert_eq!(daily.len(), 2);
    assert!(daily[&day(1)]["c1"].record.safe_to_proceed);
    assert!(!daily[&day(2)]["c1"].record.safe_to_proceed);
}

#[test]
fn test_equal_timestamps_later_row_wins() {
    let records = vec![check("c1", at(1, 12), false), check("c1", at(1, 12), true)];
    let daily = aggregate_daily(&records);
    assert!(daily[&day(1)]["c1"].record.safe_to_proceed);
}

#[test]
fn test_day_boundary_is_utc() {
    let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
    let early = late + Duration::seconds(1);
    let records = vec![check("c1", late, true), check("c1", early, false)];

    let daily = aggregate_daily(&records);

    assert!(daily[&day(1)]["c1"].record.safe_to_proceed);
    assert!(!daily[&day(2)]["c1"].record.safe_to_proceed);
}

#[test]
fn test_malformed_rows_are_rejected() {
    let mut bad = check("", at(1, 1), true);
    assert!(matches!(validate_records(&[bad.clone()]), Err(OptimizerError::InvalidInput(_))));

    bad.cluster_id = "c1".to_string();
    bad.healthy_hosts = 5;
    let err = optimize(&params(1, 1), &[check("c0", at(1, 1), true), bad]).unwrap_err();
    assert!(matches!(err, OptimizerError::InvalidInput(msg) if msg.contains("c1")));
}

// ============================================================================
// SAFE-DAY CLASSIFIER
// ============================================================================

#[test]
fn test_cluster_day_states() {
    let records = vec![check("a", at(1, 1), true), check("b", at(1, 1), false)];
    let daily = aggregate_daily(&records);
    let d = daily.get(&day(1));

    assert_eq!(cluster_day_state(d, "a"), ClusterDayState::Safe);
    assert_eq!(cluster_day_state(d, "b"), ClusterDayState::Unsafe);
    assert_eq!(cluster_day_state(d, "c"), ClusterDayState::Unknown);
    assert_eq!(cluster_day_state(None, "a"), ClusterDayState::Unknown);
}

#[test]
fn test_global_safety_policies() {
    use ClusterDayState::*;
    use MissingTelemetryPolicy::*;

    assert!(is_globally_safe([Safe, Safe], Veto));
    assert!(!is_globally_safe([Safe, Unknown], Veto));
    assert!(is_globally_safe([Safe, Unknown], Ignore));
    assert!(!is_globally_safe([Safe, Unsafe], Ignore));
    assert!(!is_globally_safe([Unknown, Unknown], Ignore));
    assert!(!is_globally_safe(Vec::new(), Veto));
}

#[test]
fn test_ignore_policy_bridges_telemetry_gap() {
    let mut records = Vec::new();
    for n in 1..=5 {
        records.push(check("x", at(n, 8), true));
        if n != 3 {
            records.push(check("y", at(n, 8), true));
        }
    }

    let p = params(1, 5).with_missing_telemetry(MissingTelemetryPolicy::Ignore);
    let result = optimize(&p, &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 1);
    assert_eq!(result.optimal_windows[0].duration_hours, 120.0);
}

#[test]
fn test_days_without_any_data_are_unsafe() {
    let records = vec![check("c1", at(1, 9), true), check("c1", at(3, 9), true)];
    let daily = aggregate_daily(&records);
    let clusters: BTreeSet<String> = ["c1".to_string()].into();

    let days = summarize_days(&daily, &clusters, day(1), day(4), MissingTelemetryPolicy::Veto);

    let flags: Vec<bool> = days.iter().map(|d| d.globally_safe).collect();
    assert_eq!(flags, vec![true, false, true, false]);
    assert_eq!(days[1].avg_total_hosts, 0.0);
}

#[test]
fn test_allow_list_cluster_without_rows_vetoes_every_day() {
    let records = vec![check("a", at(1, 9), true), check("a", at(2, 9), true)];
    let p = params(1, 2).with_clusters(vec!["a".to_string(), "ghost".to_string()]);

    let result = optimize(&p, &records).unwrap();

    assert!(result.optimal_windows.is_empty());
    assert!(result.cluster_statistics.contains_key("a"));
    assert!(!result.cluster_statistics.contains_key("ghost"));
}

#[test]
fn test_allow_list_excludes_other_clusters() {
    let records = vec![
        check("a", at(1, 9), true),
        check("noisy", at(1, 9), false),
        check("a", at(2, 9), true),
    ];
    let p = params(1, 2).with_clusters(vec!["a".to_string()]);

    let result = optimize(&p, &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 1);
    assert_eq!(result.optimal_windows[0].duration_hours, 48.0);
    let expected: BTreeSet<String> = ["a".to_string()].into();
    assert_eq!(result.optimal_windows[0].affected_clusters, expected);
    assert_eq!(result.cluster_statistics.len(), 1);
}

#[test]
fn test_ignore_policy_window_does_not_claim_full_coverage() {
    // y only reports on day 1; x is safe throughout
    let records = vec![
        check("x", at(1, 8), true),
        check("y", at(1, 8), true),
        check("x", at(2, 8), true),
        check("x", at(3, 8), true),
    ];

    let p = params(1, 3).with_missing_telemetry(MissingTelemetryPolicy::Ignore);
    let result = optimize(&p, &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 1);
    let w = &result.optimal_windows[0];
    assert_eq!(w.duration_hours, 72.0);
    assert!(!w.all_clusters_safe);

    // Same rows without the gap: every cluster reported every day
    let mut full = records.clone();
    full.push(check("y", at(2, 8), true));
    full.push(check("y", at(3, 8), true));
    let result = optimize(&p, &full).unwrap();
    assert!(result.optimal_windows[0].all_clusters_safe);
}

#[test]
fn test_malformed_row_outside_allow_list_is_ignored() {
    let mut bad = check("other", at(1, 9), true);
    bad.healthy_hosts = 9;
    let records = vec![check("a", at(1, 9), true), bad, check("a", at(2, 9), true)];

    let p = params(1, 2).with_clusters(vec!["a".to_string()]);
    let result = optimize(&p, &records).unwrap();

    assert_eq!(result.optimal_windows.len(), 1);
    assert_eq!(result.optimal_windows[0].duration_hours, 48.0);
    assert!(!result.cluster_statistics.contains_key("other"));

    // Without the allow-list the same row still aborts the run
    let err = optimize(&params(1, 2), &records).unwrap_err();
    assert!(matches!(err, OptimizerError::InvalidInput(msg) if msg.contains("other")));
}

// ============================================================================
// WINDOW MERGER
// ============================================================================

#[test]
fn test_merge_closes_window_at_end_of_sequence() {
    let days = vec![summary(1, false), summary(2, true), summary(3, true)];

    let windows = merge_windows(&days, 4);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, midnight_utc(day(2)));
    assert_eq!(windows[0].end, midnight_utc(day(4)));
    assert_eq!(windows[0].duration_hours, 48.0);
}

#[test]
fn test_merge_two_level_host_average() {
    let mut days = vec![summary(1, true), summary(2, true)];
    days[0].avg_healthy_hosts = 2.0;
    days[1].avg_healthy_hosts = 4.0;
    days[1].avg_total_hosts = 6.0;

    let windows = merge_windows(&days, 4);

    assert_eq!(windows[0].avg_healthy_hosts, 3.0);
    assert_eq!(windows[0].avg_total_hosts, 5.0);
}

#[test]
fn test_merge_all_unsafe_yields_nothing() {
    let days = vec![summary(1, false), summary(2, false)];
    assert!(merge_windows(&days, 4).is_empty());
    assert!(merge_windows(&[], 4).is_empty());
}

// ============================================================================
// RANKER
// ============================================================================

#[test]
fn test_rank_orders_by_tier_then_duration_and_truncates() {
    // Alternating safe/unsafe runs of varying length over January.
    let mut days = Vec::new();
    let mut n = 1;
    for len in [1u32, 3, 2, 1, 4, 1, 1, 1, 1, 1, 2, 1] {
        for _ in 0..len {
            days.push(summary(n, true));
            n += 1;
        }
        days.push(summary(n, false));
        n += 1;
    }
    let clusters: BTreeSet<String> = ["c1".to_string()].into();
    let windows: Vec<_> = merge_windows(&days, 4)
        .into_iter()
        .map(|c| rank::label_window(c, &clusters))
        .collect();
    assert_eq!(windows.len(), 12);

    let ranked = rank_windows(windows);

    assert_eq!(ranked.len(), MAX_RANKED_WINDOWS);
    let hours: Vec<f64> = ranked.iter().map(|w| w.duration_hours).collect();
    assert_eq!(hours, vec![96.0, 72.0, 48.0, 48.0, 24.0, 24.0, 24.0, 24.0, 24.0, 24.0]);
    assert!(ranked[2].start < ranked[3].start);
    assert!(ranked[4].start < ranked[5].start);
    assert!(ranked.iter().take(2).all(|w| w.confidence == Confidence::High));
}

// ============================================================================
// CLUSTER STATISTICS
// ============================================================================

#[test]
fn test_cluster_statistics_uptime_and_best_days() {
    let records = vec![
        // Monday: 2/2 safe
        check("c1", at(1, 1), true),
        check("c1", at(1, 2), true),
        // Tuesday: 0/1
        check("c1", at(2, 1), false),
        // Wednesday: 1/2
        check("c1", at(3, 1), true),
        check("c1", at(3, 2), false),
        // Friday: 1/1
        check("c1", at(5, 1), true),
    ];
    let clusters: BTreeSet<String> = ["c1".to_string()].into();

    let stats = cluster_statistics(&records, &clusters);
    let c1 = &stats["c1"];

    assert_eq!(c1.total_checks, 6);
    assert_eq!(c1.safe_checks, 4);
    assert_eq!(c1.avg_uptime_pct, 66.7);
    assert_eq!(c1.best_days, vec!["Monday", "Friday", "Wednesday"]);
}

#[test]
fn test_best_days_skip_unobserved_weekdays() {
    let records = vec![check("c1", at(6, 1), false)];
    let clusters: BTreeSet<String> = ["c1".to_string()].into();

    let stats = cluster_statistics(&records, &clusters);

    assert_eq!(stats["c1"].best_days, vec!["Saturday"]);
    assert_eq!(stats["c1"].avg_uptime_pct, 0.0);
}

#[test]
fn test_weekday_names_match_chrono_long_names() {
    // 2024-01-01 .. 2024-01-07 covers Monday through Sunday
    for n in 1..=7 {
        let ts = at(n, 0);
        assert_eq!(
            super::stats::weekday_name(chrono::Datelike::weekday(&ts)),
            ts.format("%A").to_string()
        );
    }
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

fn window_of(hours: f64) -> OptimalWindow {
    let start = midnight_utc(day(1));
    OptimalWindow {
        start,
        end: start + Duration::hours(hours as i64),
        duration_hours: hours,
        confidence: classify_confidence(hours),
        all_clusters_safe: true,
        affected_clusters: BTreeSet::new(),
        avg_healthy_hosts: 0.0,
        avg_total_hosts: 0.0,
    }
}

#[test]
fn test_recommendations_rules() {
    assert_eq!(generate_recommendations(&[]), vec![NO_WINDOWS_MESSAGE.to_string()]);

    assert_eq!(
        generate_recommendations(&[window_of(24.0)]),
        vec![LIMITED_WINDOWS_MESSAGE.to_string()]
    );

    let recs = generate_recommendations(&[window_of(96.0), window_of(24.0), window_of(48.0)]);
    assert_eq!(recs, vec![
        "Found 3 optimal maintenance windows.".to_string(),
        "2 high-confidence windows available for critical maintenance.".to_string(),
        STABILITY_MESSAGE.to_string(),
    ]);

    let recs = generate_recommendations(&[window_of(24.0), window_of(24.0), window_of(24.0)]);
    assert_eq!(recs, vec!["Found 3 optimal maintenance windows.".to_string()]);

    // Mean of exactly 48 is not "above 48".
    let recs = generate_recommendations(&[window_of(48.0)]);
    assert_eq!(recs, vec![LIMITED_WINDOWS_MESSAGE.to_string()]);
}

#[test]
fn test_optimize_is_idempotent() {
    let records = vec![
        check("b", at(1, 3), true),
        check("a", at(1, 4), true),
        check("a", at(2, 4), true),
        check("b", at(2, 5), true),
        check("a", at(3, 4), false),
    ];
    let p = params(1, 3);

    assert_eq!(optimize(&p, &records).unwrap(), optimize(&p, &records).unwrap());
}
