//! Per-cluster reliability statistics over the raw rows.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Weekday};

use super::types::{ClusterStatistics, MAX_BEST_DAYS};
use crate::models::SafetyCheckRecord;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: u64,
    safe: u64,
}

impl Tally {
    fn add(&mut self, safe: bool) {
        self.total += 1;
        if safe {
            self.safe += 1;
        }
    }

    fn ratio(&self) -> f64 {
        self.safe as f64 / self.total as f64
    }
}

/// Full English names, indexed by `Weekday::num_days_from_monday`.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Statistics for every cluster in `clusters` that has at least one row.
pub fn cluster_statistics<'a, I>(
    records: I,
    clusters: &BTreeSet<String>,
) -> BTreeMap<String, ClusterStatistics>
where
    I: IntoIterator<Item = &'a SafetyCheckRecord>,
{
    // cluster -> (overall, weekday index from Monday -> tally)
    let mut tallies: BTreeMap<&str, (Tally, BTreeMap<u32, (Weekday, Tally)>)> = BTreeMap::new();

    for record in records {
        if !clusters.contains(&record.cluster_id) {
            continue;
        }
        let weekday = record.check_timestamp.weekday();
        let (overall, by_day) = tallies.entry(record.cluster_id.as_str()).or_default();
        overall.add(record.safe_to_proceed);
        by_day
            .entry(weekday.num_days_from_monday())
            .or_insert((weekday, Tally::default()))
            .1
            .add(record.safe_to_proceed);
    }

    tallies
        .into_iter()
        .map(|(cluster, (overall, by_day))| {
            (cluster.to_string(), ClusterStatistics {
                avg_uptime_pct: round_one_decimal(100.0 * overall.ratio()),
                total_checks: overall.total,
                safe_checks: overall.safe,
                best_days: best_days(by_day.into_values()),
            })
        })
        .collect()
}

/// Top weekdays by safe ratio. Input must be in Monday-first order so ties
/// keep that order after the stable sort.
fn best_days<I>(by_day: I) -> Vec<String>
where
    I: IntoIterator<Item = (Weekday, Tally)>,
{
    let mut ranked: Vec<(Weekday, f64)> = by_day
        .into_iter()
        .filter(|(_, t)| t.total > 0)
        .map(|(day, t)| (day, t.ratio()))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(MAX_BEST_DAYS)
        .map(|(day, _)| weekday_name(day).to_string())
        .collect()
}
