//! Window merging: fold the safe/unsafe day sequence into contiguous runs.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::types::DaySummary;

/// A closed run of safe days that met the minimum duration.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCandidate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: f64,
    pub all_clusters_safe: bool,
    pub avg_healthy_hosts: f64,
    pub avg_total_hosts: f64,
}

/// In-progress run. `end` is exclusive: midnight after the last safe day.
#[derive(Debug, Clone)]
struct WindowAccumulator {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    days: u32,
    all_clusters_safe: bool,
    healthy_sum: f64,
    total_sum: f64,
}

impl WindowAccumulator {
    fn open(day: &DaySummary) -> Self {
        let start = midnight_utc(day.date);
        Self {
            start,
            end: start + Duration::hours(24),
            days: 1,
            all_clusters_safe: day.all_clusters_safe,
            healthy_sum: day.avg_healthy_hosts,
            total_sum: day.avg_total_hosts,
        }
    }

    fn extend(mut self, day: &DaySummary) -> Self {
        self.end += Duration::hours(24);
        self.days += 1;
        self.all_clusters_safe &= day.all_clusters_safe;
        self.healthy_sum += day.avg_healthy_hosts;
        self.total_sum += day.avg_total_hosts;
        self
    }

    fn close(self, min_duration_hours: f64) -> Option<WindowCandidate> {
        let duration_hours = (self.end - self.start).num_seconds() as f64 / 3600.0;
        if duration_hours < min_duration_hours {
            return None;
        }

        let days = f64::from(self.days);
        Some(WindowCandidate {
            start: self.start,
            end: self.end,
            duration_hours,
            all_clusters_safe: self.all_clusters_safe,
            avg_healthy_hosts: self.healthy_sum / days,
            avg_total_hosts: self.total_sum / days,
        })
    }
}

pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Merge chronologically sorted days into window candidates.
///
/// Host averages are the mean of each day's cross-cluster mean.
pub fn merge_windows(days: &[DaySummary], min_duration_hours: i64) -> Vec<WindowCandidate> {
    let min_hours = min_duration_hours as f64;

    let (mut windows, open) = days.iter().fold(
        (Vec::new(), None::<WindowAccumulator>),
        |(mut windows, open), day| {
            let open = match (open, day.globally_safe) {
                (None, true) => Some(WindowAccumulator::open(day)),
                (Some(acc), true) => Some(acc.extend(day)),
                (Some(acc), false) => {
                    windows.extend(acc.close(min_hours));
                    None
                }
                (None, false) => None,
            };
            (windows, open)
        },
    );

    if let Some(acc) = open {
        windows.extend(acc.close(min_hours));
    }

    windows
}
