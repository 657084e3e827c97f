//! Daily aggregation: one representative check per (UTC day, cluster).

use std::collections::BTreeMap;

use super::types::{DailyStatus, DailyStatusMap, OptimizerError};
use crate::models::SafetyCheckRecord;

/// Reject rows the rest of the pipeline cannot reason about.
pub fn validate_records<'a, I>(records: I) -> Result<(), OptimizerError>
where
    I: IntoIterator<Item = &'a SafetyCheckRecord>,
{
    for (idx, r) in records.into_iter().enumerate() {
        if r.cluster_id.trim().is_empty() {
            return Err(OptimizerError::InvalidInput(format!(
                "record {} has an empty cluster_id", idx
            )));
        }
        if r.healthy_hosts < 0 || r.healthy_hosts > r.total_hosts {
            return Err(OptimizerError::InvalidInput(format!(
                "record {} for cluster '{}' has healthy_hosts={} outside 0..={}",
                idx, r.cluster_id, r.healthy_hosts, r.total_hosts
            )));
        }
    }
    Ok(())
}

/// Collapse raw checks so only the last observation of each day survives.
///
/// On equal timestamps the record appearing later in `records` wins.
pub fn aggregate_daily<'a, I>(records: I) -> DailyStatusMap
where
    I: IntoIterator<Item = &'a SafetyCheckRecord>,
{
    let mut daily: DailyStatusMap = BTreeMap::new();

    for record in records {
        let date = record.check_timestamp.date_naive();
        let per_cluster = daily.entry(date).or_default();

        match per_cluster.get(&record.cluster_id) {
            Some(existing) if existing.record.check_timestamp > record.check_timestamp => {}
            _ => {
                per_cluster.insert(
                    record.cluster_id.clone(),
                    DailyStatus { date, record: record.clone() },
                );
            }
        }
    }

    daily
}
