use std::collections::BTreeMap;

use crate::types::Job;

/// Jobs keyed by priority, ascending. Lower values are more urgent and come first.
pub type PriorityPartition = BTreeMap<i64, Vec<Job>>;

/// Splits jobs into priority classes. Each class keeps the input order of
/// its jobs, regardless of how priorities are interleaved in the input.
pub fn partition_by_priority(jobs: Vec<Job>) -> PriorityPartition {
    let mut partition = PriorityPartition::new();
    for job in jobs {
        partition.entry(job.priority).or_default().push(job);
    }
    partition
}
