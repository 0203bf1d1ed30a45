use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::grouper::group_jobs;
use crate::partition::partition_by_priority;
use crate::types::{Batch, Constraints, Job, PriorityBatches, Schedule, ScheduleResult};

/// Raw queue request as it arrives over JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRequest {
    pub jobs: Vec<Job>,
    pub constraints: Constraints,
}

impl QueueRequest {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

pub struct Scheduler {
    constraints: Constraints,
}

impl Scheduler {
    pub fn new(constraints: Constraints) -> Result<Self> {
        if !constraints.max_volume.is_finite() || constraints.max_volume <= 0.0 {
            return Err(OptimizeError::InvalidConstraints(format!(
                "max_volume must be positive, got {}",
                constraints.max_volume
            )));
        }
        if constraints.max_items == 0 {
            return Err(OptimizeError::InvalidConstraints(
                "max_items must be at least 1".to_string(),
            ));
        }
        Ok(Self { constraints })
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn schedule(&self, jobs: Vec<Job>) -> Result<Schedule> {
        for job in &jobs {
            if !job.volume.is_finite() || job.volume < 0.0 {
                return Err(OptimizeError::InvalidJob {
                    id: job.id.clone(),
                    reason: format!("volume must be non-negative, got {}", job.volume),
                });
            }
        }

        let job_count = jobs.len();
        let grouped: BTreeMap<i64, Vec<Batch>> = partition_by_priority(jobs)
            .into_iter()
            .map(|(priority, class)| (priority, group_jobs(class, &self.constraints)))
            .collect();

        let schedule = assemble(grouped);
        let total_time = schedule.total_time()?;
        tracing::debug!(
            jobs = job_count,
            priorities = schedule.levels.len(),
            batches = schedule.batch_count(),
            total_time,
            "queue scheduled"
        );
        Ok(schedule)
    }
}

/// Lays batches out in processing order: ascending priority, then the order
/// the grouper produced them in.
pub fn assemble(grouped: BTreeMap<i64, Vec<Batch>>) -> Schedule {
    let levels = grouped
        .into_iter()
        .map(|(priority, batches)| PriorityBatches { priority, batches })
        .collect();
    Schedule { levels }
}

/// Orders a job queue into capacity-bounded batches and reports the print
/// order and the total time, where each batch costs its slowest job.
pub fn optimize_queue(jobs: Vec<Job>, constraints: Constraints) -> Result<ScheduleResult> {
    let schedule = Scheduler::new(constraints)?.schedule(jobs)?;
    schedule.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn constraints() -> Constraints {
        Constraints::new(300.0, 2)
    }

    /// Checks the properties every schedule must hold:
    /// 1. Each input job appears exactly once
    /// 2. Batches respect the ceilings (oversized singletons excepted)
    /// 3. Priorities never go backwards in the print order
    /// 4. Total time is the sum of per-batch maxima
    fn assert_schedule_valid(schedule: &Schedule, input: &[Job], constraints: &Constraints) {
        let mut expected: HashMap<&str, usize> = HashMap::new();
        for job in input {
            *expected.entry(job.id.as_str()).or_default() += 1;
        }
        let order = schedule.print_order();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for id in &order {
            *seen.entry(id.as_str()).or_default() += 1;
        }
        assert_eq!(seen, expected, "print order lost or duplicated jobs");

        let mut last_priority = i64::MIN;
        let mut expected_time = 0;
        for level in &schedule.levels {
            for (bi, batch) in level.batches.iter().enumerate() {
                assert!(!batch.is_empty());
                if batch.exceeds(constraints) {
                    assert_eq!(batch.len(), 1, "priority {} batch {bi}", level.priority);
                }
                for job in &batch.jobs {
                    assert_eq!(job.priority, level.priority, "priorities mixed in a batch");
                    assert!(job.priority >= last_priority, "priority order broken at {}", job.id);
                    last_priority = job.priority;
                }
                expected_time += batch.jobs.iter().map(|j| j.print_time).max().unwrap();
            }
        }
        assert_eq!(schedule.total_time().unwrap(), expected_time);
    }

    #[test]
    fn test_equal_priority() {
        let jobs = vec![
            Job::new("M1", 100.0, 1, 120),
            Job::new("M2", 150.0, 1, 90),
            Job::new("M3", 120.0, 1, 150),
        ];
        let result = optimize_queue(jobs, constraints()).unwrap();
        assert_eq!(result.print_order, vec!["M1", "M2", "M3"]);
        assert_eq!(result.total_time, 270);
    }

    #[test]
    fn test_different_priorities() {
        let jobs = vec![
            Job::new("M1", 100.0, 2, 120),
            Job::new("M2", 150.0, 1, 90),
            Job::new("M3", 120.0, 3, 150),
        ];
        let result = optimize_queue(jobs, constraints()).unwrap();
        assert_eq!(result.print_order, vec!["M2", "M1", "M3"]);
        assert_eq!(result.total_time, 360);
    }

    #[test]
    fn test_volume_ceiling_exceeded() {
        let jobs = vec![
            Job::new("M1", 250.0, 1, 180),
            Job::new("M2", 200.0, 1, 150),
            Job::new("M3", 180.0, 2, 120),
        ];
        let scheduler = Scheduler::new(constraints()).unwrap();
        let schedule = scheduler.schedule(jobs.clone()).unwrap();
        assert_schedule_valid(&schedule, &jobs, scheduler.constraints());
        assert_eq!(schedule.batch_count(), 3);
        let result = schedule.result().unwrap();
        assert_eq!(result.print_order, vec!["M1", "M2", "M3"]);
        assert_eq!(result.total_time, 450);
    }

    #[test]
    fn test_priorities_never_share_a_batch() {
        // Both would fit together by volume and count.
        let jobs = vec![Job::new("a", 1.0, 1, 10), Job::new("b", 1.0, 2, 20)];
        let schedule = Scheduler::new(constraints()).unwrap().schedule(jobs).unwrap();
        assert_eq!(schedule.batch_count(), 2);
        assert_eq!(schedule.total_time().unwrap(), 30);
    }

    #[test]
    fn test_total_time_overflow_is_an_error() {
        let jobs = vec![
            Job::new("a", 1.0, 1, u64::MAX),
            Job::new("b", 1.0, 2, u64::MAX),
        ];
        assert!(matches!(
            optimize_queue(jobs, constraints()),
            Err(OptimizeError::Overflow(_))
        ));

        // A single batch at u64::MAX is fine.
        let jobs = vec![Job::new("a", 1.0, 1, u64::MAX), Job::new("b", 1.0, 1, 1)];
        assert_eq!(optimize_queue(jobs, constraints()).unwrap().total_time, u64::MAX);
    }

    #[test]
    fn test_empty_queue() {
        let result = optimize_queue(vec![], constraints()).unwrap();
        assert!(result.print_order.is_empty());
        assert_eq!(result.total_time, 0);
    }

    #[test]
    fn test_invalid_constraints() {
        assert!(matches!(
            optimize_queue(vec![], Constraints::new(0.0, 2)),
            Err(OptimizeError::InvalidConstraints(_))
        ));
        assert!(matches!(
            optimize_queue(vec![], Constraints::new(f64::NAN, 2)),
            Err(OptimizeError::InvalidConstraints(_))
        ));
        assert!(matches!(
            optimize_queue(vec![], Constraints::new(10.0, 0)),
            Err(OptimizeError::InvalidConstraints(_))
        ));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let err = optimize_queue(vec![Job::new("bad", -1.0, 1, 1)], constraints()).unwrap_err();
        match err {
            OptimizeError::InvalidJob { id, .. } => assert_eq!(id, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_request_from_json() {
        let req = QueueRequest::from_json(
            r#"{
                "jobs": [
                    {"id": "M1", "volume": 100, "priority": 1, "print_time": 120},
                    {"id": "M2", "volume": 150.5, "priority": 1, "print_time": 90}
                ],
                "constraints": {"max_volume": 300, "max_items": 2}
            }"#,
        )
        .unwrap();
        let result = optimize_queue(req.jobs, req.constraints).unwrap();
        assert_eq!(result.print_order, vec!["M1", "M2"]);
        assert_eq!(result.total_time, 120);
    }

    #[test]
    fn test_request_missing_constraint_field() {
        let err = QueueRequest::from_json(
            r#"{"jobs": [], "constraints": {"max_volume": 300}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
        assert!(err.to_string().contains("max_items"));
    }

    fn arb_jobs() -> impl Strategy<Value = Vec<Job>> {
        prop::collection::vec((0.0f64..400.0, 1i64..=4, 0u64..300), 0..40).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (volume, priority, time))| Job::new(format!("J{i}"), volume, priority, time))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn schedule_holds_invariants(
            jobs in arb_jobs(),
            max_volume in 50.0f64..500.0,
            max_items in 1usize..6,
        ) {
            let constraints = Constraints::new(max_volume, max_items);
            let schedule = Scheduler::new(constraints).unwrap().schedule(jobs.clone()).unwrap();
            assert_schedule_valid(&schedule, &jobs, &constraints);
        }

        #[test]
        fn schedule_is_deterministic(jobs in arb_jobs()) {
            let a = optimize_queue(jobs.clone(), constraints()).unwrap();
            let b = optimize_queue(jobs, constraints()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
