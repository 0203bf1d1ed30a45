use crate::types::{Batch, Constraints, Job};

/// The batch currently being filled.
#[derive(Debug, Clone)]
pub struct OpenBatch {
    constraints: Constraints,
    pub jobs: Vec<Job>,
    pub volume: f64,
}

impl OpenBatch {
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            jobs: Vec::new(),
            volume: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Whether `job` can join without breaking either ceiling.
    pub fn fits(&self, job: &Job) -> bool {
        self.jobs.len() < self.constraints.max_items
            && self.volume + job.volume <= self.constraints.max_volume
    }

    pub fn place(&mut self, job: Job) {
        self.volume += job.volume;
        self.jobs.push(job);
    }

    /// Hands back the filled batch and leaves this one empty.
    pub fn close(&mut self) -> Batch {
        let jobs = std::mem::take(&mut self.jobs);
        let volume = std::mem::replace(&mut self.volume, 0.0);
        Batch { jobs, volume }
    }
}

/// Packs same-priority jobs into batches in a single forward pass.
///
/// Jobs are never reordered or rejected. A job that does not fit closes the
/// open batch and starts the next one, so a job larger than `max_volume`
/// ends up alone in an over-capacity batch. This is a greedy heuristic and
/// does not minimize the number of batches.
pub fn group_jobs(jobs: Vec<Job>, constraints: &Constraints) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut open = OpenBatch::new(*constraints);

    for job in jobs {
        if !open.fits(&job) && !open.is_empty() {
            batches.push(open.close());
        }
        open.place(job);
    }

    if !open.is_empty() {
        batches.push(open.close());
    }

    batches
}
