use serde::{Deserialize, Deserializer, Serialize};

use crate::error::OptimizeError;

/// A queued job waiting to be batched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub volume: f64,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub priority: i64,
    #[serde(deserialize_with = "deserialize_u64_from_number")]
    pub print_time: u64,
}

impl Job {
    pub fn new(id: impl Into<String>, volume: f64, priority: i64, print_time: u64) -> Self {
        Self {
            id: id.into(),
            volume,
            priority,
            print_time,
        }
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (vol {}, p{}, {} min)",
            self.id, self.volume, self.priority, self.print_time
        )
    }
}

/// Capacity ceilings shared by every batch of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub max_volume: f64,
    #[serde(deserialize_with = "deserialize_usize_from_number")]
    pub max_items: usize,
}

impl Constraints {
    pub fn new(max_volume: f64, max_items: usize) -> Self {
        Self {
            max_volume,
            max_items,
        }
    }
}

/// Jobs printed together. Completion is gated by the slowest member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub jobs: Vec<Job>,
    pub volume: f64,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn completion_time(&self) -> u64 {
        self.jobs.iter().map(|j| j.print_time).max().unwrap_or(0)
    }

    /// True when the batch breaks a ceiling. Only possible for a singleton
    /// holding a job that is larger than `max_volume` on its own.
    pub fn exceeds(&self, constraints: &Constraints) -> bool {
        self.volume > constraints.max_volume || self.jobs.len() > constraints.max_items
    }
}

/// Batches of one priority class, in packing order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityBatches {
    pub priority: i64,
    pub batches: Vec<Batch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub levels: Vec<PriorityBatches>,
}

impl Schedule {
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.levels.iter().flat_map(|l| &l.batches)
    }

    pub fn batch_count(&self) -> usize {
        self.levels.iter().map(|l| l.batches.len()).sum()
    }

    pub fn print_order(&self) -> Vec<String> {
        self.batches()
            .flat_map(|b| &b.jobs)
            .map(|j| j.id.clone())
            .collect()
    }

    pub fn total_time(&self) -> Result<u64, OptimizeError> {
        self.batches()
            .try_fold(0u64, |acc, b| acc.checked_add(b.completion_time()))
            .ok_or(OptimizeError::Overflow("total time"))
    }

    pub fn result(&self) -> Result<ScheduleResult, OptimizeError> {
        Ok(ScheduleResult {
            print_order: self.print_order(),
            total_time: self.total_time()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub print_order: Vec<String>,
    pub total_time: u64,
}

/// Revenue per piece length. `price(i)` is the value of a piece of length `i`,
/// so the table is 1-indexed from the caller's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(Vec<u64>);

impl PriceTable {
    pub fn new(prices: Vec<u64>) -> Self {
        Self(prices)
    }

    /// Longest piece with a known price.
    pub fn max_length(&self) -> usize {
        self.0.len()
    }

    /// Callers must have checked `len <= max_length()`.
    pub fn price(&self, len: usize) -> u64 {
        self.0[len - 1]
    }
}

impl From<Vec<u64>> for PriceTable {
    fn from(prices: Vec<u64>) -> Self {
        Self(prices)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutStrategy {
    /// Top-down recursion with a per-call cache.
    #[default]
    Memo,
    /// Bottom-up table followed by a reconstruction pass.
    Table,
}

impl std::fmt::Display for CutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutStrategy::Memo => write!(f, "memo"),
            CutStrategy::Table => write!(f, "table"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPlan {
    pub max_profit: u64,
    /// Piece lengths, ascending.
    pub cuts: Vec<usize>,
    pub number_of_cuts: usize,
}

impl CutPlan {
    pub fn new(max_profit: u64, mut cuts: Vec<usize>) -> Self {
        cuts.sort_unstable();
        // Counts cut operations (pieces - 1), not pieces. Kept for
        // compatibility with existing consumers of this field.
        let number_of_cuts = cuts.len().saturating_sub(1);
        Self {
            max_profit,
            cuts,
            number_of_cuts,
        }
    }

    pub fn total_length(&self) -> usize {
        self.cuts.iter().sum()
    }
}

/// Integral JSON number. Integers are taken exactly; floats only when they
/// have no fractional part (e.g. `120.0`).
enum Integral {
    Exact(serde_json::Number),
    Float(f64),
}

fn integral_from_number<'de, D>(deserializer: D) -> Result<Integral, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if number.is_u64() || number.is_i64() {
        return Ok(Integral::Exact(number));
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(Integral::Float(value)),
        _ => Err(serde::de::Error::custom(format!(
            "expected an integer, got {number}"
        ))),
    }
}

pub fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match integral_from_number(deserializer)? {
        Integral::Exact(n) => n.as_i64(),
        // i64::MIN as f64 is exactly -2^63; i64::MAX as f64 rounds up to 2^63.
        Integral::Float(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Some(f as i64),
        Integral::Float(_) => None,
    };
    value.ok_or_else(|| serde::de::Error::custom("integer out of range for i64"))
}

pub fn deserialize_u64_from_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match integral_from_number(deserializer)? {
        Integral::Exact(n) => n.as_u64(),
        // u64::MAX as f64 rounds up to 2^64, which must be rejected.
        Integral::Float(f) if f >= 0.0 && f < u64::MAX as f64 => Some(f as u64),
        Integral::Float(_) => None,
    };
    value.ok_or_else(|| serde::de::Error::custom("expected a non-negative integer in range"))
}

pub fn deserialize_usize_from_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserialize_u64_from_number(deserializer)?;
    usize::try_from(value).map_err(serde::de::Error::custom)
}
