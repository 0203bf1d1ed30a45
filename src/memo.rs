use crate::error::{OptimizeError, Result};
use crate::types::{CutPlan, PriceTable};

/// Best revenue for one sub-length and the first piece that achieves it.
#[derive(Debug, Clone, Copy)]
struct Choice {
    value: u64,
    first: usize,
}

/// A sub-length whose candidates are being tried, `first` being the next one.
#[derive(Debug)]
struct Frame {
    n: usize,
    first: usize,
    best: Choice,
    /// Set while a child frame computes `n - first`.
    waiting: bool,
}

impl Frame {
    fn new(n: usize) -> Self {
        Self {
            n,
            first: 1,
            best: Choice { value: 0, first: 1 },
            waiting: false,
        }
    }
}

/// Top-down rod cutter. The cache lives in the cutter, so each solve owns
/// its own memo table and nothing is shared between calls.
///
/// The descent runs on an explicit stack of frames, so rod length is bounded
/// by heap, not by the thread's stack.
pub struct MemoizedCutter<'a> {
    prices: &'a PriceTable,
    memo: Vec<Option<Choice>>,
    hits: usize,
}

impl<'a> MemoizedCutter<'a> {
    /// `prices` must cover every length up to `length`.
    pub fn new(prices: &'a PriceTable, length: usize) -> Self {
        Self {
            prices,
            memo: vec![None; length + 1],
            hits: 0,
        }
    }

    /// Returns the plan and how many sub-lengths were served from the cache.
    pub fn solve(mut self) -> Result<(CutPlan, usize)> {
        let length = self.memo.len() - 1;
        if length == 0 {
            return Ok((CutPlan::new(0, Vec::new()), 0));
        }
        self.fill(length)?;

        let mut cuts = Vec::new();
        let mut rest = length;
        let mut max_profit = 0;
        while rest > 0 {
            // Filling a length fills every shorter one.
            let Some(choice) = self.memo[rest] else {
                break;
            };
            if rest == length {
                max_profit = choice.value;
            }
            cuts.push(choice.first);
            rest -= choice.first;
        }
        Ok((CutPlan::new(max_profit, cuts), self.hits))
    }

    fn fill(&mut self, length: usize) -> Result<()> {
        let mut stack = vec![Frame::new(length)];

        while let Some(frame) = stack.last_mut() {
            if frame.first > frame.n {
                let (n, best) = (frame.n, frame.best);
                self.memo[n] = Some(best);
                stack.pop();
                continue;
            }

            let rest = frame.n - frame.first;
            let rest_value = if rest == 0 {
                0
            } else if let Some(cached) = self.memo[rest] {
                if !std::mem::take(&mut frame.waiting) {
                    self.hits += 1;
                }
                cached.value
            } else {
                frame.waiting = true;
                stack.push(Frame::new(rest));
                continue;
            };

            let value = self
                .prices
                .price(frame.first)
                .checked_add(rest_value)
                .ok_or(OptimizeError::Overflow("rod revenue"))?;
            // The first candidate always seeds the best; later ones must beat
            // it strictly, so ties keep the shortest first piece.
            if frame.first == 1 || value > frame.best.value {
                frame.best = Choice {
                    value,
                    first: frame.first,
                };
            }
            frame.first += 1;
        }

        Ok(())
    }
}
