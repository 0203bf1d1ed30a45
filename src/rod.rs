use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::memo::MemoizedCutter;
use crate::tabulated;
use crate::types::{CutPlan, CutStrategy, PriceTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RodRequest {
    pub length: usize,
    pub prices: PriceTable,
    #[serde(default)]
    pub strategy: CutStrategy,
}

impl RodRequest {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn check_prices(length: usize, prices: &PriceTable) -> Result<()> {
    if prices.max_length() < length {
        return Err(OptimizeError::PriceTableTooShort {
            length,
            available: prices.max_length(),
        });
    }
    Ok(())
}

/// Finds the most valuable way to cut a rod of `length` into integer pieces.
pub fn solve_rod_cutting(
    length: usize,
    prices: &PriceTable,
    strategy: CutStrategy,
) -> Result<CutPlan> {
    check_prices(length, prices)?;

    let plan = match strategy {
        CutStrategy::Memo => {
            let (plan, hits) = MemoizedCutter::new(prices, length).solve()?;
            tracing::debug!(length, memo_hits = hits, "memoized cut finished");
            plan
        }
        CutStrategy::Table => tabulated::solve(length, prices)?,
    };

    tracing::debug!(
        length,
        %strategy,
        max_profit = plan.max_profit,
        pieces = plan.cuts.len(),
        "rod cut"
    );
    Ok(plan)
}

/// Both strategies' answers for the same rod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyComparison {
    pub memo: CutPlan,
    pub table: CutPlan,
}

/// Runs both cutters and fails if they disagree on the best revenue.
pub fn compare_strategies(length: usize, prices: &PriceTable) -> Result<StrategyComparison> {
    let memo = solve_rod_cutting(length, prices, CutStrategy::Memo)?;
    let table = solve_rod_cutting(length, prices, CutStrategy::Table)?;
    if memo.max_profit != table.max_profit {
        return Err(OptimizeError::StrategyMismatch {
            memo: memo.max_profit,
            table: table.max_profit,
        });
    }
    Ok(StrategyComparison { memo, table })
}
