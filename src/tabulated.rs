use crate::error::{OptimizeError, Result};
use crate::types::{CutPlan, PriceTable};

/// `table[n]` is the best revenue for a rod of length `n`; `table[0] == 0`.
pub fn build_table(length: usize, prices: &PriceTable) -> Result<Vec<u64>> {
    let mut table = vec![0u64; length + 1];
    for n in 1..=length {
        let mut best = 0;
        for j in 0..n {
            let value = prices
                .price(j + 1)
                .checked_add(table[n - j - 1])
                .ok_or(OptimizeError::Overflow("rod revenue"))?;
            best = best.max(value);
        }
        table[n] = best;
    }
    Ok(table)
}

/// Walks a finished table back to one optimal set of pieces. At each step
/// the shortest piece consistent with the table is taken, the same choice
/// the top-down cutter makes on ties.
pub fn reconstruct_cuts(table: &[u64], prices: &PriceTable) -> Vec<usize> {
    let mut cuts = Vec::new();
    let mut remaining = table.len().saturating_sub(1);

    while remaining > 0 {
        let piece = (1..=remaining)
            .find(|&i| {
                prices.price(i).checked_add(table[remaining - i]) == Some(table[remaining])
            })
            .unwrap_or(remaining);
        cuts.push(piece);
        remaining -= piece;
    }

    cuts
}

/// Bottom-up rod cutter.
pub fn solve(length: usize, prices: &PriceTable) -> Result<CutPlan> {
    let table = build_table(length, prices)?;
    let cuts = reconstruct_cuts(&table, prices);
    Ok(CutPlan::new(table[length], cuts))
}
