use crate::types::{CutPlan, Schedule};

const MAX_WIDTH: f64 = 80.0;

/// Draws the rod as a bar of pieces, scaled to fit the terminal.
///
/// ```text
/// +--+---+
/// |2 |3  |
/// +--+---+
/// ```
pub fn render_rod(plan: &CutPlan) -> String {
    let length = plan.total_length();
    if length == 0 {
        return String::new();
    }

    // Every piece needs at least one column between its borders.
    let scale = f64::max(MAX_WIDTH / length as f64, 1.0).min(4.0);
    let widths: Vec<usize> = plan
        .cuts
        .iter()
        .map(|&c| ((c as f64 * scale).round() as usize).max(1))
        .collect();

    let mut border = String::from("+");
    let mut body = String::from("|");
    for (&cut, &w) in plan.cuts.iter().zip(&widths) {
        border.push_str(&"-".repeat(w));
        border.push('+');

        let label = cut.to_string();
        if label.len() <= w {
            body.push_str(&format!("{label:<w$}"));
        } else {
            body.push_str(&" ".repeat(w));
        }
        body.push('|');
    }

    format!("{border}\n{body}\n{border}\n")
}

/// One line per batch, in processing order.
pub fn render_schedule(schedule: &Schedule) -> String {
    let mut out = String::new();
    let mut n = 0;
    for level in &schedule.levels {
        for batch in &level.batches {
            n += 1;
            let ids: Vec<&str> = batch.jobs.iter().map(|j| j.id.as_str()).collect();
            out.push_str(&format!(
                "Batch {n} [priority {}]: {} (volume {}, {} min)\n",
                level.priority,
                ids.join(", "),
                batch.volume,
                batch.completion_time(),
            ));
        }
    }
    out
}
