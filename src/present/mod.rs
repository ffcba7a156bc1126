//! Presentation mapping.
//!
//! Turns count tables and rates into renderer-ready values: two-ring donut
//! series, the under-chart rate captions, and the plain-text submission
//! report. Everything here is pure formatting; no table is ever mutated.

use serde::Serialize;

use crate::calculate::observed_percent;
use crate::config::UpgradeCatalog;
use crate::models::{CounterTable, StageCount};

/// Segment labels shared by both donut rings, in data order.
pub const OUTCOME_LABELS: [&str; 2] = ["success", "fail"];

/// Data for one two-ring donut: raw observed counts on the inner ring,
/// the listed rate split as percentages on the outer ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSeries {
    /// `[success, fail]` as recorded
    pub observed: [u32; 2],
    /// `[rate * 100, (1 - rate) * 100]`
    pub reference: [f64; 2],
}

/// Build the donut series for one stage.
pub fn donut_series(count: StageCount, reference_rate: f64) -> DonutSeries {
    DonutSeries {
        observed: [count.success, count.fail],
        reference: [reference_rate * 100.0, (1.0 - reference_rate) * 100.0],
    }
}

/// The caption shown under a stage donut.
///
/// With no recorded attempts only the listed rate is shown; otherwise the
/// observed rate is shown alongside it, both to one decimal.
pub fn rate_caption(count: StageCount, reference_rate: f64) -> String {
    let listed = reference_rate * 100.0;
    if count.total() == 0 {
        format!("listed {:.1}%", listed)
    } else {
        format!("observed {:.1}% / listed {:.1}%", observed_percent(count), listed)
    }
}

/// Render the submission report: one block per catalog item type, one line
/// per stage in order.
pub fn render_report(table: &CounterTable, catalog: &UpgradeCatalog) -> String {
    catalog
        .item_types
        .iter()
        .map(|item| {
            let stages = table.stages(item).unwrap_or(&[]);
            let lines: Vec<String> = catalog
                .stage_labels
                .iter()
                .zip(stages.iter())
                .map(|(label, count)| {
                    format!("  {}: success {}, fail {}", label, count.success, count.fail)
                })
                .collect();
            format!("Item: {}\n{}", item, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
