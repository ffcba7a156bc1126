//! Dashboard view state.
//!
//! Holds the two independently-lived count tables behind the dashboard:
//! the server-sourced summary (installed wholesale once, read-only after)
//! and the locally edited form counts (lazily seeded per item type from
//! the placeholder, never persisted). Mutations go through the pure
//! [`CounterTable::adjust`] transform and the view stores the new value,
//! so every edit is a fresh table and the previous one is untouched.

use tracing::warn;

use crate::config::UpgradeCatalog;
use crate::fetch::FetchError;
use crate::models::{CountField, CounterTable, StageCount};
use crate::present::{self, DonutSeries};

/// View state for the upgrade dashboard.
pub struct DashboardView {
    catalog: UpgradeCatalog,

    /// Shown until the summary fetch resolves, and the seed for lazily
    /// created local rows.
    placeholder: CounterTable,

    /// Server-sourced counts; replaced exactly once on a successful fetch.
    server_counts: CounterTable,
    summary_installed: bool,

    /// Locally edited counts, only containing item types the user touched.
    form_counts: CounterTable,

    /// Last fetch failure, surfaced to the user as a non-fatal notice.
    fetch_error: Option<String>,

    torn_down: bool,
}

impl DashboardView {
    /// Create a view showing `placeholder` until a summary is installed.
    pub fn new(catalog: UpgradeCatalog, placeholder: CounterTable) -> Self {
        Self {
            catalog,
            server_counts: placeholder.clone(),
            placeholder,
            summary_installed: false,
            form_counts: CounterTable::new(),
            fetch_error: None,
            torn_down: false,
        }
    }

    /// Install the outcome of the one-shot summary fetch.
    ///
    /// A successful table replaces the server-sourced counts wholesale,
    /// exactly once; results arriving after teardown or after a previous
    /// install are discarded. A failure keeps the current table and sets
    /// the observable error flag.
    pub fn install_summary(&mut self, result: Result<CounterTable, FetchError>) {
        if self.torn_down {
            warn!("Discarding summary fetched after view teardown");
            return;
        }
        if self.summary_installed {
            warn!("Discarding summary: one already installed");
            return;
        }

        match result {
            Ok(table) => {
                self.server_counts = table;
                self.summary_installed = true;
                self.fetch_error = None;
            }
            Err(e) => {
                warn!("Summary fetch failed, keeping placeholder: {}", e);
                self.fetch_error = Some(e.to_string());
            }
        }
    }

    /// Whether a fetched summary has been installed.
    pub fn summary_installed(&self) -> bool {
        self.summary_installed
    }

    /// The last fetch failure, if any.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// The server-sourced table currently on display.
    pub fn server_counts(&self) -> &CounterTable {
        &self.server_counts
    }

    /// Apply one counter edit: the targeted field moves by `delta`,
    /// clamped at zero.
    ///
    /// The item's local row is seeded from the placeholder on first touch.
    /// Item types and stage indices come from the catalog enumerations;
    /// anything else is a programming error and panics.
    pub fn adjust(&mut self, item_type: &str, stage_idx: usize, field: CountField, delta: i32) {
        let seeded = if self.form_counts.contains_item(item_type) {
            self.form_counts.clone()
        } else {
            self.form_counts
                .with_item(item_type, self.placeholder_stages(item_type).to_vec())
        };

        self.form_counts = seeded.adjust(item_type, stage_idx, field, delta);
    }

    /// The locally edited counts for an item type, falling back to the
    /// placeholder until the item is first touched.
    pub fn local_counts(&self, item_type: &str) -> &[StageCount] {
        self.form_counts
            .stages(item_type)
            .unwrap_or_else(|| self.placeholder_stages(item_type))
    }

    /// Donut series for one stage of the server-sourced counts.
    pub fn donut_series(&self, item_type: &str, stage_idx: usize) -> DonutSeries {
        let count = self.server_stage(item_type, stage_idx);
        present::donut_series(count, self.catalog.reference_rate(stage_idx))
    }

    /// Caption for one stage of the server-sourced counts.
    pub fn rate_caption(&self, item_type: &str, stage_idx: usize) -> String {
        let count = self.server_stage(item_type, stage_idx);
        present::rate_caption(count, self.catalog.reference_rate(stage_idx))
    }

    /// Produce the submission report over the locally edited counts, every
    /// catalog item type included (untouched items report the placeholder).
    pub fn submit(&self) -> String {
        let mut complete = self.form_counts.clone();
        for item in &self.catalog.item_types {
            if !complete.contains_item(item) {
                complete = complete.with_item(item, self.placeholder_stages(item).to_vec());
            }
        }
        present::render_report(&complete, &self.catalog)
    }

    /// Tear the view down; late fetch results are discarded from here on.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    fn placeholder_stages(&self, item_type: &str) -> &[StageCount] {
        self.placeholder
            .stages(item_type)
            .unwrap_or_else(|| panic!("item type not in placeholder table: {}", item_type))
    }

    fn server_stage(&self, item_type: &str, stage_idx: usize) -> StageCount {
        self.server_counts
            .get(item_type, stage_idx)
            .unwrap_or_default()
    }
}
