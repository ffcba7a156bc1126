//! Success/fail count tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::UpgradeCatalog;

/// Success/fail tally for one (item type, upgrade stage) pair.
///
/// Counts are unsigned: the non-negativity invariant is carried by the
/// type, and [`CounterTable::adjust`] clamps at zero instead of erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub success: u32,
    pub fail: u32,
}

impl StageCount {
    pub fn new(success: u32, fail: u32) -> Self {
        Self { success, fail }
    }

    /// Total attempts recorded for this stage.
    pub fn total(&self) -> u32 {
        self.success + self.fail
    }
}

/// Which side of a [`StageCount`] an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Success,
    Fail,
}

/// Mapping from item-type label to per-stage counts, indices aligned with
/// the catalog's stage order.
///
/// Serializes transparently as the map itself, which is the exact wire
/// shape of the summary endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterTable {
    counts: BTreeMap<String, Vec<StageCount>>,
}

impl CounterTable {
    /// An empty table with no item entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with a zeroed stage row for every item type in the catalog.
    pub fn zeroed(catalog: &UpgradeCatalog) -> Self {
        let counts = catalog
            .item_types
            .iter()
            .map(|item| (item.clone(), vec![StageCount::default(); catalog.stage_count()]))
            .collect();
        Self { counts }
    }

    /// The built-in sample table for the default catalog.
    ///
    /// Doubles as the view placeholder shown until the first summary fetch
    /// resolves, and as the `seed` payload.
    pub fn sample() -> Self {
        let rows: [(&str, [(u32, u32); 6]); 3] = [
            (
                "weapon",
                [(90, 10), (85, 15), (80, 20), (25, 25), (16, 24), (2, 18)],
            ),
            (
                "armor",
                [(45, 5), (40, 10), (35, 15), (20, 20), (12, 18), (1, 19)],
            ),
            (
                "accessory",
                [(60, 40), (55, 45), (50, 50), (15, 35), (8, 32), (0, 20)],
            ),
        ];

        let counts = rows
            .into_iter()
            .map(|(item, stages)| {
                (
                    item.to_string(),
                    stages.into_iter().map(|(s, f)| StageCount::new(s, f)).collect(),
                )
            })
            .collect();
        Self { counts }
    }

    /// Whether the table has an entry for this item type.
    pub fn contains_item(&self, item_type: &str) -> bool {
        self.counts.contains_key(item_type)
    }

    /// Per-stage counts for an item type, if present.
    pub fn stages(&self, item_type: &str) -> Option<&[StageCount]> {
        self.counts.get(item_type).map(Vec::as_slice)
    }

    /// The count for one (item type, stage) pair, if present.
    pub fn get(&self, item_type: &str, stage_idx: usize) -> Option<StageCount> {
        self.counts
            .get(item_type)
            .and_then(|stages| stages.get(stage_idx))
            .copied()
    }

    /// Iterate item entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StageCount])> {
        self.counts.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Return a new table with `stages` set for `item_type`.
    pub fn with_item(&self, item_type: &str, stages: Vec<StageCount>) -> Self {
        let mut counts = self.counts.clone();
        counts.insert(item_type.to_string(), stages);
        Self { counts }
    }

    /// Return a new table equal to this one except the targeted field of the
    /// targeted stage becomes `max(0, old + delta)`.
    ///
    /// Does not mutate `self`: callers rely on receiving a distinct value to
    /// detect change. Unknown item labels and out-of-range stage indices are
    /// programming errors (call sites are bounded by the catalog
    /// enumerations) and panic.
    pub fn adjust(
        &self,
        item_type: &str,
        stage_idx: usize,
        field: CountField,
        delta: i32,
    ) -> Self {
        let mut counts = self.counts.clone();
        let stages = counts
            .get_mut(item_type)
            .unwrap_or_else(|| panic!("unknown item type: {}", item_type));
        let count = &mut stages[stage_idx];

        match field {
            CountField::Success => count.success = count.success.saturating_add_signed(delta),
            CountField::Fail => count.fail = count.fail.saturating_add_signed(delta),
        }

        Self { counts }
    }
}
