//! Count-row storage.
//!
//! The summary store is a JSONL file: one JSON row per line, keyed
//! implicitly by (item type, stage index). The API reads the whole file
//! and aggregates it into a [`CounterTable`]; the `seed` command writes
//! rows. Nothing else touches the file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::UpgradeCatalog;
use crate::models::{CounterTable, StageCount};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join("upgrade_counts.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// One stored tally row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub item_type: String,
    pub stage: usize,
    pub success: u32,
    pub fail: u32,
}

/// Reader/writer for the aggregate count table.
pub struct SummaryStore {
    path: PathBuf,
}

impl SummaryStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.summary_path(),
        }
    }

    /// Whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all stored rows. A missing file reads as an empty row set.
    pub fn read_rows(&self) -> Result<Vec<CountRow>, StorageError> {
        if !self.path.exists() {
            debug!("No summary file at {:?}, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut rows = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(serde_json::from_str(&line)?);
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }

    /// Write rows, replacing the entire file.
    pub fn write_rows(&self, rows: &[CountRow]) -> Result<usize, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for row in rows {
            let json = serde_json::to_string(row)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} rows to {:?}", count, self.path);

        Ok(count)
    }

    /// Aggregate stored rows into a full table for the catalog.
    ///
    /// Every catalog item type is present in the result, zero-filled where
    /// the store has no rows. Duplicate (item, stage) keys are summed; rows
    /// outside the catalog are skipped with a warning.
    pub fn load_table(&self, catalog: &UpgradeCatalog) -> Result<CounterTable, StorageError> {
        let rows = self.read_rows()?;

        let mut table = CounterTable::zeroed(catalog);
        for row in rows {
            if row.stage >= catalog.stage_count() {
                warn!(
                    "Skipping row for {} stage {}: catalog has {} stages",
                    row.item_type,
                    row.stage,
                    catalog.stage_count()
                );
                continue;
            }
            let Some(stages) = table.stages(&row.item_type) else {
                warn!("Skipping row for unknown item type: {}", row.item_type);
                continue;
            };

            let mut stages = stages.to_vec();
            let entry = &mut stages[row.stage];
            *entry = StageCount::new(entry.success + row.success, entry.fail + row.fail);
            table = table.with_item(&row.item_type, stages);
        }

        Ok(table)
    }

    /// Flatten a table into rows, one per (item, stage) pair.
    pub fn rows_from_table(table: &CounterTable) -> Vec<CountRow> {
        table
            .iter()
            .flat_map(|(item, stages)| {
                stages.iter().enumerate().map(move |(stage, count)| CountRow {
                    item_type: item.to_string(),
                    stage,
                    success: count.success,
                    fail: count.fail,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SummaryStore {
        SummaryStore::new(&StorageConfig::new(dir.path().to_path_buf()))
    }

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        assert_eq!(
            config.summary_path(),
            PathBuf::from("/data/upgrade_counts.jsonl")
        );
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.exists());
        assert!(store.read_rows().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_rows() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let rows = vec![
            CountRow {
                item_type: "weapon".to_string(),
                stage: 0,
                success: 90,
                fail: 10,
            },
            CountRow {
                item_type: "armor".to_string(),
                stage: 5,
                success: 1,
                fail: 19,
            },
        ];
        assert_eq!(store.write_rows(&rows).unwrap(), 2);
        assert_eq!(store.read_rows().unwrap(), rows);
    }

    #[test]
    fn test_load_table_zero_fills_catalog() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let catalog = UpgradeCatalog::default();

        let table = store.load_table(&catalog).unwrap();
        assert_eq!(table, CounterTable::zeroed(&catalog));
    }

    #[test]
    fn test_load_table_sums_duplicate_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let catalog = UpgradeCatalog::default();

        let row = |s, f| CountRow {
            item_type: "weapon".to_string(),
            stage: 0,
            success: s,
            fail: f,
        };
        store.write_rows(&[row(3, 1), row(2, 4)]).unwrap();

        let table = store.load_table(&catalog).unwrap();
        assert_eq!(table.get("weapon", 0), Some(StageCount::new(5, 5)));
    }

    #[test]
    fn test_load_table_skips_rows_outside_catalog() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let catalog = UpgradeCatalog::default();

        store
            .write_rows(&[
                CountRow {
                    item_type: "relic".to_string(),
                    stage: 0,
                    success: 9,
                    fail: 9,
                },
                CountRow {
                    item_type: "weapon".to_string(),
                    stage: 99,
                    success: 9,
                    fail: 9,
                },
            ])
            .unwrap();

        let table = store.load_table(&catalog).unwrap();
        assert_eq!(table, CounterTable::zeroed(&catalog));
    }

    #[test]
    fn test_load_table_corrupt_line_errors() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(store.path.clone(), "not json\n").unwrap();
        assert!(store.load_table(&UpgradeCatalog::default()).is_err());
    }

    #[test]
    fn test_rows_from_table_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let catalog = UpgradeCatalog::default();

        let table = CounterTable::sample();
        store
            .write_rows(&SummaryStore::rows_from_table(&table))
            .unwrap();

        assert_eq!(store.load_table(&catalog).unwrap(), table);
    }
}
