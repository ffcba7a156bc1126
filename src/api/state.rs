use std::sync::Arc;

use crate::config::UpgradeCatalog;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub catalog: Arc<UpgradeCatalog>,
}
