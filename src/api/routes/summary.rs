use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::CounterTable;
use crate::storage::SummaryStore;

/// `GET /api/summary`: the full aggregate count table.
///
/// Every catalog item type is present with one entry per stage in order,
/// zero-filled where the store has no rows. Store failures surface as a
/// structured 500 body.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<CounterTable>, ApiError> {
    let store = SummaryStore::new(&state.storage);
    let table = store
        .load_table(&state.catalog)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("Served summary for {} item types", state.catalog.item_types.len());
    Ok(Json(table))
}
