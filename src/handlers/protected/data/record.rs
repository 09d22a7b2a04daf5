// handlers/protected/data/record.rs - Keyed row handlers
//
// Rows are addressed by the durable id returned with every listed row, so
// the target survives deletes above it.

use std::sync::Arc;

use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::error::{ApiError, ValidatedJson, ValidatedPath};
use crate::record::DataEntry;
use crate::services::Tracker;
use crate::types::OpResult;

/// PUT /api/records/:id - Overwrite the row carrying `id`
pub async fn record_put(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(entry): ValidatedJson<DataEntry>,
) -> Result<Json<OpResult>, ApiError> {
    Ok(Json(tracker.update_data_entry_by_id(id, entry).await))
}

/// DELETE /api/records/:id - Remove the row carrying `id`
pub async fn record_delete(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<OpResult>, ApiError> {
    Ok(Json(tracker.delete_data_entry_by_id(id).await))
}
