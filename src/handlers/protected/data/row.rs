// handlers/protected/data/row.rs - Positional row handlers
//
// POST   /api/data       - append an entry
// PUT    /api/data/:row  - overwrite the row at a 1-based position
// DELETE /api/data/:row  - remove the row at a 1-based position

use std::sync::Arc;

use axum::{response::Json, Extension};

use crate::error::{ApiError, ValidatedJson, ValidatedPath};
use crate::record::DataEntry;
use crate::services::Tracker;
use crate::types::OpResult;

pub async fn data_post(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedJson(entry): ValidatedJson<DataEntry>,
) -> Result<Json<OpResult>, ApiError> {
    Ok(Json(tracker.save_data_entry(entry).await))
}

pub async fn row_put(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedPath(row): ValidatedPath<usize>,
    ValidatedJson(entry): ValidatedJson<DataEntry>,
) -> Result<Json<OpResult>, ApiError> {
    Ok(Json(tracker.update_data_entry(row, entry).await))
}

pub async fn row_delete(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedPath(row): ValidatedPath<usize>,
) -> Result<Json<OpResult>, ApiError> {
    Ok(Json(tracker.delete_data_entry(row).await))
}
