// handlers/elevated/root/initialize.rs - POST /api/root/initialize handler

use std::sync::Arc;

use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::Tracker;

/**
 * POST /api/root/initialize - Ensure the workbook, sheets and seed data exist
 *
 * Expected Output:
 * ```json
 * { "success": true, "data": { "spreadsheetId": "..." } }
 * ```
 *
 * Repeated calls return the same identifier and add nothing. Store faults
 * surface as an error status.
 */
pub async fn initialize_post(Extension(tracker): Extension<Arc<Tracker>>) -> Result<Json<Value>, ApiError> {
    let spreadsheet_id = tracker.initialize_spreadsheet().await?;
    Ok(Json(json!({
        "success": true,
        "data": { "spreadsheetId": spreadsheet_id }
    })))
}
