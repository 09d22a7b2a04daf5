// handlers/protected/data/options.rs - GET /api/data/options handler

use std::sync::Arc;

use axum::{response::Json, Extension};

use crate::services::Tracker;
use crate::types::FilterOptions;

/// GET /api/data/options - Distinct values for the filter dropdowns
pub async fn options_get(Extension(tracker): Extension<Arc<Tracker>>) -> Json<FilterOptions> {
    Json(tracker.get_filter_options().await)
}
