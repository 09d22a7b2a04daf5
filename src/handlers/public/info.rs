// handlers/public/info.rs - GET / and GET /health

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, response::Json, Extension};
use serde_json::{json, Value};

use crate::services::Tracker;

/// GET / - Service description and route map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Bangaru Kutumbam Tracker",
            "version": version,
            "description": "Data entry and reporting for Bangaru Kutumbam program metrics",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public)",
                "data": "/api/data[/:row], /api/data/options",
                "records": "/api/records/:id",
                "root": "/api/root/initialize",
            }
        }
    }))
}

/// GET /health - Backend reachability and workbook status
pub async fn health(Extension(tracker): Extension<Arc<Tracker>>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let spreadsheet_id = tracker.spreadsheet_id().await;

    match tracker.backend().health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok",
                    "spreadsheetId": spreadsheet_id
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
