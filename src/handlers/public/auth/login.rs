// handlers/public/auth/login.rs - POST /auth/login handler

use std::sync::Arc;

use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidatedJson};
use crate::services::Tracker;
use crate::types::LoginResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/**
 * POST /auth/login - Check a username/password pair
 *
 * Expected Input:
 * ```json
 * { "username": "mandal1", "password": "password1" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * { "success": true, "user": { "username": "mandal1", "mandal": "Mandal1", "role": "admin" } }
 * ```
 *
 * Rejected pairs and store faults answer `{ "success": false, "message": ... }`
 * with status 200.
 */
pub async fn login_post(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResult>, ApiError> {
    Ok(Json(tracker.login(&payload.username, &payload.password).await))
}
