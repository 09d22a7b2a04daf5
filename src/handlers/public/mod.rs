// handlers/public/mod.rs - Public handlers
//
// Service information, liveness and credential checks.
// Route Prefix: No /api prefix (e.g., /auth/login, /health)

pub mod auth;
pub mod info;

pub use auth::*;
pub use info::*;
