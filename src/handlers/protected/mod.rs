// handlers/protected/mod.rs - Data entry and reporting handlers
//
// Route Prefix: /api/data/* (positional rows) and /api/records/* (durable keys)
// Session enforcement is left to the hosting layer.

pub mod data;

pub use data::*;
