pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod record;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod testing;
