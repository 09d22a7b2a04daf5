use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::store::StoreError;

/// Statements that create the sheet tables when they do not exist yet
const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS bk_properties (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS bk_workbooks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS bk_sheets (
        workbook_id TEXT NOT NULL REFERENCES bk_workbooks(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (workbook_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS bk_rows (
        workbook_id TEXT NOT NULL,
        sheet TEXT NOT NULL,
        position INTEGER NOT NULL,
        key UUID NOT NULL,
        cells JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (workbook_id, sheet, position),
        FOREIGN KEY (workbook_id, sheet) REFERENCES bk_sheets(workbook_id, name) ON DELETE CASCADE
    )",
];

/// Connection handling for the PostgreSQL sheet backend
pub struct DatabaseManager;

impl DatabaseManager {
    /// Opens a pool against `database_url` and ensures the sheet tables exist
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connection_timeout: u64,
    ) -> Result<PgPool, StoreError> {
        let target = Self::redacted_url(database_url)?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connection_timeout))
            .connect(database_url)
            .await?;

        Self::ensure_schema(&pool).await?;

        info!("Connected sheet backend to {}", target);
        Ok(pool)
    }

    async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Connection URL with the password masked, for logging
    pub fn redacted_url(database_url: &str) -> Result<String, StoreError> {
        let mut url = url::Url::parse(database_url).map_err(|_| StoreError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| StoreError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
