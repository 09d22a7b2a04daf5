pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

/// Errors raised by a sheet backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Spreadsheet ID is not configured")]
    NotConfigured,

    #[error("Workbook not found: {0}")]
    WorkbookNotFound(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Sheet already exists: {0}")]
    SheetExists(String),

    #[error("Invalid row number: {0}")]
    InvalidRow(usize),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Corrupt row data: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A single spreadsheet value. Blank cells are the empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(i64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn blank() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    /// Strict equality against a text value; numbers never match text
    pub fn eq_text(&self, value: &str) -> bool {
        matches!(self, Cell::Text(s) if s == value)
    }

    /// Integer view, parsing text cells and treating anything else as 0
    pub fn as_count(&self) -> i64 {
        match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// A row as read back from a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    /// 1-based position in the sheet
    pub position: usize,
    /// Durable key assigned on first write; `None` for gap rows never written
    pub key: Option<Uuid>,
    pub cells: Vec<Cell>,
}

impl StoredRow {
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

/// Row capacity of a sheet unless configured otherwise
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Last position covered by `count` rows starting at `start`.
///
/// Fails with `InvalidRow(start)` when `start` is 0 or the span reaches past
/// `max_rows`.
pub fn span_end(start: usize, count: usize, max_rows: usize) -> Result<usize, StoreError> {
    if start == 0 {
        return Err(StoreError::InvalidRow(start));
    }
    match start.checked_add(count) {
        Some(end) if end - 1 <= max_rows => Ok(end - 1),
        _ => Err(StoreError::InvalidRow(start)),
    }
}

/// Pads or truncates cells to exactly `width` columns
pub fn fit_width(mut cells: Vec<Cell>, width: usize) -> Vec<Cell> {
    cells.resize(width, Cell::blank());
    cells
}

/// Storage seam: a set of workbooks, each holding named sheets of rows, plus a
/// flat property map for process-wide settings.
///
/// Rows are addressed by 1-based position. `last_row` is the position of the
/// last row written, so gaps left by writing past the end read back blank.
/// Positions beyond the backend's row capacity are `InvalidRow`.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    async fn get_property(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Creates an empty workbook and returns its identifier
    async fn create_workbook(&self, title: &str) -> Result<String, StoreError>;

    /// Fails with `WorkbookNotFound` when the identifier is unknown
    async fn open_workbook(&self, workbook: &str) -> Result<(), StoreError>;

    async fn has_sheet(&self, workbook: &str, sheet: &str) -> Result<bool, StoreError>;

    async fn insert_sheet(&self, workbook: &str, sheet: &str) -> Result<(), StoreError>;

    async fn last_row(&self, workbook: &str, sheet: &str) -> Result<usize, StoreError>;

    /// Reads `count` rows starting at `start`, each fitted to `width` cells
    async fn read_rows(
        &self,
        workbook: &str,
        sheet: &str,
        start: usize,
        count: usize,
        width: usize,
    ) -> Result<Vec<StoredRow>, StoreError>;

    /// Writes consecutive rows starting at `start`, keeping the key of any row
    /// overwritten in place
    async fn write_rows(
        &self,
        workbook: &str,
        sheet: &str,
        start: usize,
        rows: Vec<Vec<Cell>>,
    ) -> Result<(), StoreError>;

    /// Removes the row at `position`, shifting later rows up by one
    async fn delete_row(&self, workbook: &str, sheet: &str, position: usize) -> Result<(), StoreError>;

    /// Current position of the row carrying `key`
    async fn find_row(&self, workbook: &str, sheet: &str, key: Uuid) -> Result<Option<usize>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Builds the backend selected by configuration
pub async fn open_backend(config: &StoreConfig) -> Result<Arc<dyn SheetBackend>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory sheet backend");
            Ok(Arc::new(MemoryBackend::with_max_rows(config.max_rows)))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
            let backend = PgBackend::connect(
                url,
                config.max_connections,
                config.connection_timeout,
                config.max_rows,
            )
            .await?;
            Ok(Arc::new(backend))
        }
    }
}
