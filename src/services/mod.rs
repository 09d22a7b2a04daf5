pub mod auth_service;
pub mod bootstrap_service;
pub mod entry_service;
pub mod query_service;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::schema::{self, DATA_SHEET, WIDTH};
use crate::store::{SheetBackend, StoreError, StoredRow};

/// Entry point for every boundary operation.
///
/// Holds the sheet backend, the workbook identifier resolved at startup, and
/// the writer lock that serializes all read-modify-write sequences. Operation
/// groups live in the sibling modules as further `impl Tracker` blocks.
pub struct Tracker {
    backend: Arc<dyn SheetBackend>,
    spreadsheet_id: RwLock<Option<String>>,
    writer: Mutex<()>,
}

impl Tracker {
    pub fn new(backend: Arc<dyn SheetBackend>, spreadsheet_id: Option<String>) -> Self {
        Self {
            backend,
            spreadsheet_id: RwLock::new(spreadsheet_id),
            writer: Mutex::new(()),
        }
    }

    /// Resolves the workbook identifier once: explicit configuration first,
    /// then the persisted property.
    pub async fn from_config(backend: Arc<dyn SheetBackend>, config: &StoreConfig) -> Result<Self, StoreError> {
        let spreadsheet_id = match &config.spreadsheet_id {
            Some(id) => Some(id.clone()),
            None => backend.get_property(schema::SPREADSHEET_ID_PROPERTY).await?,
        };

        match &spreadsheet_id {
            Some(id) => tracing::info!("Using spreadsheet {}", id),
            None => tracing::warn!("No spreadsheet configured; run initialize before use"),
        }

        Ok(Self::new(backend, spreadsheet_id))
    }

    pub fn backend(&self) -> &dyn SheetBackend {
        self.backend.as_ref()
    }

    pub async fn spreadsheet_id(&self) -> Option<String> {
        self.spreadsheet_id.read().await.clone()
    }

    /// Opened workbook identifier, or the fault a data operation reports
    async fn workbook(&self) -> Result<String, StoreError> {
        let id = self.spreadsheet_id().await.ok_or(StoreError::NotConfigured)?;
        self.backend.open_workbook(&id).await?;
        Ok(id)
    }

    async fn has_data_sheet(&self, workbook: &str) -> Result<bool, StoreError> {
        self.backend.has_sheet(workbook, DATA_SHEET).await
    }

    async fn create_data_sheet(&self, workbook: &str) -> Result<(), StoreError> {
        self.backend.insert_sheet(workbook, DATA_SHEET).await?;
        self.backend
            .write_rows(workbook, DATA_SHEET, 1, vec![schema::header_row()])
            .await?;
        tracing::info!("Created sheet {} in {}", DATA_SHEET, workbook);
        Ok(())
    }

    /// All rows below the header, fitted to the schema width
    async fn data_rows(&self, workbook: &str) -> Result<Vec<StoredRow>, StoreError> {
        let last = self.backend.last_row(workbook, DATA_SHEET).await?;
        if last <= 1 {
            return Ok(Vec::new());
        }
        self.backend
            .read_rows(workbook, DATA_SHEET, 2, last - 1, WIDTH)
            .await
    }
}
