use crate::schema::{self, CREDENTIALS_SHEET, DATA_SHEET, SPREADSHEET_ID_PROPERTY, WORKBOOK_TITLE};
use crate::store::StoreError;

use super::Tracker;

impl Tracker {
    /// Ensures the workbook, both sheets, their headers and the seed rows
    /// exist, and returns the workbook identifier.
    ///
    /// Safe to call repeatedly: nothing already present is rewritten.
    pub async fn initialize_spreadsheet(&self) -> Result<String, StoreError> {
        let _guard = self.writer.lock().await;

        let workbook = self.resolve_or_create_workbook().await?;
        let backend = self.backend();

        if !backend.has_sheet(&workbook, DATA_SHEET).await? {
            self.create_data_sheet(&workbook).await?;
        } else if backend.last_row(&workbook, DATA_SHEET).await? == 0 {
            backend
                .write_rows(&workbook, DATA_SHEET, 1, vec![schema::header_row()])
                .await?;
        }

        if !backend.has_sheet(&workbook, CREDENTIALS_SHEET).await? {
            backend.insert_sheet(&workbook, CREDENTIALS_SHEET).await?;
            let mut rows = vec![schema::credential_header_row()];
            rows.extend(schema::seed_credentials());
            backend.write_rows(&workbook, CREDENTIALS_SHEET, 1, rows).await?;
            tracing::info!("Created sheet {} with sample logins", CREDENTIALS_SHEET);
        }

        if backend.last_row(&workbook, DATA_SHEET).await? <= 1 {
            backend
                .write_rows(&workbook, DATA_SHEET, 2, schema::seed_rows())
                .await?;
            tracing::info!("Seeded {} with sample rows", DATA_SHEET);
        }

        tracing::info!("Spreadsheet {} initialized", workbook);
        Ok(workbook)
    }

    async fn resolve_or_create_workbook(&self) -> Result<String, StoreError> {
        let backend = self.backend();

        let known = match self.spreadsheet_id().await {
            Some(id) => Some(id),
            None => backend.get_property(SPREADSHEET_ID_PROPERTY).await?,
        };

        let workbook = match known {
            Some(id) => {
                backend.open_workbook(&id).await?;
                id
            }
            None => {
                let id = backend.create_workbook(WORKBOOK_TITLE).await?;
                backend.set_property(SPREADSHEET_ID_PROPERTY, &id).await?;
                tracing::info!("Created workbook {} ({})", WORKBOOK_TITLE, id);
                id
            }
        };

        *self.spreadsheet_id.write().await = Some(workbook.clone());
        Ok(workbook)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::schema::{self, CREDENTIALS_SHEET, DATA_SHEET, SPREADSHEET_ID_PROPERTY, WIDTH, WORKBOOK_TITLE};
    use crate::services::Tracker;
    use crate::store::{Cell, MemoryBackend, SheetBackend, StoreError};
    use crate::testing::TestContext;

    #[tokio::test]
    async fn creates_and_records_workbook() {
        let backend = Arc::new(MemoryBackend::new());
        let tracker = Tracker::new(backend.clone(), None);

        let id = tracker.initialize_spreadsheet().await.unwrap();
        assert_eq!(tracker.spreadsheet_id().await.as_deref(), Some(id.as_str()));
        assert_eq!(
            backend.get_property(SPREADSHEET_ID_PROPERTY).await.unwrap().as_deref(),
            Some(id.as_str())
        );
        assert_eq!(backend.workbook_title(&id).await.unwrap(), WORKBOOK_TITLE);

        let rows = backend.read_rows(&id, DATA_SHEET, 1, 4, WIDTH).await.unwrap();
        assert_eq!(rows[0].cells, schema::header_row());
        assert_eq!(rows[1].cells[4], Cell::text("EMP001"));
        assert_eq!(rows[3].cells[5], Cell::text("Bob Johnson"));

        assert_eq!(backend.last_row(&id, CREDENTIALS_SHEET).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let ctx = TestContext::bootstrapped().await;
        let first = ctx.spreadsheet_id().await;
        let before = ctx.backend.read_rows(&first, DATA_SHEET, 1, 4, WIDTH).await.unwrap();

        let second = ctx.tracker.initialize_spreadsheet().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.backend.last_row(&first, DATA_SHEET).await.unwrap(), 4);
        assert_eq!(ctx.backend.last_row(&first, CREDENTIALS_SHEET).await.unwrap(), 4);
        assert_eq!(ctx.backend.read_rows(&first, DATA_SHEET, 1, 4, WIDTH).await.unwrap(), before);
    }

    #[tokio::test]
    async fn reuses_persisted_workbook_id() {
        let backend = Arc::new(MemoryBackend::new());
        let existing = backend.create_workbook("Existing").await.unwrap();
        backend.set_property(SPREADSHEET_ID_PROPERTY, &existing).await.unwrap();

        let tracker = Tracker::new(backend.clone(), None);
        assert_eq!(tracker.initialize_spreadsheet().await.unwrap(), existing);
        assert_eq!(backend.workbook_title(&existing).await.unwrap(), "Existing");
    }

    #[tokio::test]
    async fn existing_credentials_are_not_reseeded() {
        let ctx = TestContext::with_empty_workbook().await;
        let workbook = ctx.spreadsheet_id().await;
        ctx.backend.insert_sheet(&workbook, CREDENTIALS_SHEET).await.unwrap();
        ctx.backend
            .write_rows(&workbook, CREDENTIALS_SHEET, 1, vec![vec![Cell::text("only"), Cell::text("me")]])
            .await
            .unwrap();

        ctx.tracker.initialize_spreadsheet().await.unwrap();
        assert_eq!(ctx.backend.last_row(&workbook, CREDENTIALS_SHEET).await.unwrap(), 1);
        assert_eq!(ctx.backend.last_row(&workbook, DATA_SHEET).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn data_rows_are_not_reseeded() {
        let ctx = TestContext::bootstrapped().await;
        for row in [4, 3, 2] {
            assert!(ctx.tracker.delete_data_entry(row).await.is_success());
        }
        assert!(ctx
            .tracker
            .save_data_entry(crate::record::DataEntry::default())
            .await
            .is_success());

        ctx.tracker.initialize_spreadsheet().await.unwrap();
        let workbook = ctx.spreadsheet_id().await;
        assert_eq!(ctx.backend.last_row(&workbook, DATA_SHEET).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_configured_workbook_is_a_fault() {
        let backend = Arc::new(MemoryBackend::new());
        let tracker = Tracker::new(backend, Some("missing".to_string()));
        assert!(matches!(
            tracker.initialize_spreadsheet().await,
            Err(StoreError::WorkbookNotFound(_))
        ));
    }
}
