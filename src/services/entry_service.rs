use uuid::Uuid;

use crate::record::DataEntry;
use crate::schema::{self, DATA_SHEET};
use crate::store::StoreError;
use crate::types::OpResult;

use super::Tracker;

/// Outcome of a keyed lookup performed under the writer lock
enum Located {
    Row(usize),
    NoSheet,
    Unknown,
}

impl Tracker {
    /// Appends the entry after the current last row, creating the sheet and
    /// header when needed.
    pub async fn save_data_entry(&self, entry: DataEntry) -> OpResult {
        let _guard = self.writer.lock().await;
        match self.append_entry(&entry).await {
            Ok(position) => {
                tracing::info!("Saved data entry at row {}", position);
                OpResult::done("Data saved successfully")
            }
            Err(e) => {
                tracing::error!("Error saving data: {}", e);
                OpResult::failed(format!("Error saving data: {}", e))
            }
        }
    }

    /// Overwrites the row at `row_number`. Positions past the end extend the sheet.
    pub async fn update_data_entry(&self, row_number: usize, entry: DataEntry) -> OpResult {
        let _guard = self.writer.lock().await;
        self.overwrite_entry(row_number, &entry).await
    }

    /// Removes the row at `row_number`; the header row is protected.
    pub async fn delete_data_entry(&self, row_number: usize) -> OpResult {
        let _guard = self.writer.lock().await;
        self.remove_entry(row_number).await
    }

    /// Overwrites the row carrying `id`, wherever it currently sits
    pub async fn update_data_entry_by_id(&self, id: Uuid, entry: DataEntry) -> OpResult {
        let _guard = self.writer.lock().await;
        match self.locate(id).await {
            Ok(Located::Row(position)) => self.overwrite_entry(position, &entry).await,
            Ok(Located::NoSheet) => OpResult::failed("Sheet not found"),
            Ok(Located::Unknown) => OpResult::failed("Row not found"),
            Err(e) => {
                tracing::error!("Error updating data: {}", e);
                OpResult::failed(format!("Error updating data: {}", e))
            }
        }
    }

    /// Removes the row carrying `id`, wherever it currently sits
    pub async fn delete_data_entry_by_id(&self, id: Uuid) -> OpResult {
        let _guard = self.writer.lock().await;
        match self.locate(id).await {
            Ok(Located::Row(position)) => self.remove_entry(position).await,
            Ok(Located::NoSheet) => OpResult::failed("Invalid row number or sheet not found"),
            Ok(Located::Unknown) => OpResult::failed("Row not found"),
            Err(e) => {
                tracing::error!("Error deleting data: {}", e);
                OpResult::failed(format!("Error deleting data: {}", e))
            }
        }
    }

    async fn append_entry(&self, entry: &DataEntry) -> Result<usize, StoreError> {
        let workbook = self.workbook().await?;
        if !self.has_data_sheet(&workbook).await? {
            self.create_data_sheet(&workbook).await?;
        }

        let backend = self.backend();
        if backend.last_row(&workbook, DATA_SHEET).await? == 0 {
            backend
                .write_rows(&workbook, DATA_SHEET, 1, vec![schema::header_row()])
                .await?;
        }

        let next = backend.last_row(&workbook, DATA_SHEET).await? + 1;
        backend
            .write_rows(&workbook, DATA_SHEET, next, vec![entry.to_cells()])
            .await?;
        Ok(next)
    }

    async fn overwrite_entry(&self, row_number: usize, entry: &DataEntry) -> OpResult {
        let result: Result<bool, StoreError> = async {
            let workbook = self.workbook().await?;
            if !self.has_data_sheet(&workbook).await? {
                return Ok(false);
            }
            self.backend()
                .write_rows(&workbook, DATA_SHEET, row_number, vec![entry.to_cells()])
                .await?;
            Ok(true)
        }
        .await;

        match result {
            Ok(true) => {
                tracing::info!("Updated data entry at row {}", row_number);
                OpResult::done("Data updated successfully")
            }
            Ok(false) => OpResult::failed("Sheet not found"),
            Err(e) => {
                tracing::error!("Error updating data: {}", e);
                OpResult::failed(format!("Error updating data: {}", e))
            }
        }
    }

    async fn remove_entry(&self, row_number: usize) -> OpResult {
        let result: Result<bool, StoreError> = async {
            let workbook = self.workbook().await?;
            if !self.has_data_sheet(&workbook).await? || row_number <= 1 {
                return Ok(false);
            }
            self.backend().delete_row(&workbook, DATA_SHEET, row_number).await?;
            Ok(true)
        }
        .await;

        match result {
            Ok(true) => {
                tracing::info!("Deleted data entry at row {}", row_number);
                OpResult::done("Data deleted successfully")
            }
            Ok(false) => OpResult::failed("Invalid row number or sheet not found"),
            Err(e) => {
                tracing::error!("Error deleting data: {}", e);
                OpResult::failed(format!("Error deleting data: {}", e))
            }
        }
    }

    async fn locate(&self, id: Uuid) -> Result<Located, StoreError> {
        let workbook = self.workbook().await?;
        if !self.has_data_sheet(&workbook).await? {
            return Ok(Located::NoSheet);
        }
        Ok(match self.backend().find_row(&workbook, DATA_SHEET, id).await? {
            // The header carries a key too; it is never addressable as data.
            Some(position) if position > 1 => Located::Row(position),
            _ => Located::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::filter::DataFilters;
    use crate::record::{DataEntry, DataRow};
    use crate::schema::{Column, DATA_SHEET, WIDTH};
    use crate::store::{Cell, SheetBackend};
    use crate::testing::TestContext;
    use crate::types::OpResult;

    fn entry(employee: &str) -> DataEntry {
        DataEntry {
            district_name: Some("District4".into()),
            mandal_name: Some("Mandal4".into()),
            employee_id: Some(employee.into()),
            employee_name: Some(format!("Employee {}", employee)),
            total_bangaru_kutumbam: Some(11),
            ..Default::default()
        }
    }

    async fn all_rows(ctx: &TestContext) -> Vec<DataRow> {
        ctx.tracker
            .get_data(DataFilters::default(), 1, 100)
            .await
            .unwrap()
            .data
    }

    #[tokio::test]
    async fn save_appends_with_defaults() {
        let ctx = TestContext::bootstrapped().await;
        let result = ctx.tracker.save_data_entry(entry("EMP100")).await;
        assert_eq!(result, OpResult::done("Data saved successfully"));

        let rows = all_rows(&ctx).await;
        assert_eq!(rows.len(), 4);
        let last = rows.last().unwrap();
        assert_eq!(last.row_number, 5);
        assert_eq!(last.values.employee_id, "EMP100");
        assert_eq!(last.values.secretariat_id, "");
        assert_eq!(last.values.total_bangaru_kutumbam, 11);
        assert_eq!(last.values.adopted_count, 0);

        let workbook = ctx.spreadsheet_id().await;
        let stored = ctx.backend.read_rows(&workbook, DATA_SHEET, 5, 1, WIDTH).await.unwrap();
        assert_eq!(stored[0].cells, entry("EMP100").to_cells());
        assert_eq!(stored[0].cells[Column::NeedsClosedCount.index()], Cell::Number(0));
    }

    #[tokio::test]
    async fn save_creates_missing_sheet_with_header() {
        let ctx = TestContext::with_empty_workbook().await;
        assert!(ctx.tracker.save_data_entry(entry("EMP1")).await.is_success());

        let workbook = ctx.spreadsheet_id().await;
        let rows = ctx.backend.read_rows(&workbook, DATA_SHEET, 1, 2, WIDTH).await.unwrap();
        assert_eq!(rows[0].cells, crate::schema::header_row());
        assert_eq!(rows[1].cells[Column::EmployeeId.index()], Cell::text("EMP1"));
    }

    #[tokio::test]
    async fn save_writes_header_into_empty_sheet() {
        let ctx = TestContext::with_empty_workbook().await;
        let workbook = ctx.spreadsheet_id().await;
        ctx.backend.insert_sheet(&workbook, DATA_SHEET).await.unwrap();

        assert!(ctx.tracker.save_data_entry(entry("EMP1")).await.is_success());
        assert_eq!(ctx.backend.last_row(&workbook, DATA_SHEET).await.unwrap(), 2);
        let header = ctx.backend.read_rows(&workbook, DATA_SHEET, 1, 1, WIDTH).await.unwrap();
        assert_eq!(header[0].cells, crate::schema::header_row());
    }

    #[tokio::test]
    async fn save_without_workbook_fails() {
        let ctx = TestContext::unconfigured();
        match ctx.tracker.save_data_entry(entry("EMP1")).await {
            OpResult::Failed(message) => assert!(message.starts_with("Error saving data: ")),
            other => panic!("expected failure: {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_overwrites_in_place_and_keeps_id() {
        let ctx = TestContext::bootstrapped().await;
        let before = all_rows(&ctx).await;

        let result = ctx.tracker.update_data_entry(3, entry("EMP200")).await;
        assert_eq!(result, OpResult::done("Data updated successfully"));

        let after = all_rows(&ctx).await;
        assert_eq!(after.len(), 3);
        assert_eq!(after[1].values.employee_id, "EMP200");
        assert_eq!(after[1].values.verified_by_gsws_count, 0);
        assert_eq!(after[1].id, before[1].id);
        assert_eq!(after[0], before[0]);
    }

    #[tokio::test]
    async fn update_beyond_row_capacity_fails() {
        let ctx = TestContext::bootstrapped().await;

        let result = ctx.tracker.update_data_entry(usize::MAX, DataEntry::default()).await;
        assert_eq!(
            result,
            OpResult::failed(format!("Error updating data: Invalid row number: {}", usize::MAX))
        );

        let result = ctx
            .tracker
            .update_data_entry(crate::store::DEFAULT_MAX_ROWS + 1, entry("EMP900"))
            .await;
        assert!(!result.is_success());
        assert_eq!(all_rows(&ctx).await.len(), 3);
    }

    #[tokio::test]
    async fn update_past_end_extends_sheet() {
        let ctx = TestContext::bootstrapped().await;
        assert!(ctx.tracker.update_data_entry(8, entry("EMP300")).await.is_success());

        let workbook = ctx.spreadsheet_id().await;
        assert_eq!(ctx.backend.last_row(&workbook, DATA_SHEET).await.unwrap(), 8);

        let rows = all_rows(&ctx).await;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].row_number, 8);
    }

    #[tokio::test]
    async fn update_without_sheet_fails() {
        let ctx = TestContext::with_empty_workbook().await;
        assert_eq!(
            ctx.tracker.update_data_entry(2, entry("EMP1")).await,
            OpResult::failed("Sheet not found")
        );
    }

    #[tokio::test]
    async fn delete_protects_header() {
        let ctx = TestContext::bootstrapped().await;
        for row in [0, 1] {
            assert_eq!(
                ctx.tracker.delete_data_entry(row).await,
                OpResult::failed("Invalid row number or sheet not found")
            );
        }
        assert_eq!(all_rows(&ctx).await.len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_row_and_shifts_positions() {
        let ctx = TestContext::bootstrapped().await;
        let before = all_rows(&ctx).await;

        let result = ctx.tracker.delete_data_entry(2).await;
        assert_eq!(result, OpResult::done("Data deleted successfully"));

        let after = all_rows(&ctx).await;
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].values, before[1].values);
        assert_eq!(after[0].row_number, 2);
        assert_eq!(after[1].values, before[2].values);
        assert_eq!(after[1].row_number, 3);
    }

    #[tokio::test]
    async fn delete_past_end_reports_fault() {
        let ctx = TestContext::bootstrapped().await;
        match ctx.tracker.delete_data_entry(40).await {
            OpResult::Failed(message) => assert!(message.starts_with("Error deleting data: ")),
            other => panic!("expected failure: {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_without_sheet_fails() {
        let ctx = TestContext::with_empty_workbook().await;
        assert_eq!(
            ctx.tracker.delete_data_entry(2).await,
            OpResult::failed("Invalid row number or sheet not found")
        );
    }

    #[tokio::test]
    async fn keyed_operations_follow_shifted_rows() {
        let ctx = TestContext::bootstrapped().await;
        let rows = all_rows(&ctx).await;
        let jane = rows[1].id.unwrap();
        let bob = rows[2].id.unwrap();

        assert!(ctx.tracker.delete_data_entry_by_id(jane).await.is_success());
        assert!(ctx.tracker.update_data_entry_by_id(bob, entry("EMP003")).await.is_success());

        let rows = all_rows(&ctx).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[1].id, Some(bob));
        assert_eq!(rows[1].values.mandal_name, "Mandal4");
    }

    #[tokio::test]
    async fn keyed_operations_reject_unknown_ids() {
        let ctx = TestContext::bootstrapped().await;
        let missing = Uuid::new_v4();
        assert_eq!(
            ctx.tracker.update_data_entry_by_id(missing, entry("X")).await,
            OpResult::failed("Row not found")
        );
        assert_eq!(
            ctx.tracker.delete_data_entry_by_id(missing).await,
            OpResult::failed("Row not found")
        );
    }

    #[tokio::test]
    async fn concurrent_saves_never_overwrite_each_other() {
        let ctx = TestContext::bootstrapped().await;
        let tracker = Arc::clone(&ctx.tracker);

        let saves = (0..20).map(|i| {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move { tracker.save_data_entry(entry(&format!("EMP-C{}", i))).await })
        });
        for handle in saves.collect::<Vec<_>>() {
            assert!(handle.await.unwrap().is_success());
        }

        let rows = all_rows(&ctx).await;
        assert_eq!(rows.len(), 23);
        let mut ids: Vec<_> = rows.iter().map(|r| r.values.employee_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 23);
    }
}
