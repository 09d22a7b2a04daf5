use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{fit_width, span_end, Cell, SheetBackend, StoreError, StoredRow, DEFAULT_MAX_ROWS};

#[derive(Debug, Default)]
struct MemoryRow {
    key: Option<Uuid>,
    cells: Vec<Cell>,
}

#[derive(Debug)]
struct MemoryWorkbook {
    title: String,
    sheets: HashMap<String, Vec<MemoryRow>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    properties: HashMap<String, String>,
    workbooks: HashMap<String, MemoryWorkbook>,
}

impl MemoryState {
    fn workbook(&self, id: &str) -> Result<&MemoryWorkbook, StoreError> {
        self.workbooks
            .get(id)
            .ok_or_else(|| StoreError::WorkbookNotFound(id.to_string()))
    }

    fn sheet(&self, workbook: &str, sheet: &str) -> Result<&Vec<MemoryRow>, StoreError> {
        self.workbook(workbook)?
            .sheets
            .get(sheet)
            .ok_or_else(|| StoreError::SheetNotFound(sheet.to_string()))
    }

    fn sheet_mut(&mut self, workbook: &str, sheet: &str) -> Result<&mut Vec<MemoryRow>, StoreError> {
        self.workbooks
            .get_mut(workbook)
            .ok_or_else(|| StoreError::WorkbookNotFound(workbook.to_string()))?
            .sheets
            .get_mut(sheet)
            .ok_or_else(|| StoreError::SheetNotFound(sheet.to_string()))
    }
}

/// Process-local backend. State lives for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    max_rows: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_max_rows(DEFAULT_MAX_ROWS)
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            max_rows,
        }
    }

    /// Title the workbook was created with
    pub async fn workbook_title(&self, workbook: &str) -> Result<String, StoreError> {
        let state = self.state.read().await;
        Ok(state.workbook(workbook)?.title.clone())
    }
}

#[async_trait]
impl SheetBackend for MemoryBackend {
    async fn get_property(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.state.read().await.properties.get(key).cloned())
    }

    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .properties
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn create_workbook(&self, title: &str) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.state.write().await.workbooks.insert(
            id.clone(),
            MemoryWorkbook {
                title: title.to_string(),
                sheets: HashMap::new(),
            },
        );
        Ok(id)
    }

    async fn open_workbook(&self, workbook: &str) -> Result<(), StoreError> {
        self.state.read().await.workbook(workbook).map(|_| ())
    }

    async fn has_sheet(&self, workbook: &str, sheet: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.workbook(workbook)?.sheets.contains_key(sheet))
    }

    async fn insert_sheet(&self, workbook: &str, sheet: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let book = state
            .workbooks
            .get_mut(workbook)
            .ok_or_else(|| StoreError::WorkbookNotFound(workbook.to_string()))?;
        if book.sheets.contains_key(sheet) {
            return Err(StoreError::SheetExists(sheet.to_string()));
        }
        book.sheets.insert(sheet.to_string(), Vec::new());
        Ok(())
    }

    async fn last_row(&self, workbook: &str, sheet: &str) -> Result<usize, StoreError> {
        Ok(self.state.read().await.sheet(workbook, sheet)?.len())
    }

    async fn read_rows(
        &self,
        workbook: &str,
        sheet: &str,
        start: usize,
        count: usize,
        width: usize,
    ) -> Result<Vec<StoredRow>, StoreError> {
        let end = span_end(start, count, self.max_rows)?;
        let state = self.state.read().await;
        let rows = state.sheet(workbook, sheet)?;

        Ok((start..=end)
            .map(|position| match rows.get(position - 1) {
                Some(row) => StoredRow {
                    position,
                    key: row.key,
                    cells: fit_width(row.cells.clone(), width),
                },
                None => StoredRow {
                    position,
                    key: None,
                    cells: vec![Cell::blank(); width],
                },
            })
            .collect())
    }

    async fn write_rows(
        &self,
        workbook: &str,
        sheet: &str,
        start: usize,
        rows: Vec<Vec<Cell>>,
    ) -> Result<(), StoreError> {
        let end = span_end(start, rows.len(), self.max_rows)?;
        let mut state = self.state.write().await;
        let sheet_rows = state.sheet_mut(workbook, sheet)?;

        if rows.is_empty() {
            return Ok(());
        }
        if sheet_rows.len() < end {
            sheet_rows.resize_with(end, MemoryRow::default);
        }
        for (offset, cells) in rows.into_iter().enumerate() {
            let slot = &mut sheet_rows[start - 1 + offset];
            slot.key.get_or_insert_with(Uuid::new_v4);
            slot.cells = cells;
        }
        Ok(())
    }

    async fn delete_row(&self, workbook: &str, sheet: &str, position: usize) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let rows = state.sheet_mut(workbook, sheet)?;
        if position == 0 || position > rows.len() {
            return Err(StoreError::InvalidRow(position));
        }
        rows.remove(position - 1);
        Ok(())
    }

    async fn find_row(&self, workbook: &str, sheet: &str, key: Uuid) -> Result<Option<usize>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .sheet(workbook, sheet)?
            .iter()
            .position(|row| row.key == Some(key))
            .map(|index| index + 1))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sheet() -> (MemoryBackend, String) {
        let backend = MemoryBackend::new();
        let id = backend.create_workbook("test").await.unwrap();
        backend.insert_sheet(&id, "data").await.unwrap();
        (backend, id)
    }

    fn row(label: &str) -> Vec<Cell> {
        vec![Cell::text(label), Cell::Number(1)]
    }

    #[tokio::test]
    async fn unknown_workbook_is_not_found() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.open_workbook("missing").await,
            Err(StoreError::WorkbookNotFound(_))
        ));
    }

    #[tokio::test]
    async fn insert_sheet_twice_fails() {
        let (backend, id) = sheet().await;
        assert!(matches!(
            backend.insert_sheet(&id, "data").await,
            Err(StoreError::SheetExists(_))
        ));
        assert_eq!(backend.workbook_title(&id).await.unwrap(), "test");
    }

    #[tokio::test]
    async fn writing_past_end_leaves_blank_gap() {
        let (backend, id) = sheet().await;
        backend.write_rows(&id, "data", 3, vec![row("c")]).await.unwrap();
        assert_eq!(backend.last_row(&id, "data").await.unwrap(), 3);

        let rows = backend.read_rows(&id, "data", 1, 3, 2).await.unwrap();
        assert!(rows[0].is_blank());
        assert!(rows[0].key.is_none());
        assert!(rows[1].is_blank());
        assert_eq!(rows[2].cells, row("c"));
        assert!(rows[2].key.is_some());
    }

    #[tokio::test]
    async fn positions_past_capacity_are_invalid() {
        let backend = MemoryBackend::with_max_rows(4);
        let id = backend.create_workbook("test").await.unwrap();
        backend.insert_sheet(&id, "data").await.unwrap();

        backend.write_rows(&id, "data", 4, vec![row("d")]).await.unwrap();
        assert!(matches!(
            backend.write_rows(&id, "data", 5, vec![row("e")]).await,
            Err(StoreError::InvalidRow(5))
        ));
        assert!(matches!(
            backend.write_rows(&id, "data", 3, vec![row("c"), row("d"), row("e")]).await,
            Err(StoreError::InvalidRow(3))
        ));
        assert!(matches!(
            backend.write_rows(&id, "data", usize::MAX, vec![row("x")]).await,
            Err(StoreError::InvalidRow(usize::MAX))
        ));
        assert!(matches!(
            backend.read_rows(&id, "data", 2, usize::MAX, 2).await,
            Err(StoreError::InvalidRow(2))
        ));
        assert_eq!(backend.last_row(&id, "data").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn overwrite_keeps_key() {
        let (backend, id) = sheet().await;
        backend.write_rows(&id, "data", 1, vec![row("a")]).await.unwrap();
        let before = backend.read_rows(&id, "data", 1, 1, 2).await.unwrap()[0].key;

        backend.write_rows(&id, "data", 1, vec![row("b")]).await.unwrap();
        let after = backend.read_rows(&id, "data", 1, 1, 2).await.unwrap();
        assert_eq!(after[0].key, before);
        assert_eq!(after[0].cells, row("b"));
    }

    #[tokio::test]
    async fn delete_shifts_rows_up() {
        let (backend, id) = sheet().await;
        backend
            .write_rows(&id, "data", 1, vec![row("a"), row("b"), row("c")])
            .await
            .unwrap();
        let key_c = backend.read_rows(&id, "data", 3, 1, 2).await.unwrap()[0].key.unwrap();

        backend.delete_row(&id, "data", 2).await.unwrap();

        assert_eq!(backend.last_row(&id, "data").await.unwrap(), 2);
        let rows = backend.read_rows(&id, "data", 1, 2, 2).await.unwrap();
        assert_eq!(rows[1].cells, row("c"));
        assert_eq!(backend.find_row(&id, "data", key_c).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn delete_out_of_range_is_invalid() {
        let (backend, id) = sheet().await;
        assert!(matches!(
            backend.delete_row(&id, "data", 1).await,
            Err(StoreError::InvalidRow(1))
        ));
    }

    #[tokio::test]
    async fn properties_round_trip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_property("SPREADSHEET_ID").await.unwrap(), None);
        backend.set_property("SPREADSHEET_ID", "abc").await.unwrap();
        assert_eq!(
            backend.get_property("SPREADSHEET_ID").await.unwrap().as_deref(),
            Some("abc")
        );
    }
}
