use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};
use uuid::Uuid;

use crate::database::DatabaseManager;

use super::{fit_width, span_end, Cell, SheetBackend, StoreError, StoredRow};

/// Sheet backend persisting rows in PostgreSQL.
///
/// Each row is one `bk_rows` record keyed by (workbook, sheet, position) with
/// its cells as a JSONB array. Positions are kept dense on delete; gaps left by
/// writing past the end are simply absent and read back blank.
pub struct PgBackend {
    pool: PgPool,
    max_rows: usize,
}

impl PgBackend {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connection_timeout: u64,
        max_rows: usize,
    ) -> Result<Self, StoreError> {
        let pool = DatabaseManager::connect(database_url, max_connections, connection_timeout).await?;
        Ok(Self { pool, max_rows })
    }

    async fn ensure_sheet(&self, workbook: &str, sheet: &str) -> Result<(), StoreError> {
        if self.has_sheet(workbook, sheet).await? {
            Ok(())
        } else {
            Err(StoreError::SheetNotFound(sheet.to_string()))
        }
    }
}

fn to_position(position: usize) -> Result<i32, StoreError> {
    i32::try_from(position).map_err(|_| StoreError::InvalidRow(position))
}

#[async_trait]
impl SheetBackend for PgBackend {
    async fn get_property(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM bk_properties WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO bk_properties (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_workbook(&self, title: &str) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO bk_workbooks (id, title) VALUES ($1, $2)")
            .bind(&id)
            .bind(title)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn open_workbook(&self, workbook: &str) -> Result<(), StoreError> {
        let found = sqlx::query_scalar::<_, String>("SELECT id FROM bk_workbooks WHERE id = $1")
            .bind(workbook)
            .fetch_optional(&self.pool)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| StoreError::WorkbookNotFound(workbook.to_string()))
    }

    async fn has_sheet(&self, workbook: &str, sheet: &str) -> Result<bool, StoreError> {
        self.open_workbook(workbook).await?;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bk_sheets WHERE workbook_id = $1 AND name = $2",
        )
        .bind(workbook)
        .bind(sheet)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn insert_sheet(&self, workbook: &str, sheet: &str) -> Result<(), StoreError> {
        if self.has_sheet(workbook, sheet).await? {
            return Err(StoreError::SheetExists(sheet.to_string()));
        }
        sqlx::query("INSERT INTO bk_sheets (workbook_id, name) VALUES ($1, $2)")
            .bind(workbook)
            .bind(sheet)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn last_row(&self, workbook: &str, sheet: &str) -> Result<usize, StoreError> {
        self.ensure_sheet(workbook, sheet).await?;
        let last: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) FROM bk_rows WHERE workbook_id = $1 AND sheet = $2",
        )
        .bind(workbook)
        .bind(sheet)
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(last).unwrap_or(0))
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
        self.ensure_sheet(workbook, sheet).await?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let first = to_position(start)?;
        let last = to_position(end)?;
        let records = sqlx::query(
            "SELECT position, key, cells FROM bk_rows
             WHERE workbook_id = $1 AND sheet = $2 AND position BETWEEN $3 AND $4
             ORDER BY position",
        )
        .bind(workbook)
        .bind(sheet)
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await?;

        let mut rows: Vec<StoredRow> = (start..=end)
            .map(|position| StoredRow {
                position,
                key: None,
                cells: vec![Cell::blank(); width],
            })
            .collect();

        for record in records {
            let position: i32 = record.try_get("position")?;
            let key: Uuid = record.try_get("key")?;
            let Json(cells): Json<Vec<Cell>> = record.try_get("cells")?;

            let index = usize::try_from(position)
                .ok()
                .and_then(|p| p.checked_sub(start))
                .ok_or_else(|| StoreError::Corrupt(format!("row position {} out of range", position)))?;
            rows[index] = StoredRow {
                position: start + index,
                key: Some(key),
                cells: fit_width(cells, width),
            };
        }

        Ok(rows)
    }

    async fn write_rows(
        &self,
        workbook: &str,
        sheet: &str,
        start: usize,
        rows: Vec<Vec<Cell>>,
    ) -> Result<(), StoreError> {
        span_end(start, rows.len(), self.max_rows)?;
        self.ensure_sheet(workbook, sheet).await?;

        let mut tx = self.pool.begin().await?;
        for (offset, cells) in rows.into_iter().enumerate() {
            sqlx::query(
                "INSERT INTO bk_rows (workbook_id, sheet, position, key, cells)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (workbook_id, sheet, position)
                 DO UPDATE SET cells = EXCLUDED.cells, updated_at = now()",
            )
            .bind(workbook)
            .bind(sheet)
            .bind(to_position(start + offset)?)
            .bind(Uuid::new_v4())
            .bind(Json(cells))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_row(&self, workbook: &str, sheet: &str, position: usize) -> Result<(), StoreError> {
        let last = self.last_row(workbook, sheet).await?;
        if position == 0 || position > last {
            return Err(StoreError::InvalidRow(position));
        }
        let position = to_position(position)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM bk_rows WHERE workbook_id = $1 AND sheet = $2 AND position = $3")
            .bind(workbook)
            .bind(sheet)
            .bind(position)
            .execute(&mut *tx)
            .await?;

        // Shift through negative positions so no intermediate state collides
        // with the primary key.
        sqlx::query(
            "UPDATE bk_rows SET position = -(position - 1)
             WHERE workbook_id = $1 AND sheet = $2 AND position > $3",
        )
        .bind(workbook)
        .bind(sheet)
        .bind(position)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE bk_rows SET position = -position
             WHERE workbook_id = $1 AND sheet = $2 AND position < 0",
        )
        .bind(workbook)
        .bind(sheet)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_row(&self, workbook: &str, sheet: &str, key: Uuid) -> Result<Option<usize>, StoreError> {
        self.ensure_sheet(workbook, sheet).await?;
        let position = sqlx::query_scalar::<_, i32>(
            "SELECT position FROM bk_rows WHERE workbook_id = $1 AND sheet = $2 AND key = $3",
        )
        .bind(workbook)
        .bind(sheet)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(position.and_then(|p| usize::try_from(p).ok()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_MAX_ROWS;

    // These run against the database named by DATABASE_URL and are skipped
    // when it is unset. Each test works in its own workbook.
    async fn sheet(max_rows: usize) -> Option<(PgBackend, String)> {
        let url = std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
        let Some(url) = url else {
            eprintln!("DATABASE_URL not set; skipping PostgreSQL backend test");
            return None;
        };
        let backend = PgBackend::connect(&url, 2, 10, max_rows).await.expect("connect");
        let id = backend.create_workbook("test").await.unwrap();
        backend.insert_sheet(&id, "data").await.unwrap();
        Some((backend, id))
    }

    async fn drop_workbook(backend: &PgBackend, id: &str) {
        sqlx::query("DELETE FROM bk_workbooks WHERE id = $1")
            .bind(id)
            .execute(&backend.pool)
            .await
            .unwrap();
    }

    fn row(label: &str) -> Vec<Cell> {
        vec![Cell::text(label), Cell::Number(1)]
    }

    #[tokio::test]
    async fn gap_rows_read_back_blank() {
        let Some((backend, id)) = sheet(DEFAULT_MAX_ROWS).await else { return };

        backend.write_rows(&id, "data", 3, vec![row("c")]).await.unwrap();
        assert_eq!(backend.last_row(&id, "data").await.unwrap(), 3);

        let rows = backend.read_rows(&id, "data", 1, 4, 2).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_blank());
        assert!(rows[0].key.is_none());
        assert!(rows[1].is_blank());
        assert_eq!(rows[2].position, 3);
        assert_eq!(rows[2].cells, row("c"));
        assert!(rows[2].key.is_some());
        assert!(rows[3].key.is_none());

        drop_workbook(&backend, &id).await;
    }

    #[tokio::test]
    async fn overwrite_keeps_key() {
        let Some((backend, id)) = sheet(DEFAULT_MAX_ROWS).await else { return };

        backend.write_rows(&id, "data", 1, vec![row("a")]).await.unwrap();
        let before = backend.read_rows(&id, "data", 1, 1, 2).await.unwrap()[0].key;

        backend.write_rows(&id, "data", 1, vec![row("b")]).await.unwrap();
        let after = backend.read_rows(&id, "data", 1, 1, 2).await.unwrap();
        assert_eq!(after[0].key, before);
        assert_eq!(after[0].cells, row("b"));

        drop_workbook(&backend, &id).await;
    }

    #[tokio::test]
    async fn delete_shifts_rows_and_keys_up() {
        let Some((backend, id)) = sheet(DEFAULT_MAX_ROWS).await else { return };

        backend
            .write_rows(&id, "data", 1, vec![row("a"), row("b"), row("c"), row("d")])
            .await
            .unwrap();
        let before = backend.read_rows(&id, "data", 1, 4, 2).await.unwrap();

        backend.delete_row(&id, "data", 2).await.unwrap();

        assert_eq!(backend.last_row(&id, "data").await.unwrap(), 3);
        let after = backend.read_rows(&id, "data", 1, 3, 2).await.unwrap();
        assert_eq!(after[0].key, before[0].key);
        assert_eq!(after[1].cells, row("c"));
        assert_eq!(after[1].key, before[2].key);
        assert_eq!(after[2].cells, row("d"));
        assert_eq!(after[2].key, before[3].key);

        let key_d = before[3].key.unwrap();
        assert_eq!(backend.find_row(&id, "data", key_d).await.unwrap(), Some(3));
        let key_b = before[1].key.unwrap();
        assert_eq!(backend.find_row(&id, "data", key_b).await.unwrap(), None);

        assert!(matches!(
            backend.delete_row(&id, "data", 4).await,
            Err(StoreError::InvalidRow(4))
        ));

        drop_workbook(&backend, &id).await;
    }

    #[tokio::test]
    async fn positions_past_capacity_are_invalid() {
        let Some((backend, id)) = sheet(4).await else { return };

        backend.write_rows(&id, "data", 4, vec![row("d")]).await.unwrap();
        assert!(matches!(
            backend.write_rows(&id, "data", 5, vec![row("e")]).await,
            Err(StoreError::InvalidRow(5))
        ));
        assert!(matches!(
            backend.write_rows(&id, "data", usize::MAX, vec![row("x")]).await,
            Err(StoreError::InvalidRow(usize::MAX))
        ));
        assert!(matches!(
            backend.read_rows(&id, "data", 2, usize::MAX, 2).await,
            Err(StoreError::InvalidRow(2))
        ));

        drop_workbook(&backend, &id).await;
    }
}
