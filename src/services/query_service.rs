use std::collections::HashSet;

use crate::filter::{DataFilters, Filter, FilterError};
use crate::schema::Column;
use crate::store::{StoreError, StoredRow};
use crate::types::{FilterOptions, PagedResult};

use super::Tracker;

impl Tracker {
    /// Filters every data row, then returns the requested page.
    ///
    /// Only an invalid page window is an error; read faults and a missing or
    /// empty sheet yield the short empty result.
    pub async fn get_data(
        &self,
        filters: DataFilters,
        page: i64,
        page_size: i64,
    ) -> Result<PagedResult, FilterError> {
        let unfiltered = filters.is_empty();
        let mut filter = Filter::new(filters);
        filter.paginate(page, page_size)?;

        let rows = match self.read_data_rows().await {
            Ok(Some(rows)) if !rows.is_empty() => rows,
            Ok(_) => return Ok(PagedResult::empty()),
            Err(e) => {
                tracing::error!("Error getting data: {}", e);
                return Ok(PagedResult::empty());
            }
        };

        let page = filter.apply(rows);
        if crate::config::CONFIG.query.debug_logging {
            tracing::debug!(
                "Query matched {} rows{}, returning page {} of {} ({} per page)",
                page.total_rows,
                if unfiltered { " (unfiltered)" } else { "" },
                page.current_page,
                page.total_pages,
                filter.pagination().page_size
            );
        }
        Ok(page.into())
    }

    /// Distinct non-empty values for each filterable column, in order of first
    /// appearance. Creates the data sheet when it does not exist yet.
    pub async fn get_filter_options(&self) -> FilterOptions {
        match self.collect_filter_options().await {
            Ok(options) => options,
            Err(e) => {
                tracing::error!("Error getting filter options: {}", e);
                FilterOptions::default()
            }
        }
    }

    async fn read_data_rows(&self) -> Result<Option<Vec<StoredRow>>, StoreError> {
        let workbook = self.workbook().await?;
        if !self.has_data_sheet(&workbook).await? {
            return Ok(None);
        }
        self.data_rows(&workbook).await.map(Some)
    }

    async fn collect_filter_options(&self) -> Result<FilterOptions, StoreError> {
        let workbook = self.workbook().await?;

        if !self.has_data_sheet(&workbook).await? {
            let _guard = self.writer.lock().await;
            if !self.has_data_sheet(&workbook).await? {
                self.create_data_sheet(&workbook).await?;
            }
            return Ok(FilterOptions::default());
        }

        let rows = self.data_rows(&workbook).await?;
        Ok(FilterOptions {
            mandal_names: distinct(&rows, Column::MandalName),
            secretariat_names: distinct(&rows, Column::SecretariatName),
            employee_ids: distinct(&rows, Column::EmployeeId),
            employee_names: distinct(&rows, Column::EmployeeName),
            cluster_ids: distinct(&rows, Column::ClusterId),
        })
    }
}

fn distinct(rows: &[StoredRow], column: Column) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.cells.get(column.index()))
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_string())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
