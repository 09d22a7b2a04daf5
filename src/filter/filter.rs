use crate::store::StoredRow;

use super::error::FilterError;
use super::types::{DataFilters, Pagination};

/// One page of rows that survived the filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPage {
    pub rows: Vec<StoredRow>,
    pub total_rows: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Conjunction of equality filters followed by a page window
pub struct Filter {
    filters: DataFilters,
    pagination: Pagination,
    max_page_size: Option<usize>,
}

impl Filter {
    pub fn new(filters: DataFilters) -> Self {
        Self {
            filters,
            pagination: Pagination::default(),
            max_page_size: crate::config::CONFIG.query.max_page_size,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: Option<usize>) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn paginate(&mut self, page: i64, page_size: i64) -> Result<&mut Self, FilterError> {
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }
        if page_size < 1 {
            return Err(FilterError::InvalidPageSize(page_size));
        }

        let page = usize::try_from(page).map_err(|_| FilterError::InvalidPage(page))?;
        let requested = usize::try_from(page_size).map_err(|_| FilterError::InvalidPageSize(page_size))?;

        let max = self.max_page_size.unwrap_or(usize::MAX);
        let applied = if requested > max {
            tracing::warn!("Page size {} exceeds max {}, capping to max", requested, max);
            max
        } else {
            requested
        };

        self.pagination = Pagination { page, page_size: applied };
        Ok(self)
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Blank rows never match; every active constraint must equal its cell exactly
    pub fn matches(&self, row: &StoredRow) -> bool {
        if row.is_blank() {
            return false;
        }
        self.filters.active().into_iter().all(|(column, value)| {
            row.cells
                .get(column.index())
                .is_some_and(|cell| cell.eq_text(value))
        })
    }

    pub fn apply(&self, rows: Vec<StoredRow>) -> FilteredPage {
        let matched: Vec<StoredRow> = rows.into_iter().filter(|row| self.matches(row)).collect();
        let total_rows = matched.len();

        let rows = matched
            .into_iter()
            .skip(self.pagination.offset())
            .take(self.pagination.page_size)
            .collect();

        FilteredPage {
            rows,
            total_rows,
            total_pages: self.pagination.total_pages(total_rows),
            current_page: self.pagination.page,
        }
    }
}
