use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// Optional equality constraints. Absent or empty values match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataFilters {
    #[serde(rename = "mandalName", default, skip_serializing_if = "Option::is_none")]
    pub mandal_name: Option<String>,
    #[serde(
        rename = "secretariatName",
        alias = "secretraiatName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub secretariat_name: Option<String>,
    #[serde(rename = "employeeId", default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(rename = "employeeName", default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(rename = "clusterId", default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
}

impl DataFilters {
    /// Constraints that are present and non-empty, paired with their column
    pub fn active(&self) -> Vec<(Column, &str)> {
        [
            (Column::MandalName, &self.mandal_name),
            (Column::SecretariatName, &self.secretariat_name),
            (Column::EmployeeId, &self.employee_id),
            (Column::EmployeeName, &self.employee_name),
            (Column::ClusterId, &self.cluster_id),
        ]
        .into_iter()
        .filter_map(|(column, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((column, v)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// Validated 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, page_size: 10 }
    }
}
