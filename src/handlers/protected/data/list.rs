// handlers/protected/data/list.rs - GET /api/data handler

use std::sync::Arc;

use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{ApiError, ValidatedQuery};
use crate::filter::DataFilters;
use crate::services::Tracker;
use crate::types::PagedResult;

/// Query string of a listing: the five equality filters plus the page window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataQuery {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(rename = "pageSize", default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl DataQuery {
    pub fn filters(&self) -> DataFilters {
        DataFilters {
            mandal_name: self.mandal_name.clone(),
            secretariat_name: self.secretariat_name.clone(),
            employee_id: self.employee_id.clone(),
            employee_name: self.employee_name.clone(),
            cluster_id: self.cluster_id.clone(),
        }
    }
}

/// GET /api/data - Filter and paginate the data sheet
///
/// `page` defaults to 1 and `pageSize` to the configured default. A page or
/// page size below 1 is a 400.
pub async fn list_get(
    Extension(tracker): Extension<Arc<Tracker>>,
    ValidatedQuery(query): ValidatedQuery<DataQuery>,
) -> Result<Json<PagedResult>, ApiError> {
    let page = query.page.unwrap_or(1);
    let page_size = query
        .page_size
        .unwrap_or(CONFIG.query.default_page_size as i64);

    let result = tracker.get_data(query.filters(), page, page_size).await?;
    Ok(Json(result))
}
