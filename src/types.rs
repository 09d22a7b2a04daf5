/// Result objects returned by the boundary operations
///
/// Failures are values, not errors: login, query and CRUD paths always produce
/// one of these. Only bootstrap reports faults through `Result`.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::filter::FilteredPage;
use crate::record::DataRow;

/// Logged-in user descriptor handed to the hosting layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub mandal: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success(Session),
    Failure(String),
}

impl LoginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success(_))
    }
}

impl Serialize for LoginResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LoginResult", 2)?;
        match self {
            LoginResult::Success(user) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("user", user)?;
            }
            LoginResult::Failure(message) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}

/// Outcome of a save, update or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpResult {
    Done(String),
    Failed(String),
}

impl OpResult {
    pub fn done(message: impl Into<String>) -> Self {
        OpResult::Done(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        OpResult::Failed(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OpResult::Done(_))
    }

    pub fn message(&self) -> &str {
        match self {
            OpResult::Done(message) | OpResult::Failed(message) => message,
        }
    }
}

impl Serialize for OpResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OpResult", 2)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

/// Page of query results. The short form (no page fields) is returned when
/// the sheet is missing, holds no data, or could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedResult {
    pub data: Vec<DataRow>,
    #[serde(rename = "totalRows")]
    pub total_rows: usize,
    #[serde(rename = "totalPages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    #[serde(rename = "currentPage", skip_serializing_if = "Option::is_none")]
    pub current_page: Option<usize>,
}

impl PagedResult {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_rows: 0,
            total_pages: None,
            current_page: None,
        }
    }
}

impl From<FilteredPage> for PagedResult {
    fn from(page: FilteredPage) -> Self {
        Self {
            data: page.rows.iter().map(DataRow::from).collect(),
            total_rows: page.total_rows,
            total_pages: Some(page.total_pages),
            current_page: Some(page.current_page),
        }
    }
}

/// Distinct values offered by the filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(rename = "mandalNames")]
    pub mandal_names: Vec<String>,
    #[serde(rename = "secretraiatNames")]
    pub secretariat_names: Vec<String>,
    #[serde(rename = "employeeIds")]
    pub employee_ids: Vec<String>,
    #[serde(rename = "employeeNames")]
    pub employee_names: Vec<String>,
    #[serde(rename = "clusterIds")]
    pub cluster_ids: Vec<String>,
}
