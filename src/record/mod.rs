/// Typed views of a data-sheet row.
///
/// `DataEntry` is what callers send on save/update: every field optional, unknown
/// keys rejected. `RowValues` is the fully defaulted 16-field row, and
/// `DataRow` is a row read back from the sheet together with its position and key.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Column, WIDTH};
use crate::store::{Cell, StoredRow};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataEntry {
    #[serde(rename = "districtName", default)]
    pub district_name: Option<String>,
    #[serde(rename = "mandalName", default)]
    pub mandal_name: Option<String>,
    #[serde(rename = "secretariatID", default)]
    pub secretariat_id: Option<String>,
    #[serde(rename = "secretraiatName", alias = "secretariatName", default)]
    pub secretariat_name: Option<String>,
    #[serde(rename = "employeeID", default)]
    pub employee_id: Option<String>,
    #[serde(rename = "employeeName", default)]
    pub employee_name: Option<String>,
    #[serde(rename = "clusterID", default)]
    pub cluster_id: Option<String>,

    #[serde(rename = "totalBangaruKutumbam", default, deserialize_with = "de_count")]
    pub total_bangaru_kutumbam: Option<i64>,
    #[serde(rename = "noOfBangaruKutumbamAdopted", default, deserialize_with = "de_count")]
    pub adopted_count: Option<i64>,
    #[serde(rename = "noOfMargadarsiMobilized", default, deserialize_with = "de_count")]
    pub margadarsi_mobilized_count: Option<i64>,
    #[serde(rename = "bksVerifiedByGSWS", default, deserialize_with = "de_count")]
    pub verified_by_gsws_count: Option<i64>,
    #[serde(rename = "margadarsisContactedByGSWS", default, deserialize_with = "de_count")]
    pub margadarsis_contacted_count: Option<i64>,
    #[serde(rename = "noOfBksNewNeedsCaptured", default, deserialize_with = "de_count")]
    pub new_needs_captured_count: Option<i64>,
    #[serde(rename = "noOfMargadarsisAgreedToAddressBkNeeds", default, deserialize_with = "de_count")]
    pub margadarsis_agreed_count: Option<i64>,
    #[serde(rename = "noOfBkNeedsClosed", default, deserialize_with = "de_count")]
    pub needs_closed_count: Option<i64>,
    #[serde(rename = "noOfDelinkingRequestsRaised", default, deserialize_with = "de_count")]
    pub delinking_requests_count: Option<i64>,
}

impl DataEntry {
    /// Applies the defaulting rule: "" for text, 0 for counters
    pub fn into_values(self) -> RowValues {
        RowValues {
            district_name: self.district_name.unwrap_or_default(),
            mandal_name: self.mandal_name.unwrap_or_default(),
            secretariat_id: self.secretariat_id.unwrap_or_default(),
            secretariat_name: self.secretariat_name.unwrap_or_default(),
            employee_id: self.employee_id.unwrap_or_default(),
            employee_name: self.employee_name.unwrap_or_default(),
            cluster_id: self.cluster_id.unwrap_or_default(),
            total_bangaru_kutumbam: self.total_bangaru_kutumbam.unwrap_or(0),
            adopted_count: self.adopted_count.unwrap_or(0),
            margadarsi_mobilized_count: self.margadarsi_mobilized_count.unwrap_or(0),
            verified_by_gsws_count: self.verified_by_gsws_count.unwrap_or(0),
            margadarsis_contacted_count: self.margadarsis_contacted_count.unwrap_or(0),
            new_needs_captured_count: self.new_needs_captured_count.unwrap_or(0),
            margadarsis_agreed_count: self.margadarsis_agreed_count.unwrap_or(0),
            needs_closed_count: self.needs_closed_count.unwrap_or(0),
            delinking_requests_count: self.delinking_requests_count.unwrap_or(0),
        }
    }

    pub fn to_cells(&self) -> Vec<Cell> {
        self.clone().into_values().to_cells()
    }
}

/// A complete row in declared column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowValues {
    #[serde(rename = "districtName")]
    pub district_name: String,
    #[serde(rename = "mandalName")]
    pub mandal_name: String,
    #[serde(rename = "secretariatID")]
    pub secretariat_id: String,
    #[serde(rename = "secretraiatName")]
    pub secretariat_name: String,
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    #[serde(rename = "employeeName")]
    pub employee_name: String,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    #[serde(rename = "totalBangaruKutumbam")]
    pub total_bangaru_kutumbam: i64,
    #[serde(rename = "noOfBangaruKutumbamAdopted")]
    pub adopted_count: i64,
    #[serde(rename = "noOfMargadarsiMobilized")]
    pub margadarsi_mobilized_count: i64,
    #[serde(rename = "bksVerifiedByGSWS")]
    pub verified_by_gsws_count: i64,
    #[serde(rename = "margadarsisContactedByGSWS")]
    pub margadarsis_contacted_count: i64,
    #[serde(rename = "noOfBksNewNeedsCaptured")]
    pub new_needs_captured_count: i64,
    #[serde(rename = "noOfMargadarsisAgreedToAddressBkNeeds")]
    pub margadarsis_agreed_count: i64,
    #[serde(rename = "noOfBkNeedsClosed")]
    pub needs_closed_count: i64,
    #[serde(rename = "noOfDelinkingRequestsRaised")]
    pub delinking_requests_count: i64,
}

impl RowValues {
    pub fn to_cells(&self) -> Vec<Cell> {
        let text = [
            &self.district_name,
            &self.mandal_name,
            &self.secretariat_id,
            &self.secretariat_name,
            &self.employee_id,
            &self.employee_name,
            &self.cluster_id,
        ];
        let counts = [
            self.total_bangaru_kutumbam,
            self.adopted_count,
            self.margadarsi_mobilized_count,
            self.verified_by_gsws_count,
            self.margadarsis_contacted_count,
            self.new_needs_captured_count,
            self.margadarsis_agreed_count,
            self.needs_closed_count,
            self.delinking_requests_count,
        ];

        text.into_iter()
            .map(|s| Cell::text(s.as_str()))
            .chain(counts.into_iter().map(Cell::Number))
            .collect()
    }

    pub fn from_cells(cells: &[Cell]) -> Self {
        let text = |column: Column| cells.get(column.index()).map(Cell::to_string).unwrap_or_default();
        let count = |column: Column| cells.get(column.index()).map(Cell::as_count).unwrap_or(0);

        Self {
            district_name: text(Column::DistrictName),
            mandal_name: text(Column::MandalName),
            secretariat_id: text(Column::SecretariatId),
            secretariat_name: text(Column::SecretariatName),
            employee_id: text(Column::EmployeeId),
            employee_name: text(Column::EmployeeName),
            cluster_id: text(Column::ClusterId),
            total_bangaru_kutumbam: count(Column::TotalBangaruKutumbam),
            adopted_count: count(Column::AdoptedCount),
            margadarsi_mobilized_count: count(Column::MargadarsiMobilizedCount),
            verified_by_gsws_count: count(Column::VerifiedByGswsCount),
            margadarsis_contacted_count: count(Column::MargadarsisContactedCount),
            new_needs_captured_count: count(Column::NewNeedsCapturedCount),
            margadarsis_agreed_count: count(Column::MargadarsisAgreedCount),
            needs_closed_count: count(Column::NeedsClosedCount),
            delinking_requests_count: count(Column::DelinkingRequestsCount),
        }
    }
}

/// A data row as returned by queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRow {
    /// Current 1-based sheet position; shifts after deletes above it
    #[serde(rename = "rowNumber")]
    pub row_number: usize,
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub values: RowValues,
}

impl From<&StoredRow> for DataRow {
    fn from(row: &StoredRow) -> Self {
        debug_assert!(row.cells.len() == WIDTH);
        Self {
            row_number: row.position,
            id: row.key,
            values: RowValues::from_cells(&row.cells),
        }
    }
}

/// Accepts a JSON integer, a whole float or a numeric string. `null` and ""
/// mean the counter was left empty.
fn de_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer count or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(Some(v as i64))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(CountVisitor)
}
