/// Fixed layout of the tracking workbook: sheet names, headers and seed rows.
///
/// Column order is part of the wire contract. Every read and write path indexes
/// rows through [`Column`], never through ad-hoc offsets.

use crate::store::Cell;

/// Title given to a workbook created by bootstrap
pub const WORKBOOK_TITLE: &str = "BangaruKutumbamTrackingSystem";

/// Property under which the workbook identifier is persisted
pub const SPREADSHEET_ID_PROPERTY: &str = "SPREADSHEET_ID";

/// Sheet holding the program metrics
pub const DATA_SHEET: &str = "BangaruKutumbamData";

/// Sheet holding (username, password, mandal, role) tuples
pub const CREDENTIALS_SHEET: &str = "LoginCredentials";

/// Header row of the data sheet, exactly as persisted
pub const HEADERS: [&str; 16] = [
    "DistrictName",
    "MandalName",
    "SecretariatID",
    "SecretraiatName",
    "EmployeeID",
    "EmployeeName",
    "ClusterID",
    "Total Bangaru Kutumbam",
    "No. of Bangaru Kutumbam adopted",
    "No. of Margadarsi Mobilized",
    "BKs verified by GSWS",
    "Margadarsis contacted by GSWS",
    "No. of BKs new Needs captured",
    "No. of Margadarsis agreed to address the BK needs (Engagement)",
    "No. of BK needs closed",
    "No. of Delinking requests raised",
];

/// Number of columns in the data sheet
pub const WIDTH: usize = HEADERS.len();

/// Header row of the credential sheet
pub const CREDENTIAL_HEADERS: [&str; 4] = ["Username", "Password", "Mandal", "Role"];

/// Number of columns in the credential sheet
pub const CREDENTIAL_WIDTH: usize = CREDENTIAL_HEADERS.len();

/// Role assigned when the credential row leaves it blank
pub const DEFAULT_ROLE: &str = "user";

/// Columns of the data sheet in declared order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    DistrictName,
    MandalName,
    SecretariatId,
    SecretariatName,
    EmployeeId,
    EmployeeName,
    ClusterId,
    TotalBangaruKutumbam,
    AdoptedCount,
    MargadarsiMobilizedCount,
    VerifiedByGswsCount,
    MargadarsisContactedCount,
    NewNeedsCapturedCount,
    MargadarsisAgreedCount,
    NeedsClosedCount,
    DelinkingRequestsCount,
}

impl Column {
    pub const ALL: [Column; WIDTH] = [
        Column::DistrictName,
        Column::MandalName,
        Column::SecretariatId,
        Column::SecretariatName,
        Column::EmployeeId,
        Column::EmployeeName,
        Column::ClusterId,
        Column::TotalBangaruKutumbam,
        Column::AdoptedCount,
        Column::MargadarsiMobilizedCount,
        Column::VerifiedByGswsCount,
        Column::MargadarsisContactedCount,
        Column::NewNeedsCapturedCount,
        Column::MargadarsisAgreedCount,
        Column::NeedsClosedCount,
        Column::DelinkingRequestsCount,
    ];

    /// Zero-based offset of this column within a row
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn header(self) -> &'static str {
        HEADERS[self.index()]
    }
}

/// Credential sheet columns
pub mod credential {
    pub const USERNAME: usize = 0;
    pub const PASSWORD: usize = 1;
    pub const MANDAL: usize = 2;
    pub const ROLE: usize = 3;
}

pub fn header_row() -> Vec<Cell> {
    Column::ALL.iter().map(|c| Cell::text(c.header())).collect()
}

pub fn credential_header_row() -> Vec<Cell> {
    CREDENTIAL_HEADERS.iter().map(|h| Cell::text(*h)).collect()
}

/// Sample logins written when the credential sheet is first created
pub fn seed_credentials() -> Vec<Vec<Cell>> {
    [
        ["mandal1", "password1", "Mandal1", "admin"],
        ["mandal2", "password2", "Mandal2", "user"],
        ["mandal3", "password3", "Mandal3", "user"],
    ]
    .iter()
    .map(|row| row.iter().map(|v| Cell::text(*v)).collect())
    .collect()
}

/// Sample metric rows written when the data sheet holds no data
pub fn seed_rows() -> Vec<Vec<Cell>> {
    let rows: [([&str; 7], [i64; 9]); 3] = [
        (
            ["District1", "Mandal1", "SEC001", "Secretariat1", "EMP001", "John Doe", "CL001"],
            [50, 45, 30, 25, 20, 15, 10, 8, 5],
        ),
        (
            ["District2", "Mandal2", "SEC002", "Secretariat2", "EMP002", "Jane Smith", "CL002"],
            [40, 35, 25, 20, 18, 12, 9, 7, 3],
        ),
        (
            ["District3", "Mandal3", "SEC003", "Secretariat3", "EMP003", "Bob Johnson", "CL003"],
            [60, 55, 40, 35, 30, 20, 15, 12, 8],
        ),
    ];

    rows.iter()
        .map(|(text, counts)| {
            text.iter()
                .map(|v| Cell::text(*v))
                .chain(counts.iter().map(|n| Cell::Number(*n)))
                .collect()
        })
        .collect()
}
