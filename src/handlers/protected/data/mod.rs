// handlers/protected/data/mod.rs - Data sheet handlers

pub mod list;
pub mod options;
pub mod record;
pub mod row;

pub use list::{list_get, DataQuery};
pub use options::options_get;
pub use record::{record_delete, record_put};
pub use row::{data_post, row_delete, row_put};
