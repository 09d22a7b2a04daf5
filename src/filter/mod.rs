pub mod types;
pub mod filter;
pub mod error;

pub use types::*;
pub use filter::{Filter, FilteredPage};
pub use error::FilterError;
