//! Data model for table-driven generation

mod schema;
mod store;
mod table;

pub use schema::{Column, ColumnDefaults};
pub use store::TableStore;
pub use table::{Row, Table};
