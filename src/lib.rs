//! rowgen - table-driven header/source generation
//!
//! Reads documents that declare tables of rows and a template of directives,
//! and expands the template against the tables into a header stream and a
//! source stream.

pub mod config;
pub mod error;
pub mod gen;
pub mod join;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;

pub use config::GenConfig;
pub use error::{Diagnostic, Diagnostics, ErrorKind};
pub use gen::Generated;
pub use model::{Table, TableStore};
