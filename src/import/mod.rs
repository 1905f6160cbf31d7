//! Loading expense records from CSV exports.

mod csv_import;

pub use csv_import::{CsvImporter, CsvProfile};
