//! Bulk import/export formats.

mod csv;

pub use csv::*;
