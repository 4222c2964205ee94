pub mod csv_export;
pub mod json_export;

use anyhow::Result;

use crate::core::diagnostics::Extraction;
use crate::core::model::LinkedRow;

pub use csv_export::{read_rows_csv, CsvExporter};
pub use json_export::JsonExporter;

/// Everything one run produces: the extracted rows with their diagnostics and,
/// when the incumbency pass ran, the annotated rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnsTable {
    pub extraction: Extraction,
    pub linked: Option<Vec<LinkedRow>>,
}

pub trait Exporter {
    fn export(&self, table: &ReturnsTable) -> Result<()>;
}
