mod columns;
mod csv;
mod xlsx;

pub use columns::{display_columns, headers, row_values, CellValue, DisplayColumn};
pub use csv::{write_csv, DEFAULT_DELIMITER};
pub use xlsx::write_xlsx;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("xlsx: row {row}, column {column}: {source}")]
    Cell {
        row: u32,
        column: &'static str,
        #[source]
        source: XlsxError,
    },

    #[error("xlsx: {0}")]
    Workbook(#[from] XlsxError),
}

impl ExportError {
    fn cell(row: u32, column: &'static str, source: XlsxError) -> Self {
        ExportError::Cell { row, column, source }
    }
}
