// export/xlsx.rs
use crate::domain::MergedRecord;
use crate::export::columns::{CellValue, DisplayColumn};
use crate::export::ExportError;
use rust_xlsxwriter::{Format, Workbook};

const SHEET_NAME: &str = "Frota";

/// One-sheet workbook with the display columns, header row in bold.
pub fn write_xlsx(rows: &[&MergedRecord], columns: &[DisplayColumn]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();

    // Headers
    for (col, column) in columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, column.header, &bold)
            .map_err(|e| ExportError::cell(0, column.header, e))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    // Rows
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, column) in columns.iter().enumerate() {
            let c = col as u16;
            let written = match (column.value)(row) {
                CellValue::Text(s) => worksheet.write_string(r, c, &s).map(|_| ()),
                CellValue::Number(n) => worksheet.write_number(r, c, n).map(|_| ()),
                CellValue::Empty => Ok(()),
            };
            written.map_err(|e| ExportError::cell(r, column.header, e))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
