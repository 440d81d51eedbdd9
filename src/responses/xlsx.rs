// responses/xlsx.rs
use crate::responses::attachment::attachment;
use crate::responses::ResultResp;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Workbook bytes from `export::write_xlsx` as a download.
pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    attachment(buffer, XLSX_CONTENT_TYPE, filename)
}
