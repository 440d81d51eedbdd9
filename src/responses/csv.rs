// responses/csv.rs
use crate::responses::attachment::attachment;
use crate::responses::ResultResp;

pub fn csv_response(text: String, filename: &str) -> ResultResp {
    attachment(text, "text/csv; charset=utf-8", filename)
}
