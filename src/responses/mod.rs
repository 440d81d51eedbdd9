mod attachment;
pub mod csv;
pub mod errors;
pub mod json;
pub mod xlsx;

pub use csv::csv_response;
pub use errors::{error_to_response, ResultResp};
pub use json::json_response;
pub use xlsx::xlsx_response;
