// responses/attachment.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// A download: the browser saves the body under `filename`.
pub fn attachment(body: impl Into<Body>, content_type: &str, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Disposition", format!("attachment; filename=\"{filename}\""))
        .header("Cache-Control", "no-store")
        .body(body.into())
        .map_err(|e| ServerError::Internal(e.to_string()))
}
