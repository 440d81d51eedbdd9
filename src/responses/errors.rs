// responses/errors.rs
use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;
use tracing::{error, warn};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a JSON error response.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();

    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    let mut body = json!({ "status": status, "error": err.to_string() });
    if let ServerError::Schema(schema) = &err {
        body["missing"] = json!(schema.missing);
    }

    json_error_response(status, &body)
}

pub fn json_error_response(status: u16, body: &serde_json::Value) -> Response {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
