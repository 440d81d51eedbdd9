// errors.rs
use crate::export::ExportError;
use crate::query::FilterError;
use crate::table::{LoadError, SchemaError};
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad input, etc.) or downstream layers (loader, export).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The request doesn't apply to the configured telemetry source.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Schema(_) | ServerError::Filter(_) => 400,
            ServerError::Conflict(_) => 409,
            ServerError::Export(_) | ServerError::Internal(_) => 500,
        }
    }
}

impl From<LoadError> for ServerError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Schema(e) => ServerError::Schema(e),
            LoadError::Decode(e) => ServerError::BadRequest(format!("invalid grid: {e}")),
            LoadError::Io { .. } => ServerError::Internal(e.to_string()),
        }
    }
}
