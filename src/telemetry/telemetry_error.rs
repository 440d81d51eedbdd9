use thiserror::Error;

/// Any of these means "no telemetry this cycle". Nothing partial is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error("Telemetry not configured: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Tracker answered HTTP {status}")]
    Status { status: u16 },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for TelemetryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TelemetryError::Timeout(e.to_string())
        } else {
            TelemetryError::Network(e.to_string())
        }
    }
}
