use thiserror::Error;

/// A required column was not found. Lists every missing column, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{table}: missing required columns [{}]", .missing.join(", "))]
pub struct SchemaError {
    pub table: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not a JSON cell grid: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
