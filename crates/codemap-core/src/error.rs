use thiserror::Error;

/// Failures at the ingestion boundary. The layout stages themselves never fail.
#[derive(Error, Debug)]
pub enum CodemapError {
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodemapError>;
