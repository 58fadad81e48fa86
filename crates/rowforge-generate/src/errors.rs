use thiserror::Error;

/// Errors emitted by the generation engine and its output renderers.
///
/// Per-value failures never surface here; they travel in-band as error
/// strings inside the generated rows.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Request(#[from] rowforge_core::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
