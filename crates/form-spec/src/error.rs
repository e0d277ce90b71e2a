use thiserror::Error;

/// Failures raised by document operations. A failed operation never leaves a
/// partially mutated document behind.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("'{0}' was not found in the form")]
    NotFound(String),
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("operation rejected: {0}")]
    InvariantViolation(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("failed to parse form json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render template: {0}")]
    Template(String),
}
