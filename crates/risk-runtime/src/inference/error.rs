use risk_model::{InputError, LoadError, SchemaMismatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model loading failed: {0}")]
    ModelInitFailed(#[from] LoadError),
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}
