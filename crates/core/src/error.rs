//! Error types for the core model

use thiserror::Error;

use crate::classify::ItemShape;

/// Result type alias using the core error
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core model errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog has no {shape} items")]
    EmptyBucket { shape: ItemShape },
}
