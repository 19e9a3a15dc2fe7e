//! Error types for the order engine

use thiserror::Error;

use crate::surface::SurfaceError;
use foyer_core::CoreError;

/// Result type alias using the engine error
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Order engine errors
///
/// Interactive failures carry enough context to be diagnosed without
/// replaying the browsing session.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(
        "could not resolve add control for '{name}' at {price}: \
         {candidates} raw name match(es), none passed the name+price check"
    )]
    Resolution {
        name: String,
        price: String,
        candidates: usize,
    },

    #[error("modifier group '{group}' unsatisfied: selected {selected} out of {required}")]
    ModifierShortfall {
        group: String,
        selected: usize,
        required: usize,
    },

    #[error("alternate selection failed for '{item}': {reason}")]
    AlternateSelection { item: String, reason: String },

    #[error("no quantity control appeared for '{item}' after add")]
    StepperMissing { item: String },

    #[error("reconciliation mismatch: {0}")]
    Reconciliation(String),

    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
