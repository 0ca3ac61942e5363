use thiserror::Error;

use crate::TimeParseError;

/// Unified error type for the fallible convenience surface: reading stored
/// JSON, loading option files and parsing times.
///
/// Normalization and evaluation themselves never fail.
#[derive(Debug, Error)]
pub enum BlockvisError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InvalidTime(#[from] TimeParseError),
}
