//! Error taxonomy for the serving core.

use thiserror::Error;

/// Result type used across the serving core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Closed set of failures the core can report.
///
/// Expected business conditions (a missing product, an overdrawn purchase)
/// are variants here, never panics: callers branch on them and map them to
/// human-readable responses at the service boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Lookup miss (product, category, or an empty best-seller set).
    #[error("not found")]
    NotFound,

    /// Valid product, but stock cannot cover the requested quantity.
    #[error("insufficient stock: {available} available")]
    InsufficientStock { available: u64 },

    /// A filter request named an unknown criterion or a malformed range.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed request parameter (empty name, non-numeric price, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A prediction was requested but no demand model has been trained.
    #[error("demand model not trained")]
    ModelNotTrained,

    /// Training was attempted on a dataset the regression cannot fit.
    #[error("insufficient training data: {0}")]
    InsufficientTrainingData(String),

    /// The stock forecast could not be produced (too few points, or the
    /// numerical fit failed).
    #[error("forecast failed: {0}")]
    Forecast(String),

    /// Flush to (or load from) the durable source failed.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Unexpected internal failure (e.g. chart rendering).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn insufficient_training_data(msg: impl Into<String>) -> Self {
        Self::InsufficientTrainingData(msg.into())
    }

    pub fn forecast(msg: impl Into<String>) -> Self {
        Self::Forecast(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
