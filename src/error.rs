//! Error types for reliability estimation.
//!
//! Every estimator is a deterministic pure function, so none of these errors
//! is transient. They are returned to the caller as soon as they are detected.

use thiserror::Error;

/// Errors raised by reliability estimators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReliabilityError {
    /// A required variance or correlation is undefined (zero-variance column,
    /// r = -1 in the Spearman–Brown denominator, zero total-score variance).
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// What made the quantity undefined
        reason: String,
    },

    /// Externally supplied loadings are empty, non-finite or outside [-1, 1].
    #[error("invalid loadings: {reason}")]
    InvalidLoadings {
        /// Which loading is wrong and why
        reason: String,
    },

    /// Item counts or item-name sets disagree with what the estimator needs.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Description of the disagreement
        reason: String,
    },

    /// A response matrix could not be constructed from the given cells, or
    /// an estimator was configured with unusable parameters.
    #[error("invalid data: {reason}")]
    InvalidData {
        /// Description of the offending cell, column name or parameter
        reason: String,
    },
}

impl ReliabilityError {
    /// Create a DegenerateInput error.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Create an InvalidLoadings error.
    pub fn invalid_loadings(reason: impl Into<String>) -> Self {
        Self::InvalidLoadings {
            reason: reason.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }

    /// Create an InvalidData error.
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReliabilityError>;
