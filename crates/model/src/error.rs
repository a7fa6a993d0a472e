//! Error types for portfolio optimization and evaluation.

use portopt_math::MathError;
use portopt_primitives::SeriesError;
use portopt_traits::SolverError;

/// Errors that can occur while building, solving, or evaluating a portfolio.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Too few periods, or return and benchmark period indices disagree.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Solver ended without an optimal point.
    #[error("solver failure: {0}")]
    SolverFailure(#[from] SolverError),

    /// Renormalization divisor is zero (tangency or Treynor weights).
    #[error("degenerate normalization: weights sum to {sum}")]
    DegenerateNormalization {
        /// Sum that could not be divided by.
        sum: f64,
    },

    /// A regression slope or residual variance is undefined.
    #[error("regression singularity: {0}")]
    RegressionSingularity(String),

    /// Dimension mismatch.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Invalid configuration or model parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Math error.
    #[error("math error: {0}")]
    Math(MathError),

    /// Data-model error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

impl From<MathError> for ModelError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData { required, actual } => Self::InsufficientData(format!(
                "need at least {required} periods, got {actual}"
            )),
            MathError::Singular(reason) => Self::RegressionSingularity(reason),
            MathError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual, context: "series".to_string() }
            }
            other => Self::Math(other),
        }
    }
}

impl ModelError {
    /// Returns whether the error stems from the input data rather than the
    /// solver or configuration.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData(_)
                | Self::RegressionSingularity(_)
                | Self::DimensionMismatch { .. }
                | Self::Series(_)
        )
    }
}
