//! Error types for data-model construction.

/// Errors raised while validating return series and weight vectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Number of labels does not match the data shape.
    #[error("shape mismatch for {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
        /// What was being checked.
        context: String,
    },

    /// An asset symbol appears more than once.
    #[error("duplicate asset symbol: {0}")]
    DuplicateSymbol(String),

    /// Period dates are not strictly increasing.
    #[error("dates are not strictly increasing at period {0}")]
    UnorderedDates(usize),

    /// No assets were provided.
    #[error("return series has no assets")]
    NoAssets,
}
