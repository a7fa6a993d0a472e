//! Error types for data adapters.

use portopt_primitives::SeriesError;

/// Errors that can occur while converting tables into portfolio inputs.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A null or unparsable cell.
    #[error("null or invalid value in column '{column}' at row {row}")]
    InvalidValue {
        /// Column name.
        column: String,
        /// Row index.
        row: usize,
    },

    /// Data-model error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}
