//! Date alignment of asset and benchmark return frames.

use polars::prelude::*;
use portopt_primitives::{BenchmarkSeries, ReturnSeries};

use crate::{UtilsError, benchmark_from_frame, returns_from_frame};

/// Inner-join `returns` and `benchmark` on `date_column`, sorted by date.
///
/// Periods present in only one frame are dropped.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if either frame lacks the date
/// column, `UtilsError::InvalidParameter` if no period survives the join,
/// and `UtilsError::Polars` if the join fails.
pub fn align_on_dates(
    returns: &DataFrame,
    benchmark: &DataFrame,
    date_column: &str,
) -> Result<DataFrame, UtilsError> {
    for frame in [returns, benchmark] {
        if frame.column(date_column).is_err() {
            return Err(UtilsError::MissingColumn(date_column.to_string()));
        }
    }

    let joined = returns
        .clone()
        .lazy()
        .join(
            benchmark.clone().lazy(),
            [col(date_column)],
            [col(date_column)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([date_column], SortMultipleOptions::default())
        .collect()?;

    if joined.height() == 0 {
        return Err(UtilsError::InvalidParameter(format!(
            "no common periods on column '{date_column}'"
        )));
    }
    Ok(joined)
}

/// Split an aligned frame into asset returns and the benchmark.
///
/// Every column other than `date_column` and `benchmark_column` is an asset.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if a named column is absent and
/// conversion errors from [`returns_from_frame`].
pub fn split_aligned(
    aligned: &DataFrame,
    benchmark_column: &str,
    date_column: &str,
) -> Result<(ReturnSeries, BenchmarkSeries), UtilsError> {
    let benchmark = benchmark_from_frame(aligned, benchmark_column, Some(date_column))?;
    let assets = aligned.drop(benchmark_column)?;
    let returns = returns_from_frame(&assets, Some(date_column))?;
    Ok((returns, benchmark))
}
