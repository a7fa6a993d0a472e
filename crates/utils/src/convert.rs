//! Conversion between wide polars frames and portfolio inputs.
//!
//! A wide return frame has an optional date column and one `f64` column per
//! asset, one row per period.

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use portopt_primitives::{BenchmarkSeries, Date, ReturnSeries, WeightVector};

use crate::UtilsError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Build a [`ReturnSeries`] from every column of `df` except `date_column`.
///
/// # Arguments
/// * `df` - Wide frame, one row per period
/// * `date_column` - Optional period label column (`Date` or `YYYY-MM-DD` strings)
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if `date_column` is absent,
/// `UtilsError::InvalidValue` for null or unparsable cells, and
/// `UtilsError::Series` if no asset columns remain.
pub fn returns_from_frame(
    df: &DataFrame,
    date_column: Option<&str>,
) -> Result<ReturnSeries, UtilsError> {
    let assets: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| Some(name.as_str()) != date_column)
        .collect();

    let mut values = Array2::zeros((df.height(), assets.len()));
    for (j, name) in assets.iter().enumerate() {
        values.column_mut(j).assign(&float_column(df, name)?);
    }

    let series = ReturnSeries::new(assets, values)?;
    match date_column {
        Some(name) => Ok(series.with_dates(date_values(df, name)?)?),
        None => Ok(series),
    }
}

/// Build a [`BenchmarkSeries`] from one column of `df`.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if a named column is absent and
/// `UtilsError::InvalidValue` for null or unparsable cells.
pub fn benchmark_from_frame(
    df: &DataFrame,
    column: &str,
    date_column: Option<&str>,
) -> Result<BenchmarkSeries, UtilsError> {
    let benchmark = BenchmarkSeries::new(column, float_column(df, column)?);
    match date_column {
        Some(name) => Ok(benchmark.with_dates(date_values(df, name)?)?),
        None => Ok(benchmark),
    }
}

/// Two-column `symbol` / `weight` frame for display or export.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be built.
pub fn weights_frame(weights: &WeightVector) -> Result<DataFrame, UtilsError> {
    let symbols: Vec<String> = weights.symbols().iter().map(ToString::to_string).collect();
    let values: Vec<f64> = weights.values().to_vec();
    Ok(df! {
        "symbol" => symbols,
        "weight" => values,
    }?)
}

pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Array1<f64>, UtilsError> {
    let column = df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))?;
    let floats = column.cast(&DataType::Float64)?;
    floats
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| UtilsError::InvalidValue { column: name.to_string(), row })
        })
        .collect()
}

pub(crate) fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Date>, UtilsError> {
    let column = df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))?;
    let invalid = |row| UtilsError::InvalidValue { column: name.to_string(), row };

    match column.dtype() {
        DataType::Date => column
            .cast(&DataType::Int32)?
            .i32()?
            .into_iter()
            .enumerate()
            .map(|(row, days)| {
                days.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_FROM_CE))
                    .ok_or_else(|| invalid(row))
            })
            .collect(),
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, text)| {
                text.and_then(|t| NaiveDate::parse_from_str(t.trim(), "%Y-%m-%d").ok())
                    .ok_or_else(|| invalid(row))
            })
            .collect(),
        other => Err(UtilsError::InvalidParameter(format!(
            "date column '{name}' has unsupported type {other}"
        ))),
    }
}
