//! Return series definitions.

use std::collections::HashSet;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::Serialize;

use crate::{Date, SeriesError, Symbol};

/// Periodic asset returns: rows are periods (chronological), columns are assets.
///
/// Returns are treated as continuously-compounded log returns by the
/// performance evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    symbols: Vec<Symbol>,
    dates: Option<Vec<Date>>,
    values: Array2<f64>,
}

impl ReturnSeries {
    /// Create a return series from asset symbols and a periods x assets matrix.
    ///
    /// # Errors
    /// Returns `SeriesError` if the symbol count does not match the column
    /// count, a symbol is repeated, or there are no assets.
    pub fn new(
        symbols: impl IntoIterator<Item = impl Into<Symbol>>,
        values: Array2<f64>,
    ) -> Result<Self, SeriesError> {
        let symbols: Vec<Symbol> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(SeriesError::NoAssets);
        }
        if symbols.len() != values.ncols() {
            return Err(SeriesError::ShapeMismatch {
                expected: values.ncols(),
                actual: symbols.len(),
                context: "symbols".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(SeriesError::DuplicateSymbol(symbol.to_string()));
            }
        }

        Ok(Self { symbols, dates: None, values })
    }

    /// Attach a chronological date index, one date per period.
    ///
    /// # Errors
    /// Returns `SeriesError` if the date count does not match the period
    /// count or dates are not strictly increasing.
    pub fn with_dates(mut self, dates: Vec<Date>) -> Result<Self, SeriesError> {
        validate_dates(&dates, self.n_periods())?;
        self.dates = Some(dates);
        Ok(self)
    }

    /// Number of periods (rows).
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.values.nrows()
    }

    /// Number of assets (columns).
    #[must_use]
    pub const fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Asset symbols in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Period dates, if attached.
    #[must_use]
    pub fn dates(&self) -> Option<&[Date]> {
        self.dates.as_deref()
    }

    /// The periods x assets return matrix.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns of a single asset by column index.
    #[must_use]
    pub fn column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    /// Column index of an asset symbol.
    #[must_use]
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.as_str() == symbol)
    }

    /// Returns of a single asset by symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.position(symbol).map(|i| self.column(i))
    }

    /// Build a new series keeping only the given columns, in the given order.
    ///
    /// # Errors
    /// Returns `SeriesError` if an index is out of range, repeated, or empty.
    pub fn select(&self, indices: &[usize]) -> Result<Self, SeriesError> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_assets()) {
            return Err(SeriesError::ShapeMismatch {
                expected: self.n_assets(),
                actual: bad + 1,
                context: "column index".to_string(),
            });
        }
        let symbols: Vec<Symbol> = indices.iter().map(|&i| self.symbols[i].clone()).collect();
        let values = self.values.select(Axis(1), indices);
        let selected = Self::new(symbols, values)?;
        Ok(Self { dates: self.dates.clone(), ..selected })
    }
}

/// A single benchmark (market index) return column aligned to a `ReturnSeries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSeries {
    name: Symbol,
    dates: Option<Vec<Date>>,
    values: Array1<f64>,
}

impl BenchmarkSeries {
    /// Create a benchmark series.
    #[must_use]
    pub fn new(name: impl Into<Symbol>, values: Array1<f64>) -> Self {
        Self { name: name.into(), dates: None, values }
    }

    /// Attach a chronological date index.
    ///
    /// # Errors
    /// Returns `SeriesError` if the date count does not match the period
    /// count or dates are not strictly increasing.
    pub fn with_dates(mut self, dates: Vec<Date>) -> Result<Self, SeriesError> {
        validate_dates(&dates, self.len())?;
        self.dates = Some(dates);
        Ok(self)
    }

    /// Benchmark name.
    #[must_use]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Period dates, if attached.
    #[must_use]
    pub fn dates(&self) -> Option<&[Date]> {
        self.dates.as_deref()
    }

    /// Benchmark returns.
    #[must_use]
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Whether this benchmark shares the period index of `returns`.
    ///
    /// Period counts must match; when both sides carry dates they must be
    /// identical.
    #[must_use]
    pub fn is_aligned_with(&self, returns: &ReturnSeries) -> bool {
        if self.len() != returns.n_periods() {
            return false;
        }
        match (self.dates(), returns.dates()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => true,
        }
    }
}

fn validate_dates(dates: &[Date], periods: usize) -> Result<(), SeriesError> {
    if dates.len() != periods {
        return Err(SeriesError::ShapeMismatch {
            expected: periods,
            actual: dates.len(),
            context: "dates".to_string(),
        });
    }
    if let Some(i) = dates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SeriesError::UnorderedDates(i + 1));
    }
    Ok(())
}
