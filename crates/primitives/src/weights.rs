//! Portfolio weight definitions.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{ReturnSeries, SeriesError, Symbol};

/// Portfolio allocation, one weight per asset in return-column order.
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    symbols: Vec<Symbol>,
    weights: Array1<f64>,
}

impl WeightVector {
    /// Create a weight vector from symbols and weights.
    ///
    /// # Errors
    /// Returns `SeriesError::ShapeMismatch` if the lengths differ.
    pub fn new(
        symbols: impl IntoIterator<Item = impl Into<Symbol>>,
        weights: Array1<f64>,
    ) -> Result<Self, SeriesError> {
        let symbols: Vec<Symbol> = symbols.into_iter().map(Into::into).collect();
        if symbols.len() != weights.len() {
            return Err(SeriesError::ShapeMismatch {
                expected: symbols.len(),
                actual: weights.len(),
                context: "weights".to_string(),
            });
        }
        Ok(Self { symbols, weights })
    }

    /// Create a weight vector labelled with the columns of `returns`.
    ///
    /// # Errors
    /// Returns `SeriesError::ShapeMismatch` if the weight count differs from
    /// the asset count.
    pub fn for_series(returns: &ReturnSeries, weights: Array1<f64>) -> Result<Self, SeriesError> {
        Self::new(returns.symbols().iter().cloned(), weights)
    }

    /// Number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Asset symbols.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Weight values.
    #[must_use]
    pub const fn values(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Consume into the raw weight array.
    #[must_use]
    pub fn into_values(self) -> Array1<f64> {
        self.weights
    }

    /// Weight of a specific symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.symbols.iter().position(|s| s.as_str() == symbol).map(|i| self.weights[i])
    }

    /// Iterate over `(symbol, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> + '_ {
        self.symbols.iter().zip(self.weights.iter().copied())
    }

    /// Sum of weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }

    /// Smallest weight, `None` when empty.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.weights.iter().copied().reduce(f64::min)
    }

    /// Inner product with a per-asset vector (e.g. expected returns).
    #[must_use]
    pub fn dot(&self, other: &ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(other)
    }

    /// Whether this allocation is a single asset held at weight exactly one.
    #[must_use]
    pub fn is_single_holding(&self) -> bool {
        self.weights.len() == 1 && self.weights[0] == 1.0
    }
}
