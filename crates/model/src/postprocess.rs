//! Weight normalization and rounding applied after a solve.

use ndarray::Array1;
use portopt_primitives::ModelSpec;
use tracing::warn;

use crate::ModelError;

/// Configuration for weight post-processing.
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Decimal places kept in reported weights.
    pub decimals: u32,
    /// Sums with absolute value at or below this are treated as zero.
    pub normalization_epsilon: f64,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self { decimals: 6, normalization_epsilon: 1e-12 }
    }
}

/// Turns raw solver weights into reported portfolio weights.
#[derive(Debug, Clone, Default)]
pub struct WeightPostProcessor {
    config: PostProcessConfig,
}

impl WeightPostProcessor {
    /// Create a post-processor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a post-processor with custom configuration.
    #[must_use]
    pub const fn with_config(config: PostProcessConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    /// Renormalize (tangency programs only) then round.
    ///
    /// # Errors
    /// Returns `ModelError::DegenerateNormalization` if a tangency solution
    /// sums to zero.
    pub fn process(&self, raw: &Array1<f64>, spec: &ModelSpec) -> Result<Array1<f64>, ModelError> {
        let weights = if spec.needs_normalization() {
            normalize(raw, self.config.normalization_epsilon)?
        } else {
            raw.clone()
        };
        Ok(round_weights(&weights, self.config.decimals))
    }
}

/// Divide weights by their sum.
///
/// # Errors
/// Returns `ModelError::DegenerateNormalization` if `|sum| <= epsilon` or the
/// sum is non-finite.
pub fn normalize(weights: &Array1<f64>, epsilon: f64) -> Result<Array1<f64>, ModelError> {
    let sum = weights.sum();
    if !sum.is_finite() || sum.abs() <= epsilon {
        warn!(sum, "weights cannot be renormalized");
        return Err(ModelError::DegenerateNormalization { sum });
    }
    Ok(weights / sum)
}

/// Round each weight to `decimals` places.
///
/// The rounded weights keep the rounded total of the input: whatever the
/// per-weight rounding adds or drops is settled on the largest weight, so a
/// unit budget still sums to one after rounding.
#[must_use]
pub fn round_weights(weights: &Array1<f64>, decimals: u32) -> Array1<f64> {
    let scale = 10f64.powi(decimals as i32);
    // `+ 0.0` turns a rounded `-0.0` into `0.0`.
    let round = |w: f64| (w * scale).round() / scale + 0.0;

    let mut rounded = weights.mapv(round);
    let residual = round(weights.sum()) - rounded.sum();
    let largest = rounded.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1)).map(|(i, _)| i);
    if let Some(i) = largest.filter(|_| residual != 0.0) {
        rounded[i] = round(rounded[i] + residual);
    }
    rounded
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn rounds_to_six_decimals() {
        let rounded = round_weights(&array![0.123_456_78, 0.876_543_22, -1e-9], 6);
        assert_relative_eq!(rounded[0], 0.123_457, epsilon = 1e-12);
        assert_relative_eq!(rounded[1], 0.876_543, epsilon = 1e-12);
        assert!(rounded[2] == 0.0 && rounded[2].is_sign_positive());
    }

    #[test]
    fn rounding_keeps_a_unit_budget() {
        // Three weights round up by 4e-7 each; the naive total is 1.000001.
        let raw = array![0.250_000_6, 0.250_000_6, 0.250_000_6, 0.249_998_2];
        let rounded = round_weights(&raw, 6);

        assert_relative_eq!(rounded.sum(), 1.0, epsilon = 1e-12);
        for (r, w) in rounded.iter().zip(&raw) {
            assert!((r - w).abs() <= 1.5e-6, "{r} drifted from {w}");
        }
        assert_relative_eq!(rounded[3], 0.249_998, epsilon = 1e-12);
    }

    #[test]
    fn renormalized_tangency_weights_sum_to_one_after_rounding() {
        let processor = WeightPostProcessor::new();
        let raw = array![30.884_55, 18.658_25, 24.781_55, 25.675_65];
        let weights = processor.process(&raw, &ModelSpec::omega_tangency(0.0)).unwrap();
        assert_relative_eq!(weights.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn tangency_weights_are_renormalized() {
        let processor = WeightPostProcessor::new();
        let weights = processor.process(&array![20.0, 60.0], &ModelSpec::sharpe()).unwrap();
        assert_relative_eq!(weights[0], 0.25);
        assert_relative_eq!(weights[1], 0.75);
    }

    #[test]
    fn minimum_risk_weights_are_not_renormalized() {
        let processor = WeightPostProcessor::new();
        let weights = processor.process(&array![0.3, 0.6], &ModelSpec::markowitz()).unwrap();
        assert_relative_eq!(weights.sum(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn zero_sum_is_degenerate() {
        let processor = WeightPostProcessor::new();
        assert!(matches!(
            processor.process(&array![0.0, 0.0], &ModelSpec::sharpe()),
            Err(ModelError::DegenerateNormalization { .. })
        ));
    }
}
