//! Realized performance of a weight vector over a return history.

use ndarray::{Array1, ArrayView1};
use portopt_math::{mean, regress, sample_std, tail_mean};
use portopt_primitives::{
    BenchmarkSeries, MetricValue, PerformanceReport, ReturnSeries, WeightVector,
};

use crate::ModelError;

/// Periods per year for monthly returns.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Configuration for [`PerformanceEvaluator`].
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    /// Lower-tail probability for the CVaR metric.
    pub tail_probability: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { tail_probability: 0.05 }
    }
}

/// Per-period portfolio returns `R·w`.
///
/// # Errors
/// Returns `ModelError::DimensionMismatch` if the weight count differs from
/// the asset count.
pub fn portfolio_returns(
    returns: &ReturnSeries,
    weights: &WeightVector,
) -> Result<Array1<f64>, ModelError> {
    if weights.len() != returns.n_assets() {
        return Err(ModelError::DimensionMismatch {
            expected: returns.n_assets(),
            actual: weights.len(),
            context: "weights".to_string(),
        });
    }
    Ok(returns.values().dot(weights.values()))
}

/// Cumulative wealth of one unit invested at the start, compounding returns
/// as log returns.
///
/// The curve has one more entry than there are periods; the first is 1.
///
/// # Errors
/// Returns `ModelError::DimensionMismatch` if the weight count differs from
/// the asset count.
pub fn wealth_curve(
    returns: &ReturnSeries,
    weights: &WeightVector,
) -> Result<Array1<f64>, ModelError> {
    let portfolio = portfolio_returns(returns, weights)?;
    let mut curve = Vec::with_capacity(portfolio.len() + 1);
    let mut wealth = 1.0;
    curve.push(wealth);
    for r in &portfolio {
        wealth *= r.exp();
        curve.push(wealth);
    }
    Ok(Array1::from(curve))
}

/// Computes [`PerformanceReport`]s.
#[derive(Debug, Clone, Default)]
pub struct PerformanceEvaluator {
    config: PerformanceConfig,
}

impl PerformanceEvaluator {
    /// Create an evaluator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom configuration.
    #[must_use]
    pub const fn with_config(config: PerformanceConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Per-period metrics.
    ///
    /// Tracking error, active return and information ratio are
    /// [`MetricValue::NotApplicable`] for a single asset held at weight one.
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientData` if the benchmark is not aligned
    /// with the returns or there are fewer than three periods,
    /// `ModelError::DimensionMismatch` on a weight count mismatch, and
    /// `ModelError::RegressionSingularity` for a zero-variance benchmark.
    pub fn evaluate(
        &self,
        returns: &ReturnSeries,
        benchmark: &BenchmarkSeries,
        weights: &WeightVector,
    ) -> Result<PerformanceReport, ModelError> {
        self.compute(returns, benchmark, weights, 1.0)
    }

    /// Metrics with return scaled by `periods_per_year` and volatility by its
    /// square root. Sharpe, Treynor and Sortino use the scaled figures; the
    /// Sortino downside deviation, Omega, CVaR and the benchmark-relative
    /// metrics stay per-period.
    ///
    /// # Errors
    /// Same conditions as [`Self::evaluate`], plus
    /// `ModelError::InvalidConfig` if `periods_per_year` is not positive.
    pub fn evaluate_annualized(
        &self,
        returns: &ReturnSeries,
        benchmark: &BenchmarkSeries,
        weights: &WeightVector,
        periods_per_year: f64,
    ) -> Result<PerformanceReport, ModelError> {
        if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "periods per year must be positive, got {periods_per_year}"
            )));
        }
        self.compute(returns, benchmark, weights, periods_per_year)
    }

    fn compute(
        &self,
        returns: &ReturnSeries,
        benchmark: &BenchmarkSeries,
        weights: &WeightVector,
        periods_per_year: f64,
    ) -> Result<PerformanceReport, ModelError> {
        if !benchmark.is_aligned_with(returns) {
            return Err(ModelError::InsufficientData(format!(
                "benchmark '{}' has {} periods, returns have {}",
                benchmark.name(),
                benchmark.len(),
                returns.n_periods()
            )));
        }
        let portfolio = portfolio_returns(returns, weights)?;
        let market = benchmark.values().view();
        let fit = regress(portfolio.view(), market)?;

        let mean_return = mean(portfolio.view())? * periods_per_year;
        let volatility = sample_std(portfolio.view())? * periods_per_year.sqrt();
        let downside = portfolio.mapv(|r| r.min(0.0));
        let gains: f64 = portfolio.iter().map(|r| r.max(0.0)).sum();
        let losses: f64 = -downside.sum();

        let (tracking_error, active_return, information_ratio) = if weights.is_single_holding() {
            (MetricValue::NotApplicable, MetricValue::NotApplicable, MetricValue::NotApplicable)
        } else {
            let active = &portfolio - benchmark.values();
            let (te, ra) = active_statistics(active.view())?;
            (te.into(), ra.into(), (ra / te).into())
        };

        Ok(PerformanceReport {
            mean_return,
            volatility,
            sharpe: mean_return / volatility,
            beta: fit.beta,
            treynor: mean_return / fit.beta,
            sortino: mean_return / sample_std(downside.view())?,
            omega: gains / losses,
            cvar: tail_mean(portfolio.view(), self.config.tail_probability)?,
            tracking_error,
            active_return,
            information_ratio,
        })
    }
}

fn active_statistics(active: ArrayView1<'_, f64>) -> Result<(f64, f64), ModelError> {
    Ok((sample_std(active)?, mean(active)?))
}
