//! Single-index (Treynor ratio) ranking and cutoff allocation.
//!
//! Each asset is regressed on the benchmark. Assets are ranked by excess
//! return per unit of beta, and a cutoff rate `C*` splits the ranking into
//! held and excluded assets. Held assets are weighted in proportion to
//! `z_i = (β_i / σ²_εi)(T_i - C*)`.

use ndarray::{Array1, ArrayView1};
use portopt_math::{mean, regress, sample_variance};
use portopt_primitives::{BenchmarkSeries, ReturnSeries, Symbol, WeightVector};
use tracing::{debug, warn};

use crate::ModelError;

/// Market-model statistics of one asset, in ranking order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRanking {
    /// Asset symbol.
    pub symbol: Symbol,
    /// Column index in the return series.
    pub column: usize,
    /// Mean return.
    pub mean_return: f64,
    /// Regression intercept.
    pub alpha: f64,
    /// Regression slope on the benchmark.
    pub beta: f64,
    /// Adjusted R² of the regression.
    pub adjusted_r_squared: f64,
    /// Residual (idiosyncratic) variance.
    pub residual_variance: f64,
    /// Mean return per unit of beta.
    pub treynor_ratio: f64,
    /// Cutoff rate `C_k` using this asset and every higher-ranked one.
    pub cutoff_rate: f64,
    /// Unnormalized score `z_i` actually allocated; zero for assets at or
    /// below the cutoff.
    pub score: f64,
}

/// Treynor-ranked portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct TreynorPortfolio {
    /// Weights in return-column order, summing to one.
    pub weights: WeightVector,
    /// Assets sorted by descending Treynor ratio.
    pub ranking: Vec<AssetRanking>,
    /// Cutoff rate `C*`, the maximum of the `C_k`.
    pub cutoff: f64,
    /// Sample variance of the benchmark.
    pub market_variance: f64,
}

impl TreynorPortfolio {
    /// Symbols that receive positive weight, in ranking order.
    pub fn holdings(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.ranking.iter().filter(|a| self.weights.values()[a.column] > 0.0).map(|a| &a.symbol)
    }
}

/// Rank assets by Treynor ratio and allocate above the cutoff rate.
///
/// The risk-free rate is zero. Weights are not rounded.
///
/// # Errors
/// Returns `ModelError::InsufficientData` if the benchmark is not aligned
/// with the returns or there are fewer than two periods,
/// `ModelError::RegressionSingularity` if the benchmark has zero variance or
/// an asset has zero beta or zero residual variance, and
/// `ModelError::DegenerateNormalization` if no asset scores above zero.
pub fn treynor_portfolio(
    returns: &ReturnSeries,
    benchmark: &BenchmarkSeries,
) -> Result<TreynorPortfolio, ModelError> {
    if !benchmark.is_aligned_with(returns) {
        return Err(ModelError::InsufficientData(format!(
            "benchmark '{}' has {} periods, returns have {}",
            benchmark.name(),
            benchmark.len(),
            returns.n_periods()
        )));
    }
    let market = benchmark.values().view();
    let market_variance = sample_variance(market)?;

    let mut ranking = returns
        .symbols()
        .iter()
        .enumerate()
        .map(|(column, symbol)| fit_asset(symbol, column, returns.column(column), market))
        .collect::<Result<Vec<_>, _>>()?;
    ranking.sort_by(|a, b| b.treynor_ratio.total_cmp(&a.treynor_ratio));

    let mut excess_sum = 0.0;
    let mut beta_sum = 0.0;
    for asset in &mut ranking {
        excess_sum += asset.mean_return * asset.beta / asset.residual_variance;
        beta_sum += asset.beta.powi(2) / asset.residual_variance;
        asset.cutoff_rate = market_variance * excess_sum / (1.0 + market_variance * beta_sum);
    }
    let cutoff = ranking.iter().map(|a| a.cutoff_rate).fold(f64::NEG_INFINITY, f64::max);

    let mut scores = Array1::zeros(returns.n_assets());
    for asset in &mut ranking {
        asset.score = if asset.treynor_ratio > cutoff {
            (asset.beta / asset.residual_variance * (asset.treynor_ratio - cutoff)).max(0.0)
        } else {
            0.0
        };
        scores[asset.column] = asset.score;
    }

    let total = scores.sum();
    if total.is_nan() || total <= 0.0 {
        warn!(cutoff, "no asset ranks above the cutoff rate");
        return Err(ModelError::DegenerateNormalization { sum: total });
    }
    let weights = scores / total;
    debug!(
        cutoff,
        held = weights.iter().filter(|&&w| w > 0.0).count(),
        assets = ranking.len(),
        "treynor allocation"
    );

    Ok(TreynorPortfolio {
        weights: WeightVector::for_series(returns, weights)?,
        ranking,
        cutoff,
        market_variance,
    })
}

fn fit_asset(
    symbol: &Symbol,
    column: usize,
    asset: ArrayView1<'_, f64>,
    market: ArrayView1<'_, f64>,
) -> Result<AssetRanking, ModelError> {
    let fit = regress(asset, market)?;
    if fit.beta == 0.0 {
        return Err(ModelError::RegressionSingularity(format!("{symbol} has zero beta")));
    }
    // Residuals at rounding level mean the benchmark explains the asset exactly.
    if fit.residual_variance <= f64::EPSILON * sample_variance(asset)? {
        return Err(ModelError::RegressionSingularity(format!(
            "{symbol} has zero residual variance"
        )));
    }
    let mean_return = mean(asset)?;

    Ok(AssetRanking {
        symbol: symbol.clone(),
        column,
        mean_return,
        alpha: fit.alpha,
        beta: fit.beta,
        adjusted_r_squared: fit.adjusted_r_squared,
        residual_variance: fit.residual_variance,
        treynor_ratio: mean_return / fit.beta,
        cutoff_rate: 0.0,
        score: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    use super::*;

    fn market() -> Array1<f64> {
        array![0.02, -0.01, 0.03, -0.02, 0.01, 0.015, -0.005, 0.025]
    }

    /// Asset returns `alpha + beta * market + noise` with distinct noise per asset.
    fn universe(params: &[(f64, f64)]) -> ReturnSeries {
        let m = market();
        let noise = [
            array![0.004, -0.003, 0.002, 0.001, -0.004, 0.003, -0.002, -0.001],
            array![-0.002, 0.004, -0.001, -0.003, 0.002, 0.001, 0.003, -0.004],
            array![0.001, 0.002, -0.004, 0.003, 0.001, -0.003, -0.002, 0.002],
            array![-0.003, -0.001, 0.003, 0.002, -0.002, 0.004, 0.001, -0.004],
        ];
        let mut values = Array2::zeros((m.len(), params.len()));
        for (j, &(alpha, beta)) in params.iter().enumerate() {
            let column = m.mapv(|x| alpha + beta * x) + &noise[j];
            values.column_mut(j).assign(&column);
        }
        let symbols: Vec<String> = (0..params.len()).map(|j| format!("S{j}")).collect();
        ReturnSeries::new(symbols, values).unwrap()
    }

    #[test]
    fn weights_are_a_simplex_over_high_ratio_assets() {
        let returns = universe(&[(0.004, 0.8), (0.001, 1.2), (0.006, 1.0), (-0.002, 1.1)]);
        let benchmark = BenchmarkSeries::new("MKT", market());
        let portfolio = treynor_portfolio(&returns, &benchmark).unwrap();

        assert_relative_eq!(portfolio.weights.sum(), 1.0, epsilon = 1e-12);
        assert!(portfolio.weights.values().iter().all(|&w| w >= 0.0));

        for pair in portfolio.ranking.windows(2) {
            assert!(pair[0].treynor_ratio >= pair[1].treynor_ratio);
        }
        for asset in &portfolio.ranking {
            if asset.treynor_ratio <= portfolio.cutoff {
                assert_eq!(portfolio.weights.values()[asset.column], 0.0);
            }
        }
        let best = &portfolio.ranking[0];
        assert!(portfolio.weights.values()[best.column] > 0.0);
        assert_eq!(portfolio.holdings().next(), Some(&best.symbol));
    }

    #[test]
    fn excluded_negative_beta_asset_has_zero_score() {
        let returns = universe(&[(0.004, 0.8), (0.006, 1.0), (0.003, -0.6)]);
        let benchmark = BenchmarkSeries::new("MKT", market());
        let portfolio = treynor_portfolio(&returns, &benchmark).unwrap();

        let hedge = portfolio.ranking.iter().find(|a| a.column == 2).unwrap();
        assert!(hedge.beta < 0.0);
        assert!(hedge.treynor_ratio <= portfolio.cutoff);
        assert_eq!(hedge.score, 0.0);
        assert_eq!(portfolio.weights.values()[2], 0.0);

        let total: f64 = portfolio.ranking.iter().map(|a| a.score).sum();
        for asset in &portfolio.ranking {
            assert_relative_eq!(
                portfolio.weights.values()[asset.column],
                asset.score / total,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn two_periods_fit_exactly_and_are_singular() {
        let returns = ReturnSeries::new(["A", "B"], array![[0.01, 0.02], [-0.01, 0.00]]).unwrap();
        let benchmark = BenchmarkSeries::new("MKT", array![0.02, -0.01]);
        assert!(matches!(
            treynor_portfolio(&returns, &benchmark),
            Err(ModelError::RegressionSingularity(_))
        ));
    }

    #[test]
    fn cutoff_is_maximum_cutoff_rate() {
        let returns = universe(&[(0.004, 0.8), (0.001, 1.2), (0.006, 1.0)]);
        let benchmark = BenchmarkSeries::new("MKT", market());
        let portfolio = treynor_portfolio(&returns, &benchmark).unwrap();

        let max_rate =
            portfolio.ranking.iter().map(|a| a.cutoff_rate).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(portfolio.cutoff, max_rate);
        assert_relative_eq!(
            portfolio.market_variance,
            sample_variance(market().view()).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn no_positive_score_is_degenerate() {
        let returns = universe(&[(-0.01, 1.0), (-0.012, 0.9)]);
        let benchmark = BenchmarkSeries::new("MKT", market());
        assert!(matches!(
            treynor_portfolio(&returns, &benchmark),
            Err(ModelError::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn misaligned_benchmark_is_rejected() {
        let returns = universe(&[(0.004, 0.8)]);
        let benchmark = BenchmarkSeries::new("MKT", array![0.01, 0.02, 0.03]);
        assert!(matches!(
            treynor_portfolio(&returns, &benchmark),
            Err(ModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn flat_benchmark_is_singular() {
        let returns = universe(&[(0.004, 0.8)]);
        let benchmark = BenchmarkSeries::new("MKT", Array1::from_elem(8, 0.01));
        assert!(matches!(
            treynor_portfolio(&returns, &benchmark),
            Err(ModelError::RegressionSingularity(_))
        ));
    }

    #[test]
    fn perfect_fit_is_singular() {
        let m = market();
        let returns = ReturnSeries::new(["A"], m.mapv(|x| 0.001 + x).insert_axis(ndarray::Axis(1)))
            .unwrap();
        let benchmark = BenchmarkSeries::new("MKT", m);
        assert!(matches!(
            treynor_portfolio(&returns, &benchmark),
            Err(ModelError::RegressionSingularity(_))
        ));
    }
}
