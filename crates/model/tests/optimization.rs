//! End-to-end optimization through the Clarabel backend.

mod common;

use approx::assert_abs_diff_eq;
use portopt_math::{covariance_matrix, mean_vector};
use portopt_model::{ModelError, PortfolioOptimizer, ProgramBuilder};
use portopt_primitives::{ModelSpec, ReturnSeries, RiskMeasure};
use rstest::rstest;

const TOLERANCE: f64 = 1e-6;

#[rstest]
#[case::markowitz(ModelSpec::markowitz())]
#[case::sortino(ModelSpec::sortino(0.0))]
#[case::omega(ModelSpec::omega(0.0))]
#[case::cvar(ModelSpec::cvar(0.95))]
fn minimum_risk_weights_are_fully_invested_and_long_only(#[case] spec: ModelSpec) {
    let returns = common::returns();
    let allocation = PortfolioOptimizer::new().optimize(&returns, &spec).unwrap();

    assert_abs_diff_eq!(allocation.weights.sum(), 1.0, epsilon = TOLERANCE);
    assert!(allocation.weights.min().unwrap() >= -TOLERANCE);
    assert_abs_diff_eq!(allocation.raw_weights.sum(), 1.0, epsilon = TOLERANCE);
    assert_eq!(allocation.weights.symbols(), returns.symbols());
}

#[rstest]
#[case::sharpe(ModelSpec::sharpe())]
#[case::sortino(ModelSpec::sortino_tangency(0.0))]
#[case::omega(ModelSpec::omega_tangency(0.0))]
#[case::omega_above_zero(ModelSpec::omega_tangency(0.005))]
#[case::omega_below_zero(ModelSpec::omega_tangency(-0.01))]
#[case::cvar(ModelSpec::cvar_tangency(0.95))]
fn tangency_weights_hit_unit_expected_return(#[case] spec: ModelSpec) {
    let returns = common::returns();
    let mu = mean_vector(returns.values()).unwrap();
    let allocation = PortfolioOptimizer::new().optimize(&returns, &spec).unwrap();

    assert_abs_diff_eq!(allocation.raw_weights.dot(&mu), 1.0, epsilon = TOLERANCE);
    assert_abs_diff_eq!(allocation.weights.sum(), 1.0, epsilon = TOLERANCE);
    assert!(allocation.weights.min().unwrap() >= -TOLERANCE);
}

#[test]
fn two_asset_minimum_variance_matches_closed_form() {
    let returns = common::returns().select(&[0, 1]).unwrap();
    let cov = covariance_matrix(returns.values()).unwrap();
    let (s11, s22, s12) = (cov[[0, 0]], cov[[1, 1]], cov[[0, 1]]);
    // Σ⁻¹1 / 1ᵀΣ⁻¹1 for two assets.
    let w0 = (s22 - s12) / (s11 + s22 - 2.0 * s12);
    assert!((0.0..=1.0).contains(&w0), "closed form must be interior, got {w0}");

    let allocation = PortfolioOptimizer::new().optimize(&returns, &ModelSpec::markowitz()).unwrap();

    assert_abs_diff_eq!(allocation.weights.values()[0], w0, epsilon = 1e-4);
    assert_abs_diff_eq!(allocation.weights.values()[1], 1.0 - w0, epsilon = 1e-4);
    assert_abs_diff_eq!(
        allocation.portfolio_variance(&returns).unwrap(),
        allocation.objective,
        epsilon = 1e-8
    );
}

#[test]
fn target_return_inside_mean_range_is_feasible() {
    let returns = common::returns();
    let mu = mean_vector(returns.values()).unwrap();
    let lowest = mu.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let optimizer = PortfolioOptimizer::new();

    for fraction in [0.1, 0.5, 0.9] {
        let target = lowest + fraction * (highest - lowest);
        for spec in [
            ModelSpec::markowitz_frontier(target),
            ModelSpec::sortino_frontier(target, 0.0),
            ModelSpec::omega_frontier(target, 0.0),
            ModelSpec::cvar_frontier(target, 0.95),
        ] {
            let allocation = optimizer.optimize(&returns, &spec).unwrap();
            assert_abs_diff_eq!(allocation.raw_weights.dot(&mu), target, epsilon = TOLERANCE);
            assert_abs_diff_eq!(allocation.weights.sum(), 1.0, epsilon = TOLERANCE);
        }
    }
}

#[test]
fn unreachable_target_is_a_solver_failure() {
    let returns = common::returns();
    let mu = mean_vector(returns.values()).unwrap();
    let beyond = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 0.01;

    let spec = ModelSpec::markowitz_frontier(beyond);
    let result = PortfolioOptimizer::new().optimize(&returns, &spec);
    assert!(matches!(result, Err(ModelError::SolverFailure(_))), "got {result:?}");
}

#[test]
fn tangency_without_positive_mean_is_a_solver_failure() {
    let values = common::returns().values().mapv(|r| r - 0.05);
    let returns = ReturnSeries::new(common::SYMBOLS, values).unwrap();

    let result = PortfolioOptimizer::new().optimize(&returns, &ModelSpec::sharpe());
    assert!(matches!(result, Err(ModelError::SolverFailure(_))), "got {result:?}");
}

#[test]
fn efficient_frontier_spans_the_mean_range() {
    let returns = common::returns();
    let optimizer = PortfolioOptimizer::new();
    let frontier = optimizer.efficient_frontier(&returns, RiskMeasure::Variance, 7).unwrap();
    let mu = ProgramBuilder::new(&returns).unwrap().mean_returns().clone();
    let lowest = mu.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(frontier.len(), 7);
    let points: Vec<_> = frontier.into_iter().map(Result::unwrap).collect();
    for pair in points.windows(2) {
        assert!(pair[0].target < pair[1].target);
    }
    for point in &points {
        assert!(point.target > lowest && point.target < highest);
        assert_abs_diff_eq!(point.realized_return, point.target, epsilon = TOLERANCE);
        assert!(point.risk >= 0.0);
    }

    // The global minimum variance bounds every frontier point from below.
    let gmv = optimizer.optimize(&returns, &ModelSpec::markowitz()).unwrap();
    assert!(points.iter().all(|p| p.risk >= gmv.objective - 1e-7));
}

#[test]
fn optimize_many_matches_individual_solves() {
    let returns = common::returns();
    let optimizer = PortfolioOptimizer::new();
    let specs = [ModelSpec::markowitz(), ModelSpec::cvar(0.95), ModelSpec::omega(0.0)];

    let batch = optimizer.optimize_many(&returns, &specs);
    for (spec, result) in specs.iter().zip(batch) {
        let single = optimizer.optimize(&returns, spec).unwrap();
        assert_eq!(result.unwrap().weights, single.weights);
    }
}

#[test]
fn semi_variance_with_high_threshold_is_markowitz() {
    let returns = common::returns();
    let optimizer = PortfolioOptimizer::new();
    let markowitz = optimizer.optimize(&returns, &ModelSpec::markowitz()).unwrap();
    let sortino = optimizer.optimize(&returns, &ModelSpec::sortino(1.0)).unwrap();

    for (a, b) in markowitz.weights.values().iter().zip(sortino.weights.values()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn cvar_objective_is_a_tail_expectation() {
    let returns = common::returns();
    let allocation = PortfolioOptimizer::new().optimize(&returns, &ModelSpec::cvar(0.95)).unwrap();

    // At the optimum the program value equals the tail-weighted loss of R·w,
    // minimized over the VaR level, which is at least the mean loss.
    let portfolio = returns.values().dot(&allocation.raw_weights);
    let mean_loss = -portfolio.mean().unwrap();
    assert!(allocation.objective >= mean_loss - TOLERANCE);
}
