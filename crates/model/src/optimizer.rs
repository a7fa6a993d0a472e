//! Portfolio optimization entry point.

use ndarray::Array1;
use portopt_math::covariance_matrix;
use portopt_primitives::{
    ModelSpec, Objective, ReturnSeries, RiskMeasure, SolveStatus, WeightVector,
};
use portopt_traits::ConvexSolver;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    ClarabelSolver, ModelError, PostProcessConfig, ProgramBuilder, SolverConfig,
    WeightPostProcessor,
};

/// Configuration for [`PortfolioOptimizer`].
#[derive(Debug, Clone, Default)]
pub struct OptimizerConfig {
    /// Interior-point solver settings.
    pub solver: SolverConfig,
    /// Weight normalization and rounding.
    pub post_process: PostProcessConfig,
}

/// An optimized portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Model that produced the allocation.
    pub spec: ModelSpec,
    /// Reported weights, normalized (tangency) and rounded.
    pub weights: WeightVector,
    /// Weight block of the solver's primal solution.
    pub raw_weights: Array1<f64>,
    /// Optimal value of the program objective.
    pub objective: f64,
    /// Terminal solver status.
    pub status: SolveStatus,
    /// Solver iterations.
    pub iterations: u32,
}

impl Allocation {
    /// Expected per-period return `w·μ` of the reported weights.
    #[must_use]
    pub fn expected_return(&self, mean_returns: &Array1<f64>) -> f64 {
        self.weights.dot(&mean_returns.view())
    }

    /// Sample variance `wᵀΣw` of the reported weights over `returns`.
    ///
    /// # Errors
    /// Returns `ModelError` if the covariance cannot be computed or the asset
    /// count differs from the weight count.
    pub fn portfolio_variance(&self, returns: &ReturnSeries) -> Result<f64, ModelError> {
        if returns.n_assets() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                actual: returns.n_assets(),
                context: "assets".to_string(),
            });
        }
        let cov = covariance_matrix(returns.values())?;
        let w = self.weights.values();
        Ok(w.dot(&cov.dot(w)))
    }
}

/// One point of an efficient frontier.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierPoint {
    /// Required mean return.
    pub target: f64,
    /// Minimum-risk allocation at the target.
    pub allocation: Allocation,
    /// Optimal risk (program objective) at the target.
    pub risk: f64,
    /// Mean return of the reported, rounded weights.
    pub realized_return: f64,
}

/// Portfolio optimizer over any [`ConvexSolver`] backend.
#[derive(Debug, Clone)]
pub struct PortfolioOptimizer<S = ClarabelSolver> {
    solver: S,
    post_process: WeightPostProcessor,
}

impl PortfolioOptimizer<ClarabelSolver> {
    /// Create an optimizer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    /// Create an optimizer with custom configuration.
    #[must_use]
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self::with_solver(ClarabelSolver::with_config(config.solver), config.post_process)
    }
}

impl Default for PortfolioOptimizer<ClarabelSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConvexSolver> PortfolioOptimizer<S> {
    /// Create an optimizer over a specific solver backend.
    #[must_use]
    pub const fn with_solver(solver: S, post_process: PostProcessConfig) -> Self {
        Self { solver, post_process: WeightPostProcessor::with_config(post_process) }
    }

    /// Get the solver backend.
    #[must_use]
    pub const fn solver(&self) -> &S {
        &self.solver
    }

    /// Solve `spec` over `returns`.
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientData` with fewer than two periods,
    /// `ModelError::InvalidConfig` for invalid model parameters,
    /// `ModelError::SolverFailure` if no optimal point is found, and
    /// `ModelError::DegenerateNormalization` if tangency weights sum to zero.
    #[instrument(level = "debug", skip(self, returns), fields(solver = self.solver.name()))]
    pub fn optimize(
        &self,
        returns: &ReturnSeries,
        spec: &ModelSpec,
    ) -> Result<Allocation, ModelError> {
        let builder = ProgramBuilder::new(returns)?;
        self.optimize_with(&builder, spec)
    }

    /// Solve several models over the same returns in parallel.
    ///
    /// Results are returned in the order of `specs`.
    pub fn optimize_many(
        &self,
        returns: &ReturnSeries,
        specs: &[ModelSpec],
    ) -> Vec<Result<Allocation, ModelError>> {
        specs.par_iter().map(|spec| self.optimize(returns, spec)).collect()
    }

    /// Trace the efficient frontier of `risk` at `points` target returns
    /// spaced evenly strictly between the smallest and largest asset mean.
    ///
    /// Each point is solved independently; an infeasible target is reported in
    /// place without aborting the others.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if `points` is zero or every asset
    /// has the same mean return, and any error from computing mean returns.
    pub fn efficient_frontier(
        &self,
        returns: &ReturnSeries,
        risk: RiskMeasure,
        points: usize,
    ) -> Result<Vec<Result<FrontierPoint, ModelError>>, ModelError> {
        if points == 0 {
            return Err(ModelError::InvalidConfig("frontier needs at least one point".to_string()));
        }
        let builder = ProgramBuilder::new(returns)?;
        let mu = builder.mean_returns();
        let lowest = mu.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if highest <= lowest {
            return Err(ModelError::InvalidConfig(
                "frontier needs assets with different mean returns".to_string(),
            ));
        }

        let step = (highest - lowest) / (points + 1) as f64;
        debug!(points, lowest, highest, %risk, "tracing efficient frontier");

        Ok((1..=points)
            .into_par_iter()
            .map(|k| {
                let target = lowest + step * k as f64;
                let spec = ModelSpec::new(risk, Objective::TargetReturn { target });
                let allocation = self.optimize_with(&builder, &spec)?;
                let realized_return = allocation.expected_return(mu);
                Ok(FrontierPoint {
                    target,
                    risk: allocation.objective,
                    realized_return,
                    allocation,
                })
            })
            .collect())
    }

    fn optimize_with(
        &self,
        builder: &ProgramBuilder<'_>,
        spec: &ModelSpec,
    ) -> Result<Allocation, ModelError> {
        let program = builder.build(spec)?;
        let solution = self.solver.solve(&program)?;
        let raw_weights = solution.weights(program.n_weights());
        let weights = self.post_process.process(&raw_weights, spec)?;
        debug!(
            %spec,
            status = %solution.status,
            objective = solution.objective,
            "allocation ready"
        );

        Ok(Allocation {
            spec: *spec,
            weights: WeightVector::for_series(builder.returns(), weights)?,
            raw_weights,
            objective: solution.objective,
            status: solution.status,
            iterations: solution.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use portopt_primitives::{ConvexProgram, Solution};
    use portopt_traits::SolverError;

    use super::*;

    /// Returns the same solution for every program.
    #[derive(Debug, Clone, Default)]
    struct FixedSolver {
        x: Vec<f64>,
    }

    impl ConvexSolver for FixedSolver {
        type Config = Vec<f64>;

        fn with_config(config: Self::Config) -> Self {
            Self { x: config }
        }

        fn solve(&self, program: &ConvexProgram) -> Result<Solution, SolverError> {
            let mut x = Array1::zeros(program.n_variables());
            for (i, v) in self.x.iter().enumerate() {
                x[i] = *v;
            }
            Ok(Solution {
                status: SolveStatus::Solved,
                objective: program.objective_at(&x.view()),
                x,
                iterations: 1,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn series() -> ReturnSeries {
        ReturnSeries::new(
            ["A", "B"],
            array![[0.02, -0.01], [-0.01, 0.03], [0.03, 0.00], [0.00, 0.02]],
        )
        .unwrap()
    }

    #[test]
    fn optimize_with_custom_solver() {
        let optimizer = PortfolioOptimizer::with_solver(
            FixedSolver::with_config(vec![0.123_456_7, 0.876_543_3]),
            PostProcessConfig::default(),
        );
        let allocation = optimizer.optimize(&series(), &ModelSpec::markowitz()).unwrap();

        assert_eq!(allocation.weights.values(), &array![0.123_457, 0.876_543]);
        assert_eq!(allocation.raw_weights, array![0.123_456_7, 0.876_543_3]);
        assert_eq!(allocation.weights.symbols()[1].as_str(), "B");
        assert_eq!(optimizer.solver().name(), "fixed");
    }

    #[test]
    fn tangency_weights_are_normalized() {
        let optimizer = PortfolioOptimizer::with_solver(
            FixedSolver::with_config(vec![30.0, 70.0]),
            PostProcessConfig::default(),
        );
        let allocation = optimizer.optimize(&series(), &ModelSpec::sharpe()).unwrap();
        assert_relative_eq!(allocation.weights.values()[0], 0.3);
        assert_relative_eq!(allocation.weights.values()[1], 0.7);
    }

    #[test]
    fn optimize_many_preserves_order() {
        let optimizer = PortfolioOptimizer::with_solver(
            FixedSolver::with_config(vec![0.5, 0.5]),
            PostProcessConfig::default(),
        );
        let specs = [ModelSpec::markowitz(), ModelSpec::cvar(1.5), ModelSpec::omega(0.0)];
        let results = optimizer.optimize_many(&series(), &specs);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ModelError::InvalidConfig(_))));
        assert_eq!(results[2].as_ref().unwrap().spec, specs[2]);
    }

    #[test]
    fn frontier_rejects_flat_means() {
        let returns =
            ReturnSeries::new(["A", "B"], array![[0.01, 0.02], [0.02, 0.01], [0.0, 0.0]]).unwrap();
        let optimizer = PortfolioOptimizer::new();
        assert!(matches!(
            optimizer.efficient_frontier(&returns, RiskMeasure::Variance, 5),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(matches!(
            optimizer.efficient_frontier(&series(), RiskMeasure::Variance, 0),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn portfolio_variance_matches_quadratic_form() {
        let optimizer = PortfolioOptimizer::with_solver(
            FixedSolver::with_config(vec![0.5, 0.5]),
            PostProcessConfig::default(),
        );
        let returns = series();
        let allocation = optimizer.optimize(&returns, &ModelSpec::markowitz()).unwrap();
        let portfolio = returns.values().dot(&array![0.5, 0.5]);
        let expected = portopt_math::sample_variance(portfolio.view()).unwrap();
        assert_relative_eq!(
            allocation.portfolio_variance(&returns).unwrap(),
            expected,
            epsilon = 1e-15
        );
    }
}
