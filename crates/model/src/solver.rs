//! Interior-point backend for [`ConvexProgram`]s.

use std::time::Duration;

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use ndarray::Array1;
use portopt_primitives::{ConvexProgram, SolveStatus, Solution};
use portopt_traits::{ConvexSolver, SolverError};
use tracing::{debug, warn};

/// Configuration for the interior-point solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum interior-point iterations.
    pub max_iter: u32,
    /// Absolute duality gap tolerance.
    pub tol_gap_abs: f64,
    /// Relative duality gap tolerance.
    pub tol_gap_rel: f64,
    /// Primal/dual feasibility tolerance.
    pub tol_feas: f64,
    /// Wall-clock limit per solve (None for unlimited).
    pub time_limit: Option<Duration>,
    /// Print solver progress to stdout.
    pub verbose: bool,
    /// Treat reduced-accuracy solutions as optimal.
    pub accept_almost_solved: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
            tol_feas: 1e-8,
            time_limit: None,
            verbose: false,
            accept_almost_solved: false,
        }
    }
}

/// [`ConvexSolver`] backed by the Clarabel interior-point method.
#[derive(Debug, Clone, Default)]
pub struct ClarabelSolver {
    config: SolverConfig,
}

impl ClarabelSolver {
    /// Create a solver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn accepts(&self, status: SolveStatus) -> bool {
        status.is_optimal()
            || (status == SolveStatus::AlmostSolved && self.config.accept_almost_solved)
    }
}

impl ConvexSolver for ClarabelSolver {
    type Config = SolverConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn solve(&self, program: &ConvexProgram) -> Result<Solution, SolverError> {
        let n = program.n_variables();
        if n == 0 {
            return Err(SolverError::EmptyProgram);
        }

        let p = match program.quadratic() {
            // Clarabel reads the upper triangle of P only.
            Some(quadratic) => {
                dense_to_csc(n, n, |i, j| if i <= j { quadratic[[i, j]] } else { 0.0 })
            }
            None => CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new()),
        };
        let q = program.linear().to_vec();

        // Rows: equalities (zero cone) then inequalities (nonnegative slack cone).
        let rows: Vec<_> = program.equalities().iter().chain(program.inequalities()).collect();
        let a = dense_to_csc(rows.len(), n, |i, j| rows[i].coefficients[j]);
        let b: Vec<f64> = rows.iter().map(|row| row.rhs).collect();

        let mut cones = Vec::with_capacity(2);
        if !program.equalities().is_empty() {
            cones.push(SupportedConeT::ZeroConeT(program.equalities().len()));
        }
        if !program.inequalities().is_empty() {
            cones.push(SupportedConeT::NonnegativeConeT(program.inequalities().len()));
        }

        let mut builder = DefaultSettingsBuilder::default();
        builder
            .max_iter(self.config.max_iter)
            .verbose(self.config.verbose)
            .tol_gap_abs(self.config.tol_gap_abs)
            .tol_gap_rel(self.config.tol_gap_rel)
            .tol_feas(self.config.tol_feas);
        if let Some(limit) = self.config.time_limit {
            builder.time_limit(limit.as_secs_f64());
        }
        let settings = builder
            .build()
            .map_err(|e| SolverError::Setup(format!("failed to build settings: {e}")))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings)
            .map_err(|e| SolverError::Setup(format!("failed to create solver: {e:?}")))?;
        solver.solve();

        let status = map_status(&solver.solution.status);
        let iterations = solver.solution.iterations;
        debug!(
            variables = n,
            constraints = rows.len(),
            %status,
            iterations,
            objective = solver.solution.obj_val,
            "convex program solved"
        );

        if !self.accepts(status) {
            warn!(%status, iterations, "solver did not reach an optimal point");
            return Err(SolverError::Status { status, iterations });
        }

        let x = Array1::from(solver.solution.x.clone());
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Status { status: SolveStatus::NumericalError, iterations });
        }

        Ok(Solution { status, x, objective: solver.solution.obj_val, iterations })
    }

    fn name(&self) -> &str {
        "clarabel"
    }
}

fn map_status(status: &SolverStatus) -> SolveStatus {
    match status {
        SolverStatus::Solved => SolveStatus::Solved,
        SolverStatus::AlmostSolved => SolveStatus::AlmostSolved,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            SolveStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => SolveStatus::Unbounded,
        SolverStatus::MaxIterations | SolverStatus::MaxTime => SolveStatus::LimitReached,
        _ => SolveStatus::NumericalError,
    }
}

/// Compressed sparse column form of an `m x n` matrix given entry-wise,
/// dropping exact zeros.
fn dense_to_csc(m: usize, n: usize, entry: impl Fn(usize, usize) -> f64) -> CscMatrix<f64> {
    let mut colptr = Vec::with_capacity(n + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    colptr.push(0);
    for j in 0..n {
        for i in 0..m {
            let value = entry(i, j);
            if value != 0.0 {
                rowval.push(i);
                nzval.push(value);
            }
        }
        colptr.push(nzval.len());
    }

    CscMatrix::new(m, n, colptr, rowval, nzval)
}
