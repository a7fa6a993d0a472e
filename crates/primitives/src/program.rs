//! Solver-agnostic convex program representation.
//!
//! A program minimizes `½ xᵀ P x + qᵀ x` subject to linear equality rows
//! `a·x = b` and inequality rows `a·x ≤ b`. The first `n_weights` variables
//! are portfolio weights; any remaining variables are auxiliaries (VaR,
//! slacks, capped returns).

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, s};

/// One linear constraint row `coefficients · x (= | ≤) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Dense coefficient row, one entry per variable.
    pub coefficients: Array1<f64>,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Create a constraint row.
    #[must_use]
    pub const fn new(coefficients: Array1<f64>, rhs: f64) -> Self {
        Self { coefficients, rhs }
    }

    /// Evaluate `coefficients · x - rhs`.
    #[must_use]
    pub fn residual(&self, x: &ArrayView1<'_, f64>) -> f64 {
        self.coefficients.dot(x) - self.rhs
    }
}

/// A convex quadratic or linear program over portfolio weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexProgram {
    n_weights: usize,
    quadratic: Option<Array2<f64>>,
    linear: Array1<f64>,
    equalities: Vec<LinearConstraint>,
    inequalities: Vec<LinearConstraint>,
}

impl ConvexProgram {
    /// Create an empty program with `n_weights` weight variables followed by
    /// `n_auxiliary` auxiliary variables and a zero objective.
    #[must_use]
    pub fn new(n_weights: usize, n_auxiliary: usize) -> Self {
        Self {
            n_weights,
            quadratic: None,
            linear: Array1::zeros(n_weights + n_auxiliary),
            equalities: Vec::new(),
            inequalities: Vec::new(),
        }
    }

    /// Total number of decision variables.
    #[must_use]
    pub fn n_variables(&self) -> usize {
        self.linear.len()
    }

    /// Number of leading weight variables.
    #[must_use]
    pub const fn n_weights(&self) -> usize {
        self.n_weights
    }

    /// Quadratic objective matrix `P`, if any.
    #[must_use]
    pub const fn quadratic(&self) -> Option<&Array2<f64>> {
        self.quadratic.as_ref()
    }

    /// Linear objective term `q`.
    #[must_use]
    pub const fn linear(&self) -> &Array1<f64> {
        &self.linear
    }

    /// Equality rows.
    #[must_use]
    pub fn equalities(&self) -> &[LinearConstraint] {
        &self.equalities
    }

    /// Inequality (`≤`) rows.
    #[must_use]
    pub fn inequalities(&self) -> &[LinearConstraint] {
        &self.inequalities
    }

    /// Set `P` so that the objective contains `wᵀ Σ w` on the weight block.
    ///
    /// `sigma` must be `n_weights x n_weights`; it is embedded as `2Σ` into
    /// the full variable space so that `½ xᵀ P x = wᵀ Σ w`.
    ///
    /// # Panics
    /// Panics if `sigma` is not `n_weights x n_weights`.
    pub fn set_quadratic_form(&mut self, sigma: &Array2<f64>) {
        let n = self.n_weights;
        assert_eq!(sigma.dim(), (n, n), "quadratic form must cover the weight block");
        let total = self.n_variables();
        let mut p = Array2::zeros((total, total));
        p.slice_mut(s![..n, ..n]).assign(&(sigma * 2.0));
        self.quadratic = Some(p);
    }

    /// Set the linear objective coefficient of variable `index`.
    pub fn set_linear(&mut self, index: usize, value: f64) {
        self.linear[index] = value;
    }

    /// Append an equality row built from a sparse `(index, coefficient)` list.
    pub fn add_equality(&mut self, terms: impl IntoIterator<Item = (usize, f64)>, rhs: f64) {
        let row = self.dense_row(terms);
        self.equalities.push(LinearConstraint::new(row, rhs));
    }

    /// Append an inequality row `Σ coeff·x ≤ rhs`.
    pub fn add_inequality(&mut self, terms: impl IntoIterator<Item = (usize, f64)>, rhs: f64) {
        let row = self.dense_row(terms);
        self.inequalities.push(LinearConstraint::new(row, rhs));
    }

    /// Objective value `½ xᵀ P x + qᵀ x` at `x`.
    #[must_use]
    pub fn objective_at(&self, x: &ArrayView1<'_, f64>) -> f64 {
        let linear = self.linear.dot(x);
        self.quadratic.as_ref().map_or(linear, |p| 0.5 * x.dot(&p.dot(x)) + linear)
    }

    /// Largest constraint violation at `x`.
    #[must_use]
    pub fn max_violation(&self, x: &ArrayView1<'_, f64>) -> f64 {
        let eq = self.equalities.iter().map(|c| c.residual(x).abs());
        let ineq = self.inequalities.iter().map(|c| c.residual(x).max(0.0));
        eq.chain(ineq).fold(0.0, f64::max)
    }

    fn dense_row(&self, terms: impl IntoIterator<Item = (usize, f64)>) -> Array1<f64> {
        let mut row = Array1::zeros(self.n_variables());
        for (index, coeff) in terms {
            row[index] += coeff;
        }
        row
    }
}

/// Terminal status reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Optimal to requested tolerance.
    Solved,
    /// Optimal to reduced tolerance.
    AlmostSolved,
    /// Primal problem infeasible.
    Infeasible,
    /// Dual infeasible (objective unbounded below).
    Unbounded,
    /// Iteration or time limit reached.
    LimitReached,
    /// Numerical breakdown.
    NumericalError,
}

impl SolveStatus {
    /// Whether the status denotes an optimal point to full tolerance.
    #[must_use]
    pub const fn is_optimal(&self) -> bool {
        matches!(self, Self::Solved)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Solved => "solved",
            Self::AlmostSolved => "almost solved",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::LimitReached => "limit reached",
            Self::NumericalError => "numerical error",
        };
        f.write_str(label)
    }
}

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Terminal status.
    pub status: SolveStatus,
    /// Primal solution over all variables.
    pub x: Array1<f64>,
    /// Objective value `½ xᵀ P x + qᵀ x`.
    pub objective: f64,
    /// Iterations used.
    pub iterations: u32,
}

impl Solution {
    /// The weight block of the primal solution.
    #[must_use]
    pub fn weights(&self, n_weights: usize) -> Array1<f64> {
        self.x.slice(s![..n_weights]).to_owned()
    }
}
