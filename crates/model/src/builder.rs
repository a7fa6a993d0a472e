//! Translation of a risk measure and objective into a convex program.
//!
//! Variable layout, with `n` assets and `T` periods:
//!
//! | Risk measure   | Variables                               |
//! |----------------|-----------------------------------------|
//! | Variance       | `w[0..n]`                               |
//! | Semi-variance  | `w[0..n]`                               |
//! | Omega          | `w[0..n]`, capped returns `u[0..T]`     |
//! | CVaR           | `w[0..n]`, VaR `v`, tail slacks `s[0..T]` |

use ndarray::{Array1, Array2};
use portopt_math::{covariance_matrix, mean_vector, semi_covariance_matrix};
use portopt_primitives::{ConvexProgram, ModelSpec, Objective, ReturnSeries, RiskMeasure};

use crate::ModelError;

/// Builds convex programs for one return series.
///
/// Mean returns are computed once and shared by every program built from the
/// same builder.
#[derive(Debug, Clone)]
pub struct ProgramBuilder<'a> {
    returns: &'a ReturnSeries,
    mean_returns: Array1<f64>,
}

impl<'a> ProgramBuilder<'a> {
    /// Create a builder over `returns`.
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientData` with fewer than two periods and
    /// `ModelError::Math` if any return is non-finite.
    pub fn new(returns: &'a ReturnSeries) -> Result<Self, ModelError> {
        let mean_returns = mean_vector(returns.values())?;
        Ok(Self { returns, mean_returns })
    }

    /// Per-asset mean returns `μ`.
    #[must_use]
    pub const fn mean_returns(&self) -> &Array1<f64> {
        &self.mean_returns
    }

    /// The underlying return series.
    #[must_use]
    pub const fn returns(&self) -> &'a ReturnSeries {
        self.returns
    }

    /// Build the program for `spec`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` for a non-finite threshold or
    /// target, or a CVaR confidence outside `(0, 1)`.
    pub fn build(&self, spec: &ModelSpec) -> Result<ConvexProgram, ModelError> {
        validate_spec(spec)?;

        let mut program = match spec.risk {
            RiskMeasure::Variance => {
                self.quadratic_program(covariance_matrix(self.returns.values())?)
            }
            RiskMeasure::SemiVariance { threshold } => {
                self.quadratic_program(semi_covariance_matrix(self.returns.values(), threshold)?)
            }
            RiskMeasure::Omega { threshold } => self.omega_program(threshold),
            RiskMeasure::Cvar { confidence } => self.cvar_program(confidence),
        };
        self.add_objective_constraints(&mut program, spec.objective);

        Ok(program)
    }

    fn quadratic_program(&self, sigma: Array2<f64>) -> ConvexProgram {
        let mut program = ConvexProgram::new(self.returns.n_assets(), 0);
        program.set_quadratic_form(&sigma);
        program
    }

    /// Maximize `Σ_t min(R_t·w, h)` via capped-return variables
    /// `u_t ≤ R_t·w`, `u_t ≤ h`.
    fn omega_program(&self, threshold: f64) -> ConvexProgram {
        let n = self.returns.n_assets();
        let values = self.returns.values();
        let mut program = ConvexProgram::new(n, values.nrows());

        for (t, row) in values.rows().into_iter().enumerate() {
            let u = n + t;
            program.set_linear(u, -1.0);
            let negated_return = row.iter().enumerate().map(|(i, &r)| (i, -r));
            program.add_inequality(negated_return.chain([(u, 1.0)]), 0.0);
            program.add_inequality([(u, 1.0)], threshold);
        }
        program
    }

    /// Rockafellar-Uryasev linearization with tail weight `1 / (1 - β)`,
    /// `β = 1 - confidence`.
    fn cvar_program(&self, confidence: f64) -> ConvexProgram {
        let n = self.returns.n_assets();
        let values = self.returns.values();
        let periods = values.nrows();
        let var_index = n;
        let beta = 1.0 - confidence;
        let tail_weight = 1.0 / ((1.0 - beta) * periods as f64);

        let mut program = ConvexProgram::new(n, 1 + periods);
        program.set_linear(var_index, 1.0);

        for (t, row) in values.rows().into_iter().enumerate() {
            let slack = var_index + 1 + t;
            program.set_linear(slack, tail_weight);
            program.add_inequality([(slack, -1.0)], 0.0);
            // Loss beyond VaR: -R_t·w - v - s_t ≤ 0
            let loss = row.iter().enumerate().map(|(i, &r)| (i, -r));
            program.add_inequality(loss.chain([(var_index, -1.0), (slack, -1.0)]), 0.0);
        }
        program
    }

    fn add_objective_constraints(&self, program: &mut ConvexProgram, objective: Objective) {
        let n = self.returns.n_assets();
        let expected_return = || self.mean_returns.iter().copied().enumerate();

        for i in 0..n {
            program.add_inequality([(i, -1.0)], 0.0);
        }

        match objective {
            Objective::MinimumRisk => {
                program.add_equality((0..n).map(|i| (i, 1.0)), 1.0);
            }
            // The sample mean of R·w equals μ·w, so one row serves every risk measure.
            Objective::TargetReturn { target } => {
                program.add_equality((0..n).map(|i| (i, 1.0)), 1.0);
                program.add_equality(expected_return(), target);
            }
            Objective::Tangency => {
                program.add_equality(expected_return(), 1.0);
            }
        }
    }
}

fn validate_spec(spec: &ModelSpec) -> Result<(), ModelError> {
    match spec.risk {
        RiskMeasure::Variance => {}
        RiskMeasure::SemiVariance { threshold } | RiskMeasure::Omega { threshold } => {
            if !threshold.is_finite() {
                return Err(ModelError::InvalidConfig(format!(
                    "threshold must be finite, got {threshold}"
                )));
            }
        }
        RiskMeasure::Cvar { confidence } => {
            if confidence.is_nan() || confidence <= 0.0 || confidence >= 1.0 {
                return Err(ModelError::InvalidConfig(format!(
                    "CVaR confidence must lie in (0, 1), got {confidence}"
                )));
            }
        }
    }
    if let Objective::TargetReturn { target } = spec.objective
        && !target.is_finite()
    {
        return Err(ModelError::InvalidConfig(format!(
            "target return must be finite, got {target}"
        )));
    }
    Ok(())
}
