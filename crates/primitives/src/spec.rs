//! Model selection types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Risk functional minimized by a portfolio program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskMeasure {
    /// Sample variance `wᵀΣw` (Markowitz).
    Variance,
    /// Semi-variance below `threshold` (Sortino).
    SemiVariance {
        /// Downside threshold `h`.
        threshold: f64,
    },
    /// Negated sum of returns capped at `threshold` (Omega).
    Omega {
        /// Gain/loss threshold `h`.
        threshold: f64,
    },
    /// Conditional value-at-risk at `confidence` (e.g. 0.95).
    Cvar {
        /// Confidence level α.
        confidence: f64,
    },
}

impl RiskMeasure {
    /// Whether this measure is minimized as a quadratic form.
    #[must_use]
    pub const fn is_quadratic(&self) -> bool {
        matches!(self, Self::Variance | Self::SemiVariance { .. })
    }
}

impl fmt::Display for RiskMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variance => write!(f, "variance"),
            Self::SemiVariance { threshold } => write!(f, "semi-variance(h={threshold})"),
            Self::Omega { threshold } => write!(f, "omega(h={threshold})"),
            Self::Cvar { confidence } => write!(f, "cvar(alpha={confidence})"),
        }
    }
}

/// Constraint set appended to the risk objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Fully invested, long-only, minimum risk.
    MinimumRisk,
    /// Minimum risk at a fixed expected return (efficient frontier point).
    TargetReturn {
        /// Required mean portfolio return.
        target: f64,
    },
    /// Maximum return-to-risk portfolio via the scale-invariant relaxation.
    Tangency,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinimumRisk => write!(f, "minimum-risk"),
            Self::TargetReturn { target } => write!(f, "target-return({target})"),
            Self::Tangency => write!(f, "tangency"),
        }
    }
}

/// A fully specified portfolio program: risk measure plus objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Risk functional.
    pub risk: RiskMeasure,
    /// Constraint set.
    pub objective: Objective,
}

impl ModelSpec {
    /// Create a model specification.
    #[must_use]
    pub const fn new(risk: RiskMeasure, objective: Objective) -> Self {
        Self { risk, objective }
    }

    /// Markowitz global minimum-variance portfolio.
    #[must_use]
    pub const fn markowitz() -> Self {
        Self::new(RiskMeasure::Variance, Objective::MinimumRisk)
    }

    /// Markowitz minimum variance at a target return.
    #[must_use]
    pub const fn markowitz_frontier(target: f64) -> Self {
        Self::new(RiskMeasure::Variance, Objective::TargetReturn { target })
    }

    /// Sharpe tangency portfolio.
    #[must_use]
    pub const fn sharpe() -> Self {
        Self::new(RiskMeasure::Variance, Objective::Tangency)
    }

    /// Sortino minimum semi-variance portfolio.
    #[must_use]
    pub const fn sortino(threshold: f64) -> Self {
        Self::new(RiskMeasure::SemiVariance { threshold }, Objective::MinimumRisk)
    }

    /// Sortino minimum semi-variance at a target return.
    #[must_use]
    pub const fn sortino_frontier(target: f64, threshold: f64) -> Self {
        Self::new(RiskMeasure::SemiVariance { threshold }, Objective::TargetReturn { target })
    }

    /// Sortino tangency portfolio.
    #[must_use]
    pub const fn sortino_tangency(threshold: f64) -> Self {
        Self::new(RiskMeasure::SemiVariance { threshold }, Objective::Tangency)
    }

    /// Omega minimum-risk portfolio.
    #[must_use]
    pub const fn omega(threshold: f64) -> Self {
        Self::new(RiskMeasure::Omega { threshold }, Objective::MinimumRisk)
    }

    /// Omega portfolio at a target return.
    #[must_use]
    pub const fn omega_frontier(target: f64, threshold: f64) -> Self {
        Self::new(RiskMeasure::Omega { threshold }, Objective::TargetReturn { target })
    }

    /// Omega tangency portfolio.
    #[must_use]
    pub const fn omega_tangency(threshold: f64) -> Self {
        Self::new(RiskMeasure::Omega { threshold }, Objective::Tangency)
    }

    /// Minimum-CVaR portfolio.
    #[must_use]
    pub const fn cvar(confidence: f64) -> Self {
        Self::new(RiskMeasure::Cvar { confidence }, Objective::MinimumRisk)
    }

    /// Minimum CVaR at a target return.
    #[must_use]
    pub const fn cvar_frontier(target: f64, confidence: f64) -> Self {
        Self::new(RiskMeasure::Cvar { confidence }, Objective::TargetReturn { target })
    }

    /// Mean-CVaR tangency portfolio.
    #[must_use]
    pub const fn cvar_tangency(confidence: f64) -> Self {
        Self::new(RiskMeasure::Cvar { confidence }, Objective::Tangency)
    }

    /// Whether the solved weights must be renormalized to unit sum.
    #[must_use]
    pub const fn needs_normalization(&self) -> bool {
        matches!(self.objective, Objective::Tangency)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.risk, self.objective)
    }
}
