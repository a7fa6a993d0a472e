//! Convex solver trait definitions.

use portopt_primitives::{ConvexProgram, SolveStatus, Solution};

/// Errors that can occur while solving a convex program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// Solver terminated without an acceptable optimum.
    #[error("solver terminated with status {status} after {iterations} iterations")]
    Status {
        /// Terminal status.
        status: SolveStatus,
        /// Iterations used.
        iterations: u32,
    },

    /// Solver rejected the program data or settings.
    #[error("solver setup failed: {0}")]
    Setup(String),

    /// Program has no decision variables.
    #[error("program has no decision variables")]
    EmptyProgram,
}

impl SolverError {
    /// Terminal status, when the solver ran to termination.
    #[must_use]
    pub const fn status(&self) -> Option<SolveStatus> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the program itself is infeasible or unbounded, as
    /// opposed to a numerical or resource failure.
    #[must_use]
    pub const fn is_model_failure(&self) -> bool {
        matches!(
            self,
            Self::Status { status: SolveStatus::Infeasible | SolveStatus::Unbounded, .. }
        )
    }
}

/// Trait for engines that solve a `ConvexProgram`.
///
/// Implementations return `Ok` only for an optimal terminal status; any
/// other outcome is a `SolverError`, never a default solution vector.
pub trait ConvexSolver: Send + Sync {
    /// Configuration type for this solver.
    type Config: Default + Clone + Send + Sync;

    /// Create a new solver with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Solve a program.
    ///
    /// # Errors
    /// Returns `SolverError` if the program is rejected or the solver ends
    /// without an acceptable optimum.
    fn solve(&self, program: &ConvexProgram) -> Result<Solution, SolverError>;

    /// Returns the name of this solver.
    fn name(&self) -> &str;
}
