use crate::StrError;
use thiserror::Error;

/// Defines the failures of the iterative linear solver
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LinearSolverError {
    /// The residual did not reach the tolerance within the maximum number of iterations
    #[error("linear solver did not converge after {iterations} iterations (residual = {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    /// A division by zero (or a non-positive curvature in CG) happened
    #[error("linear solver breakdown: {0}")]
    Breakdown(&'static str),

    /// The system could not be set up (e.g., incompatible dimensions)
    #[error("linear solver failed: {0}")]
    Setup(&'static str),
}

/// Defines the failures of a time step
///
/// The nonlinear and linear stages are reported separately. Configuration and assembly
/// errors carry the message of the failing operation.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum StepError {
    /// Configuration or assembly error
    #[error("{0}")]
    Config(StrError),

    /// Newton-Raphson did not converge
    #[error("Newton-Raphson did not converge after {iterations} iterations (norm(R) = {norm:e})")]
    NewtonDiverged { iterations: usize, norm: f64 },

    /// The trial state could not be evaluated (e.g., an inverted element)
    ///
    /// Raised by the residual or the Jacobian within the iterations; a smaller step may succeed.
    #[error("invalid trial state at Newton iteration {iteration}: {message}")]
    InvalidTrial { iteration: usize, message: StrError },

    /// The linear solver failed within a Newton iteration
    #[error("linear solver failed at Newton iteration {iteration}")]
    LinearSolver {
        iteration: usize,
        #[source]
        source: LinearSolverError,
    },
}

impl From<StrError> for StepError {
    fn from(message: StrError) -> Self {
        StepError::Config(message)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
