use serde::{Deserialize, Serialize};

/// Defines the time-stepping method
///
/// The method is fixed when the solver setup is completed and never changes afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum TimestepMethod {
    /// Inertia-free equilibrium solve at every step
    QuasiStatic,

    /// Implicit backward Euler (first order, L-stable)
    BackwardEuler,

    /// Singly diagonal implicit Runge-Kutta with three stages (third order, L-stable)
    Sdirk33,
}

/// Defines the Krylov method used to solve the linearized system
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum KrylovMethod {
    /// Preconditioned conjugate gradients (requires a symmetric positive-definite Jacobian)
    Cg,

    /// Preconditioned minimum residual method (requires a symmetric Jacobian)
    Minres,
}

/// Defines the preconditioner of the Krylov method
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Preconditioner {
    /// No preconditioner
    Identity,

    /// Inverse of the diagonal
    Jacobi,

    /// Inverse of the l1-norm of each row
    L1Jacobi,
}

impl TimestepMethod {
    /// Returns true if the method integrates inertia and viscosity in time
    pub fn is_dynamic(&self) -> bool {
        match self {
            TimestepMethod::QuasiStatic => false,
            TimestepMethod::BackwardEuler => true,
            TimestepMethod::Sdirk33 => true,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
