use super::{KrylovSolver, NonlinearOperator, StepError};
use crate::base::{Config, NonlinearSolverParams};
use crate::StrError;
use russell_lab::{vec_norm, vec_update, Norm, Vector};

/// Implements the Newton-Raphson method with an iterative linear solver
///
/// The iterations stop when `‖R‖₂ ≤ max(rel_tol · ‖R₀‖₂, abs_tol)`. The initial guess is
/// taken from the input vector (warm start).
pub struct NewtonSolver {
    /// Parameters
    params: NonlinearSolverParams,

    /// Linear solver
    linear: KrylovSolver,

    /// Shows the iterations
    verbose: bool,

    /// Number of iterations of the last solve
    last_iterations: usize,

    /// Residual norm at the end of the last solve
    last_norm: f64,
}

impl NewtonSolver {
    /// Allocates a new instance
    pub fn new(config: &Config) -> Result<Self, StrError> {
        config.validate()?;
        Ok(NewtonSolver {
            params: config.nonlinear,
            linear: KrylovSolver::new(config.linear, config.verbose_linear)?,
            verbose: config.verbose_iterations,
            last_iterations: 0,
            last_norm: 0.0,
        })
    }

    /// Returns the number of iterations of the last solve
    pub fn last_iterations(&self) -> usize {
        self.last_iterations
    }

    /// Returns the residual norm at the end of the last solve
    pub fn last_norm(&self) -> f64 {
        self.last_norm
    }

    /// Solves R(x) = 0, updating x in place
    ///
    /// Returns the number of iterations (corrections) performed.
    pub fn solve(&mut self, op: &mut dyn NonlinearOperator, x: &mut Vector) -> Result<usize, StepError> {
        let neq = op.size();
        if x.dim() != neq {
            return Err(StepError::Config("the dimension of the initial guess is incorrect"));
        }
        let mut rr = Vector::new(neq);
        let mut cc = Vector::new(neq);
        op.residual(&mut rr, x)
            .map_err(|message| StepError::InvalidTrial { iteration: 0, message })?;
        let norm_rr0 = vec_norm(&rr, Norm::Euc);
        let goal = f64::max(self.params.rel_tol * norm_rr0, self.params.abs_tol);
        let mut norm_rr = norm_rr0;
        let mut norm_cc = f64::NAN;
        let mut it = 0;
        self.last_iterations = 0;
        loop {
            self.last_norm = norm_rr;
            if !norm_rr.is_finite() {
                self.print_iteration(it, norm_rr, norm_cc, goal, "😱");
                return Err(StepError::NewtonDiverged { iterations: it, norm: norm_rr });
            }
            if norm_rr <= goal {
                self.print_iteration(it, norm_rr, norm_cc, goal, "✅");
                break;
            }
            if it >= self.params.max_iter {
                self.print_iteration(it, norm_rr, norm_cc, goal, "🥵");
                return Err(StepError::NewtonDiverged { iterations: it, norm: norm_rr });
            }
            self.print_iteration(it, norm_rr, norm_cc, goal, "");

            // solve J c = R and update x ← x - c
            let jj = op
                .jacobian(x)
                .map_err(|message| StepError::InvalidTrial { iteration: it, message })?;
            self.linear
                .solve(&mut cc, jj, &rr)
                .map_err(|source| StepError::LinearSolver { iteration: it, source })?;
            vec_update(x, -1.0, &cc).map_err(StepError::Config)?;
            norm_cc = vec_norm(&cc, Norm::Euc);
            it += 1;
            self.last_iterations = it;

            op.residual(&mut rr, x)
                .map_err(|message| StepError::InvalidTrial { iteration: it, message })?;
            norm_rr = vec_norm(&rr, Norm::Euc);
        }
        Ok(it)
    }

    #[inline]
    #[rustfmt::skip]
    fn print_iteration(&self, it: usize, norm_rr: f64, norm_cc: f64, goal: f64, icon: &str) {
        if self.verbose {
            if it == 0 {
                println!(
                    "{:>8} {:>13} {:>13} {:>5} {:>9.2e} {:>9} {:>9.2e} {}",
                    "·", "·", "·", it, norm_rr, "·", goal, icon
                );
            } else {
                println!(
                    "{:>8} {:>13} {:>13} {:>5} {:>9.2e} {:>9.2e} {:>9.2e} {}",
                    "·", "·", "·", it, norm_rr, norm_cc, goal, icon
                );
            }
        }
    }

    /// Prints the header of the iterations table
    pub fn print_header(&self) {
        if self.verbose {
            println!(
                "{:>8} {:>13} {:>13} {:>5} {:>9} {:>9} {:>9}",
                "timestep", "t", "Δt", "iter", "‖R‖", "‖ΔU‖", "goal"
            );
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
