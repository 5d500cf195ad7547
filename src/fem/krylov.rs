use super::LinearSolverError;
use crate::base::{KrylovMethod, LinearSolverParams, Preconditioner};
use crate::StrError;
use russell_lab::{vec_copy, vec_inner, vec_norm, vec_update, Norm, Vector};
use russell_sparse::CooMatrix;

/// Implements the diagonal preconditioners
///
/// The inverse of the diagonal is computed from the triplets of the matrix:
///
/// * Identity -- `dᵢ = 1`
/// * Jacobi -- `dᵢ = |Aᵢᵢ|`
/// * L1Jacobi -- `dᵢ = Σⱼ |Aᵢⱼ|`
pub struct DiagonalPreconditioner {
    /// Holds 1/dᵢ
    inv_diag: Vector,
}

impl DiagonalPreconditioner {
    /// Allocates a new instance
    pub fn new(kind: Preconditioner, aa: &CooMatrix) -> Result<Self, StrError> {
        let (nrow, ncol, nnz, _) = aa.get_info();
        if nrow != ncol {
            return Err("the matrix must be square");
        }
        let mut diag = Vector::new(nrow);
        let rows = aa.get_row_indices();
        let cols = aa.get_col_indices();
        let values = aa.get_values();
        match kind {
            Preconditioner::Identity => diag.fill(1.0),
            Preconditioner::Jacobi => {
                for k in 0..nnz {
                    if rows[k] == cols[k] {
                        diag[rows[k] as usize] += values[k];
                    }
                }
                for i in 0..nrow {
                    diag[i] = f64::abs(diag[i]);
                }
            }
            Preconditioner::L1Jacobi => {
                // off-diagonal duplicates are not merged (upper bound of the row l1 norm)
                for k in 0..nnz {
                    if rows[k] != cols[k] {
                        diag[rows[k] as usize] += f64::abs(values[k]);
                    }
                }
                let mut d = Vector::new(nrow);
                for k in 0..nnz {
                    if rows[k] == cols[k] {
                        d[rows[k] as usize] += values[k];
                    }
                }
                for i in 0..nrow {
                    diag[i] += f64::abs(d[i]);
                }
            }
        }
        let mut inv_diag = Vector::new(nrow);
        for i in 0..nrow {
            inv_diag[i] = if diag[i] > 0.0 { 1.0 / diag[i] } else { 1.0 };
        }
        Ok(DiagonalPreconditioner { inv_diag })
    }

    /// Computes z = D⁻¹ r
    pub fn apply(&self, z: &mut Vector, r: &Vector) {
        for i in 0..r.dim() {
            z[i] = self.inv_diag[i] * r[i];
        }
    }
}

/// Solves sparse linear systems with preconditioned Krylov methods
///
/// CG requires a symmetric positive definite matrix; MINRES requires a symmetric matrix.
/// Both require a symmetric positive definite preconditioner.
pub struct KrylovSolver {
    /// Parameters
    params: LinearSolverParams,

    /// Prints a summary after each solve
    verbose: bool,

    /// Number of iterations of the last solve
    last_iterations: usize,

    /// Residual norm of the last solve
    last_residual: f64,
}

impl KrylovSolver {
    /// Allocates a new instance
    pub fn new(params: LinearSolverParams, verbose: bool) -> Result<Self, StrError> {
        params.validate()?;
        Ok(KrylovSolver {
            params,
            verbose,
            last_iterations: 0,
            last_residual: 0.0,
        })
    }

    /// Returns the number of iterations of the last solve
    pub fn last_iterations(&self) -> usize {
        self.last_iterations
    }

    /// Returns the residual norm of the last solve
    ///
    /// For MINRES this is the preconditioned residual norm.
    pub fn last_residual(&self) -> f64 {
        self.last_residual
    }

    /// Solves A x = b starting from x = 0
    ///
    /// Returns the number of iterations.
    pub fn solve(&mut self, x: &mut Vector, aa: &CooMatrix, b: &Vector) -> Result<usize, LinearSolverError> {
        let (nrow, ncol, _, _) = aa.get_info();
        if nrow != ncol || b.dim() != nrow || x.dim() != nrow {
            return Err(LinearSolverError::Setup("incompatible dimensions"));
        }
        let prec =
            DiagonalPreconditioner::new(self.params.preconditioner, aa).map_err(LinearSolverError::Setup)?;
        x.fill(0.0);
        let res = match self.params.method {
            KrylovMethod::Cg => self.pcg(x, aa, b, &prec),
            KrylovMethod::Minres => self.minres(x, aa, b, &prec),
        };
        if self.verbose {
            println!(
                "{:>8} {:?} + {:?}: {} iterations, ‖r‖ = {:.2e}",
                "·", self.params.method, self.params.preconditioner, self.last_iterations, self.last_residual
            );
        }
        res
    }

    /// Runs the preconditioned conjugate gradient method
    fn pcg(
        &mut self,
        x: &mut Vector,
        aa: &CooMatrix,
        b: &Vector,
        prec: &DiagonalPreconditioner,
    ) -> Result<usize, LinearSolverError> {
        let n = b.dim();
        let norm_b = vec_norm(b, Norm::Euc);
        let goal = f64::max(self.params.rel_tol * norm_b, self.params.abs_tol);
        self.last_iterations = 0;
        self.last_residual = norm_b;
        if norm_b <= goal {
            return Ok(0);
        }
        let mut r = b.clone();
        let mut z = Vector::new(n);
        let mut ap = Vector::new(n);
        prec.apply(&mut z, &r);
        let mut p = z.clone();
        let mut rz = vec_inner(&r, &z);
        for it in 1..=self.params.max_iter {
            aa.mat_vec_mul(&mut ap, 1.0, &p).map_err(LinearSolverError::Setup)?;
            let pap = vec_inner(&p, &ap);
            if pap <= 0.0 {
                self.last_iterations = it;
                return Err(LinearSolverError::Breakdown("non-positive curvature in CG"));
            }
            let alpha = rz / pap;
            vec_update(x, alpha, &p).map_err(LinearSolverError::Setup)?;
            vec_update(&mut r, -alpha, &ap).map_err(LinearSolverError::Setup)?;
            let norm_r = vec_norm(&r, Norm::Euc);
            self.last_iterations = it;
            self.last_residual = norm_r;
            if norm_r <= goal {
                return Ok(it);
            }
            prec.apply(&mut z, &r);
            let rz_new = vec_inner(&r, &z);
            let beta = rz_new / rz;
            rz = rz_new;
            for i in 0..n {
                p[i] = z[i] + beta * p[i];
            }
        }
        Err(LinearSolverError::NotConverged {
            iterations: self.params.max_iter,
            residual: self.last_residual,
        })
    }

    /// Runs the preconditioned minimum residual method (Paige and Saunders)
    fn minres(
        &mut self,
        x: &mut Vector,
        aa: &CooMatrix,
        b: &Vector,
        prec: &DiagonalPreconditioner,
    ) -> Result<usize, LinearSolverError> {
        let n = b.dim();
        self.last_iterations = 0;

        // Lanczos vectors
        let mut r1 = b.clone();
        let mut r2 = b.clone();
        let mut y = Vector::new(n);
        let mut v = Vector::new(n);
        prec.apply(&mut y, &r1);
        let beta1 = vec_inner(&r1, &y);
        if beta1 < 0.0 {
            return Err(LinearSolverError::Breakdown("indefinite preconditioner"));
        }
        let beta1 = f64::sqrt(beta1);
        let goal = f64::max(self.params.rel_tol * beta1, self.params.abs_tol);
        self.last_residual = beta1;
        if beta1 <= goal {
            return Ok(0);
        }

        // QR factorization of the tridiagonal matrix
        let mut old_beta = 0.0;
        let mut beta = beta1;
        let mut dbar = 0.0;
        let mut epsln = 0.0;
        let mut phibar = beta1;
        let mut cs = -1.0;
        let mut sn = 0.0;

        // search directions
        let mut w = Vector::new(n);
        let mut w1 = Vector::new(n);
        let mut w2 = Vector::new(n);

        for it in 1..=self.params.max_iter {
            let s = 1.0 / beta;
            for i in 0..n {
                v[i] = s * y[i];
            }
            aa.mat_vec_mul(&mut y, 1.0, &v).map_err(LinearSolverError::Setup)?;
            if it >= 2 {
                vec_update(&mut y, -beta / old_beta, &r1).map_err(LinearSolverError::Setup)?;
            }
            let alpha = vec_inner(&v, &y);
            vec_update(&mut y, -alpha / beta, &r2).map_err(LinearSolverError::Setup)?;
            vec_copy(&mut r1, &r2).map_err(LinearSolverError::Setup)?;
            vec_copy(&mut r2, &y).map_err(LinearSolverError::Setup)?;
            prec.apply(&mut y, &r2);
            old_beta = beta;
            beta = vec_inner(&r2, &y);
            if beta < 0.0 {
                self.last_iterations = it;
                return Err(LinearSolverError::Breakdown("indefinite preconditioner"));
            }
            beta = f64::sqrt(beta);

            // apply the previous rotation and compute the next one
            let old_eps = epsln;
            let delta = cs * dbar + sn * alpha;
            let gbar = sn * dbar - cs * alpha;
            epsln = sn * beta;
            dbar = -cs * beta;
            let gamma = f64::max(f64::hypot(gbar, beta), f64::EPSILON);
            cs = gbar / gamma;
            sn = beta / gamma;
            let phi = cs * phibar;
            phibar = sn * phibar;

            // update the solution
            let denom = 1.0 / gamma;
            vec_copy(&mut w1, &w2).map_err(LinearSolverError::Setup)?;
            vec_copy(&mut w2, &w).map_err(LinearSolverError::Setup)?;
            for i in 0..n {
                w[i] = (v[i] - old_eps * w1[i] - delta * w2[i]) * denom;
            }
            vec_update(x, phi, &w).map_err(LinearSolverError::Setup)?;

            self.last_iterations = it;
            self.last_residual = phibar;
            if phibar <= goal {
                return Ok(it);
            }
            if beta == 0.0 {
                return Err(LinearSolverError::Breakdown("Lanczos process stagnated"));
            }
        }
        Err(LinearSolverError::NotConverged {
            iterations: self.params.max_iter,
            residual: self.last_residual,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
