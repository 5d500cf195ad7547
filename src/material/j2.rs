use super::kinematics::{delta, pair};
use super::{LocalState, StressStrainTrait};
use crate::StrError;
use russell_lab::Matrix;

/// Holds the result of the elastic predictor and radial return
struct Predictor {
    /// Mean stress p = K tr(εᵉ)
    p: f64,

    /// Deviatoric stress (after the return if plastic)
    s: [[f64; 3]; 3],

    /// Unit flow direction n = η / |η| (zero if |η| = 0)
    n: [[f64; 3]; 3],

    /// Trial equivalent stress q = √(3/2 η:η)
    q_trial: f64,

    /// Plastic multiplier Δγ (zero if elastic)
    dgamma: f64,
}

/// Implements J2 (von Mises) plasticity with linear isotropic and kinematic hardening
///
/// Small-strain model with the return-mapping algorithm. Only three-dimensional problems are supported.
///
/// ```text
/// εᵉ = sym(H) - εᵖ
/// s  = 2 G dev(εᵉ),   η = s - β,   q = √(3/2 η:η)
/// φ  = q - (σy + Hᵢ ε̄ᵖ)
/// ```
pub struct J2 {
    /// Bulk modulus K
    kk: f64,

    /// Shear modulus G
    gg: f64,

    /// Isotropic hardening modulus
    hh_iso: f64,

    /// Kinematic hardening modulus
    hh_kin: f64,

    /// Initial yield stress
    sigma_y: f64,
}

impl J2 {
    /// Allocates a new instance
    pub fn new(young: f64, poisson: f64, hh_iso: f64, hh_kin: f64, sigma_y: f64) -> Self {
        J2 {
            kk: young / (3.0 * (1.0 - 2.0 * poisson)),
            gg: young / (2.0 * (1.0 + poisson)),
            hh_iso,
            hh_kin,
            sigma_y,
        }
    }

    /// Runs the elastic predictor followed by the radial return (if needed)
    fn predict(&self, du_dx: &Matrix, state: &LocalState) -> Predictor {
        // elastic strain
        let mut eps = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                eps[i][j] = 0.5 * (du_dx.get(i, j) + du_dx.get(j, i)) - state.plastic_strain.get(i, j);
            }
        }
        let tr = eps[0][0] + eps[1][1] + eps[2][2];

        // trial stress and relative stress
        let mut s = [[0.0; 3]; 3];
        let mut eta = [[0.0; 3]; 3];
        let mut eta_eta = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                s[i][j] = 2.0 * self.gg * (eps[i][j] - tr * delta(i, j) / 3.0);
                eta[i][j] = s[i][j] - state.back_stress.get(i, j);
                eta_eta += eta[i][j] * eta[i][j];
            }
        }
        let q_trial = f64::sqrt(1.5 * eta_eta);
        let norm_eta = f64::sqrt(eta_eta);
        let mut n = [[0.0; 3]; 3];
        if norm_eta > 0.0 {
            for i in 0..3 {
                for j in 0..3 {
                    n[i][j] = eta[i][j] / norm_eta;
                }
            }
        }

        // yield function
        let phi = q_trial - (self.sigma_y + self.hh_iso * state.accumulated_plastic_strain);
        let mut dgamma = 0.0;
        if phi > 0.0 {
            dgamma = phi / (3.0 * self.gg + self.hh_kin + self.hh_iso);
            let c = f64::sqrt(6.0) * self.gg * dgamma;
            for i in 0..3 {
                for j in 0..3 {
                    s[i][j] -= c * n[i][j];
                }
            }
        }
        Predictor {
            p: self.kk * tr,
            s,
            n,
            q_trial,
            dgamma,
        }
    }
}

impl StressStrainTrait for J2 {
    fn finite_strain(&self) -> bool {
        false
    }

    fn with_internal_state(&self) -> bool {
        true
    }

    fn stress(&self, stress: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError> {
        let pred = self.predict(du_dx, state);
        for i in 0..3 {
            for j in 0..3 {
                stress.set(i, j, pred.p * delta(i, j) + pred.s[i][j]);
            }
        }
        Ok(())
    }

    fn stiffness(&self, dd: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError> {
        let pred = self.predict(du_dx, state);
        let (kk, gg) = (self.kk, self.gg);
        let (a, b) = if pred.dgamma > 0.0 {
            let hh = 3.0 * gg + self.hh_kin + self.hh_iso;
            (
                2.0 * gg * (1.0 - 3.0 * gg * pred.dgamma / pred.q_trial),
                6.0 * gg * gg * (pred.dgamma / pred.q_trial - 1.0 / hh),
            )
        } else {
            (2.0 * gg, 0.0)
        };
        let n = &pred.n;
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    for l in 0..3 {
                        let dij_dkl = delta(i, j) * delta(k, l);
                        let psd = 0.5 * (delta(i, k) * delta(j, l) + delta(i, l) * delta(j, k)) - dij_dkl / 3.0;
                        let value = kk * dij_dkl + a * psd + b * n[i][j] * n[k][l];
                        dd.set(pair(i, j), pair(k, l), value);
                    }
                }
            }
        }
        Ok(())
    }

    fn commit(&self, state: &mut LocalState, du_dx: &Matrix) -> Result<(), StrError> {
        let pred = self.predict(du_dx, state);
        if pred.dgamma <= 0.0 {
            return Ok(());
        }
        let cp = f64::sqrt(1.5) * pred.dgamma;
        let cb = f64::sqrt(2.0 / 3.0) * self.hh_kin * pred.dgamma;
        for i in 0..3 {
            for j in i..3 {
                let n_ij = pred.n[i][j];
                let eps_p = state.plastic_strain.get(i, j);
                let beta = state.back_stress.get(i, j);
                state.plastic_strain.sym_set(i, j, eps_p + cp * n_ij);
                state.back_stress.sym_set(i, j, beta + cb * n_ij);
            }
        }
        state.accumulated_plastic_strain += pred.dgamma;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
