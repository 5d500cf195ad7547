use super::kinematics::{deformation_gradient, delta, pair};
use super::{LocalState, StressStrainTrait};
use crate::StrError;
use russell_lab::Matrix;

/// Implements the compressible Neo-Hookean model
///
/// The Kirchhoff stress is:
///
/// ```text
/// τ = λ ln(J) I + G (F Fᵀ - I)
///   = λ ln(J) I + G (H Hᵀ + H + Hᵀ)
/// ```
///
/// with `λ = K - 2G/3` and `J = det(F)`.
pub struct NeoHookean {
    /// Lamé's first parameter
    lambda: f64,

    /// Shear modulus
    shear: f64,
}

impl NeoHookean {
    /// Allocates a new instance
    pub fn new(bulk: f64, shear: f64) -> Self {
        NeoHookean {
            lambda: bulk - 2.0 * shear / 3.0,
            shear,
        }
    }
}

impl StressStrainTrait for NeoHookean {
    fn finite_strain(&self) -> bool {
        true
    }

    fn with_internal_state(&self) -> bool {
        false
    }

    fn stress(&self, stress: &mut Matrix, du_dx: &Matrix, _state: &LocalState) -> Result<(), StrError> {
        let mut ff = Matrix::new(3, 3);
        let mut ff_inv = Matrix::new(3, 3);
        let jj = deformation_gradient(&mut ff, &mut ff_inv, du_dx)?;
        let vol = self.lambda * f64::ln(jj);
        for i in 0..3 {
            for j in 0..3 {
                let mut hht = 0.0;
                for m in 0..3 {
                    hht += du_dx.get(i, m) * du_dx.get(j, m);
                }
                let dev = hht + du_dx.get(i, j) + du_dx.get(j, i);
                stress.set(i, j, vol * delta(i, j) + self.shear * dev);
            }
        }
        Ok(())
    }

    fn stiffness(&self, dd: &mut Matrix, du_dx: &Matrix, _state: &LocalState) -> Result<(), StrError> {
        let mut ff = Matrix::new(3, 3);
        let mut ff_inv = Matrix::new(3, 3);
        deformation_gradient(&mut ff, &mut ff_inv, du_dx)?;
        let (lam, g) = (self.lambda, self.shear);
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    for l in 0..3 {
                        let vol = lam * ff_inv.get(l, k) * delta(i, j);
                        let dev = delta(i, k) * du_dx.get(j, l)
                            + du_dx.get(i, l) * delta(j, k)
                            + delta(i, k) * delta(j, l)
                            + delta(j, k) * delta(i, l);
                        dd.set(pair(i, j), pair(k, l), vol + g * dev);
                    }
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
