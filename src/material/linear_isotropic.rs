use super::kinematics::{delta, pair};
use super::{LocalState, StressStrainTrait};
use crate::StrError;
use russell_lab::Matrix;

/// Implements the linear isotropic elastic model (small strains)
///
/// ```text
/// σ = λ tr(ε) I + 2 G ε    with    ε = sym(H)    and    λ = K - 2G/3
/// ```
pub struct LinearIsotropic {
    /// Lamé's first parameter
    lambda: f64,

    /// Shear modulus
    shear: f64,
}

impl LinearIsotropic {
    /// Allocates a new instance
    pub fn new(bulk: f64, shear: f64) -> Self {
        LinearIsotropic {
            lambda: bulk - 2.0 * shear / 3.0,
            shear,
        }
    }
}

impl StressStrainTrait for LinearIsotropic {
    fn finite_strain(&self) -> bool {
        false
    }

    fn with_internal_state(&self) -> bool {
        false
    }

    fn stress(&self, stress: &mut Matrix, du_dx: &Matrix, _state: &LocalState) -> Result<(), StrError> {
        let tr = du_dx.get(0, 0) + du_dx.get(1, 1) + du_dx.get(2, 2);
        for i in 0..3 {
            for j in 0..3 {
                let sym = du_dx.get(i, j) + du_dx.get(j, i);
                stress.set(i, j, self.lambda * tr * delta(i, j) + self.shear * sym);
            }
        }
        Ok(())
    }

    fn stiffness(&self, dd: &mut Matrix, _du_dx: &Matrix, _state: &LocalState) -> Result<(), StrError> {
        let (lam, g) = (self.lambda, self.shear);
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    for l in 0..3 {
                        let value = lam * delta(i, j) * delta(k, l)
                            + g * (delta(i, k) * delta(j, l) + delta(i, l) * delta(j, k));
                        dd.set(pair(i, j), pair(k, l), value);
                    }
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearIsotropic;
    use crate::material::kinematics::pair;
    use crate::material::{LocalState, StressStrainTrait};
    use russell_lab::{approx_eq, Matrix};

    #[test]
    fn zero_gradient_gives_zero_stress() {
        let model = LinearIsotropic::new(10.0, 1.0);
        let state = LocalState::new();
        let mut stress = Matrix::filled(3, 3, 123.0);
        model.stress(&mut stress, &Matrix::new(3, 3), &state).unwrap();
        assert_eq!(stress.as_data(), &[0.0; 9]);
        assert_eq!(model.finite_strain(), false);
        assert_eq!(model.with_internal_state(), false);
    }

    #[test]
    fn stress_works() {
        // uniaxial strain ε₀₀ = 0.01 with K = 10, G = 3 ⇒ λ = 8
        let model = LinearIsotropic::new(10.0, 3.0);
        let state = LocalState::new();
        let mut du_dx = Matrix::new(3, 3);
        du_dx.set(0, 0, 0.01);
        du_dx.set(0, 1, 0.02); // only the symmetric part matters
        let mut stress = Matrix::new(3, 3);
        model.stress(&mut stress, &du_dx, &state).unwrap();
        approx_eq(stress.get(0, 0), (8.0 + 6.0) * 0.01, 1e-15);
        approx_eq(stress.get(1, 1), 8.0 * 0.01, 1e-15);
        approx_eq(stress.get(2, 2), 8.0 * 0.01, 1e-15);
        approx_eq(stress.get(0, 1), 3.0 * 0.02, 1e-15);
        approx_eq(stress.get(1, 0), 3.0 * 0.02, 1e-15);
        assert_eq!(stress.get(1, 2), 0.0);
    }

    #[test]
    fn stiffness_works() {
        let model = LinearIsotropic::new(10.0, 3.0);
        let state = LocalState::new();
        let mut dd = Matrix::new(9, 9);
        model.stiffness(&mut dd, &Matrix::new(3, 3), &state).unwrap();
        approx_eq(dd.get(pair(0, 0), pair(0, 0)), 8.0 + 6.0, 1e-14);
        approx_eq(dd.get(pair(0, 0), pair(1, 1)), 8.0, 1e-14);
        assert_eq!(dd.get(pair(0, 1), pair(0, 1)), 3.0);
        assert_eq!(dd.get(pair(0, 1), pair(1, 0)), 3.0);
        assert_eq!(dd.get(pair(0, 1), pair(0, 2)), 0.0);

        // the stress is linear: σ = D : H
        let du_dx = Matrix::from(&[[0.1, 0.2, 0.3], [0.0, -0.1, 0.05], [0.1, 0.0, 0.2]]);
        let mut stress = Matrix::new(3, 3);
        model.stress(&mut stress, &du_dx, &state).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    for l in 0..3 {
                        sum += dd.get(pair(i, j), pair(k, l)) * du_dx.get(k, l);
                    }
                }
                approx_eq(stress.get(i, j), sum, 1e-14);
            }
        }
    }
}
