use super::{deformation_gradient, kirchhoff_to_piola, piola_tangent};
use super::{LinearIsotropic, LocalState, NeoHookean, J2};
use crate::base::{ParamSolid, ParamStressStrain};
use crate::StrError;
use russell_lab::Matrix;

/// Specifies the essential functions for stress-strain models
///
/// All functions receive the (3×3) displacement gradient H = ∂u/∂X. Two-dimensional
/// problems embed H as plane strain (third row and column equal to zero).
///
/// The fourth-order tangents are (9×9) matrices with the (i,j) pair at row/column `3 i + j`.
pub trait StressStrainTrait: Send {
    /// Indicates that the model returns the Kirchhoff stress and must be converted to the first Piola-Kirchhoff stress
    ///
    /// Small-strain models return the Cauchy stress, which is used directly as P.
    fn finite_strain(&self) -> bool;

    /// Indicates that the model has internal variables that evolve on commit
    fn with_internal_state(&self) -> bool;

    /// Computes the stress (Kirchhoff if finite_strain, Cauchy otherwise)
    ///
    /// The committed state is not modified.
    fn stress(&self, stress: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError>;

    /// Computes the derivative of the stress with respect to the displacement gradient
    fn stiffness(&self, dd: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError>;

    /// Updates the internal variables once the displacement gradient is accepted
    fn commit(&self, _state: &mut LocalState, _du_dx: &Matrix) -> Result<(), StrError> {
        Ok(())
    }
}

/// Holds the actual stress-strain model implementation
pub struct StressStrain {
    /// Holds the actual model implementation
    pub actual: Box<dyn StressStrainTrait>,
}

impl StressStrain {
    /// Allocates a new instance
    pub fn new(param: &ParamSolid, ndim: usize) -> Result<Self, StrError> {
        param.validate()?;
        if param.stress_strain.three_dim_only() && ndim != 3 {
            return Err("J2 plasticity requires a three-dimensional mesh");
        }
        let actual: Box<dyn StressStrainTrait> = match param.stress_strain {
            // Linear isotropic elasticity
            ParamStressStrain::LinearIsotropic { bulk, shear } => Box::new(LinearIsotropic::new(bulk, shear)),

            // Compressible Neo-Hookean
            ParamStressStrain::NeoHookean { bulk, shear } => Box::new(NeoHookean::new(bulk, shear)),

            // J2 plasticity
            ParamStressStrain::J2 {
                young,
                poisson,
                hh_iso,
                hh_kin,
                sigma_y,
            } => Box::new(J2::new(young, poisson, hh_iso, hh_kin, sigma_y)),
        };
        Ok(StressStrain { actual })
    }

    /// Computes the first Piola-Kirchhoff stress P
    ///
    /// # Output
    ///
    /// * `pp` -- (3×3) the first Piola-Kirchhoff stress
    pub fn piola_stress(&self, pp: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError> {
        if !self.actual.finite_strain() {
            return self.actual.stress(pp, du_dx, state);
        }
        let mut ff = Matrix::new(3, 3);
        let mut ff_inv = Matrix::new(3, 3);
        let mut tau = Matrix::new(3, 3);
        deformation_gradient(&mut ff, &mut ff_inv, du_dx)?;
        self.actual.stress(&mut tau, du_dx, state)?;
        kirchhoff_to_piola(pp, &tau, &ff_inv);
        Ok(())
    }

    /// Computes the tangent A = ∂P/∂H
    ///
    /// # Output
    ///
    /// * `aa` -- (9×9) the tangent of the first Piola-Kirchhoff stress
    pub fn piola_stiffness(&self, aa: &mut Matrix, du_dx: &Matrix, state: &LocalState) -> Result<(), StrError> {
        if !self.actual.finite_strain() {
            return self.actual.stiffness(aa, du_dx, state);
        }
        let mut ff = Matrix::new(3, 3);
        let mut ff_inv = Matrix::new(3, 3);
        let mut tau = Matrix::new(3, 3);
        let mut pp = Matrix::new(3, 3);
        let mut dtau = Matrix::new(9, 9);
        deformation_gradient(&mut ff, &mut ff_inv, du_dx)?;
        self.actual.stress(&mut tau, du_dx, state)?;
        self.actual.stiffness(&mut dtau, du_dx, state)?;
        kirchhoff_to_piola(&mut pp, &tau, &ff_inv);
        piola_tangent(aa, &dtau, &pp, &ff_inv);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
