use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds parameters for stress-strain relations
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ParamStressStrain {
    /// Linear isotropic elasticity (small strains)
    LinearIsotropic {
        /// Bulk modulus
        bulk: f64,

        /// Shear modulus
        shear: f64,
    },

    /// Compressible Neo-Hookean hyperelasticity (finite strains)
    NeoHookean {
        /// Bulk modulus
        bulk: f64,

        /// Shear modulus
        shear: f64,
    },

    /// J2 (von Mises) plasticity with linear isotropic and kinematic hardening (small strains)
    J2 {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,

        /// Isotropic hardening modulus
        hh_iso: f64,

        /// Kinematic hardening modulus
        hh_kin: f64,

        /// Initial yield stress (uniaxial)
        sigma_y: f64,
    },
}

/// Holds parameters for solid media mechanics simulations
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamSolid {
    /// Density in the reference configuration
    pub density: f64,

    /// Parameters for the stress-strain model
    pub stress_strain: ParamStressStrain,

    /// Number of integration points (None means the default for the cell kind)
    pub ngauss: Option<usize>,
}

impl ParamStressStrain {
    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        match *self {
            ParamStressStrain::LinearIsotropic { bulk, shear } | ParamStressStrain::NeoHookean { bulk, shear } => {
                if bulk <= 0.0 {
                    return Err("bulk modulus must be > 0.0");
                }
                if shear <= 0.0 {
                    return Err("shear modulus must be > 0.0");
                }
            }
            ParamStressStrain::J2 {
                young,
                poisson,
                hh_iso,
                hh_kin,
                sigma_y,
            } => {
                if young <= 0.0 {
                    return Err("Young's modulus must be > 0.0");
                }
                if poisson <= -1.0 || poisson >= 0.5 {
                    return Err("Poisson's coefficient must be in (-1.0, 0.5)");
                }
                if hh_iso < 0.0 || hh_kin < 0.0 {
                    return Err("hardening moduli must be ≥ 0.0");
                }
                if sigma_y <= 0.0 {
                    return Err("yield stress must be > 0.0");
                }
            }
        }
        Ok(())
    }

    /// Returns true if the model only supports three-dimensional problems
    pub fn three_dim_only(&self) -> bool {
        match self {
            ParamStressStrain::J2 { .. } => true,
            _ => false,
        }
    }
}

impl ParamSolid {
    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.density < 0.0 {
            return Err("density must be ≥ 0.0");
        }
        if let Some(n) = self.ngauss {
            if n < 1 {
                return Err("ngauss must be ≥ 1");
            }
        }
        self.stress_strain.validate()
    }

    /// Reads the parameters from a JSON string
    pub fn from_json(json: &str) -> Result<Self, StrError> {
        let param: ParamSolid = serde_json::from_str(json).map_err(|_| "cannot parse JSON solid parameters")?;
        param.validate()?;
        Ok(param)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
