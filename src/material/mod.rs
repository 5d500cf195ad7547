//! Implements material models

mod j2;
mod kinematics;
mod linear_isotropic;
mod local_state;
mod neo_hookean;
mod stress_strain;
pub use crate::material::j2::*;
pub use crate::material::kinematics::*;
pub use crate::material::linear_isotropic::*;
pub use crate::material::local_state::*;
pub use crate::material::neo_hookean::*;
pub use crate::material::stress_strain::*;
