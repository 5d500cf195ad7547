//! Implements the finite element method for nonlinear solids

mod boundary_element;
mod element_solid;
mod error;
mod forms;
mod krylov;
mod newton;
mod ode;
mod operator;
mod solver;
pub use crate::fem::boundary_element::*;
pub use crate::fem::element_solid::*;
pub use crate::fem::error::*;
pub use crate::fem::forms::*;
pub use crate::fem::krylov::*;
pub use crate::fem::newton::*;
pub use crate::fem::ode::*;
pub use crate::fem::operator::*;
pub use crate::fem::solver::*;
