//! Implements the base structures for a nonlinear solid mechanics simulation

mod assembly;
mod boundary_conditions;
mod coefficient;
mod config;
mod enums;
mod field;
mod geometry;
mod parameters;
mod sample_meshes;
mod space;
pub use crate::base::assembly::*;
pub use crate::base::boundary_conditions::*;
pub use crate::base::coefficient::*;
pub use crate::base::config::*;
pub use crate::base::enums::*;
pub use crate::base::field::*;
pub use crate::base::geometry::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
pub use crate::base::space::*;
