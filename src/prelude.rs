//! Makes available common structures needed to run a simulation
//!
//! You may write `use nlsolid::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{BoundaryConditions, Coefficient, Config, FieldState, H1Space, MeshGeometry, SampleMeshes};
pub use crate::base::{KrylovMethod, LinearSolverParams, NonlinearSolverParams, Preconditioner, TimestepMethod};
pub use crate::base::{ParamSolid, ParamStressStrain, Space};
pub use crate::fem::{NonlinearSolidSolver, SolverState, StepError};
pub use crate::material::{LocalState, StressStrain};
