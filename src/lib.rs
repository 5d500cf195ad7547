//! Nonlinear solid mechanics with quasi-static and dynamic time stepping
//!
//! The crate advances displacement and velocity fields of a deforming body under hyperelastic
//! or elastoplastic constitutive laws, boundary tractions, and prescribed displacements.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;
pub mod prelude;
