use crate::StrError;
use std::fmt;

/// Defines a scalar function of space and time: f(x, t)
pub type FnScalar = Box<dyn Fn(&[f64], f64) -> f64>;

/// Defines a vector function of space and time: v(x, t)
///
/// The first argument is the output vector with length equal to the space dimension.
pub type FnVector = Box<dyn Fn(&mut [f64], &[f64], f64)>;

/// Holds a time-dependent coefficient for boundary conditions, loads, and initial values
///
/// Consumers must match on the variant and fail explicitly if the variant is not the expected one.
pub enum Coefficient {
    /// Scalar function f(x, t)
    Scalar(FnScalar),

    /// Vector function v(x, t)
    Vector(FnVector),
}

impl Coefficient {
    /// Allocates a scalar coefficient
    pub fn scalar(f: impl Fn(&[f64], f64) -> f64 + 'static) -> Self {
        Coefficient::Scalar(Box::new(f))
    }

    /// Allocates a vector coefficient
    pub fn vector(f: impl Fn(&mut [f64], &[f64], f64) + 'static) -> Self {
        Coefficient::Vector(Box::new(f))
    }

    /// Allocates a constant scalar coefficient
    pub fn constant(value: f64) -> Self {
        Coefficient::Scalar(Box::new(move |_, _| value))
    }

    /// Allocates a constant vector coefficient
    ///
    /// Components beyond the length of `values` are set to zero.
    pub fn constant_vector(values: &[f64]) -> Self {
        let values = values.to_vec();
        Coefficient::Vector(Box::new(move |v, _, _| {
            for i in 0..v.len() {
                v[i] = if i < values.len() { values[i] } else { 0.0 };
            }
        }))
    }

    /// Returns true if this is a scalar coefficient
    pub fn is_scalar(&self) -> bool {
        match self {
            Coefficient::Scalar(..) => true,
            Coefficient::Vector(..) => false,
        }
    }

    /// Evaluates a scalar coefficient
    pub fn eval_scalar(&self, x: &[f64], t: f64) -> Result<f64, StrError> {
        match self {
            Coefficient::Scalar(f) => Ok((f)(x, t)),
            Coefficient::Vector(..) => Err("a scalar coefficient is required"),
        }
    }

    /// Evaluates a vector coefficient
    pub fn eval_vector(&self, v: &mut [f64], x: &[f64], t: f64) -> Result<(), StrError> {
        match self {
            Coefficient::Scalar(..) => Err("a vector coefficient is required"),
            Coefficient::Vector(f) => {
                (f)(v, x, t);
                Ok(())
            }
        }
    }

    /// Evaluates the value associated with a vector component
    ///
    /// A vector coefficient is evaluated into `buffer` (with length = ndim) and the
    /// `component` is extracted. A scalar coefficient returns its value directly.
    pub fn eval_component(&self, buffer: &mut [f64], component: usize, x: &[f64], t: f64) -> Result<f64, StrError> {
        match self {
            Coefficient::Scalar(f) => Ok((f)(x, t)),
            Coefficient::Vector(f) => {
                if component >= buffer.len() {
                    return Err("component is out of bounds");
                }
                (f)(buffer, x, t);
                Ok(buffer[component])
            }
        }
    }
}

impl fmt::Debug for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Scalar(..) => write!(f, "Coefficient::Scalar"),
            Coefficient::Vector(..) => write!(f, "Coefficient::Vector"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
