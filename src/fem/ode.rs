use super::StepError;
use crate::base::TimestepMethod;
use crate::StrError;
use russell_lab::{vec_copy, vec_update, Vector};

/// Holds the block state x = (v, u) of the first-order system
///
/// ```text
/// dv/dt = M⁻¹ (f_ext(t) - f_int(u) - S v)
/// du/dt = v
/// ```
#[derive(Clone, Debug)]
pub struct StateBlock {
    /// Velocity (true vector)
    pub velocity: Vector,

    /// Displacement (true vector)
    pub displacement: Vector,
}

impl StateBlock {
    /// Allocates a new instance with zero values
    pub fn new(neq: usize) -> Self {
        StateBlock {
            velocity: Vector::new(neq),
            displacement: Vector::new(neq),
        }
    }

    /// Returns the number of equations of each block
    pub fn neq(&self) -> usize {
        self.velocity.dim()
    }

    /// Performs self += alpha · k
    pub fn update(&mut self, alpha: f64, k: &StateBlock) -> Result<(), StrError> {
        vec_update(&mut self.velocity, alpha, &k.velocity)?;
        vec_update(&mut self.displacement, alpha, &k.displacement)
    }
}

/// Holds the coefficients of the three-stage SDIRK method (third order, L-stable)
///
/// The Butcher tableau is:
///
/// ```text
///  a  |  a
///  c  |  c-a    a
///  1  |  b   1-a-b   a
/// ----+-----------------
///     |  b   1-a-b   a
/// ```
const SDIRK33_A: f64 = 0.435866521508458999416019;
const SDIRK33_B: f64 = 1.20849664917601007033648;
const SDIRK33_C: f64 = 0.717933260754229499708010;

/// Implements the implicit time integrators of the block system
///
/// Each stage calls the implicit solve with `(dt_stage, t_stage, x, k)`, which must find k
/// such that `k = F(x + dt_stage · k, t_stage)`.
pub struct OdeSolver {
    /// Time-stepping method
    method: TimestepMethod,

    /// Stage derivative
    k: StateBlock,

    /// Intermediate state of SDIRK33
    y: StateBlock,
}

impl OdeSolver {
    /// Allocates a new instance
    pub fn new(method: TimestepMethod, neq: usize) -> Result<Self, StrError> {
        if !method.is_dynamic() {
            return Err("the ODE solver requires a dynamic time-stepping method");
        }
        Ok(OdeSolver {
            method,
            k: StateBlock::new(neq),
            y: StateBlock::new(neq),
        })
    }

    /// Returns the time-stepping method
    pub fn method(&self) -> TimestepMethod {
        self.method
    }

    /// Returns the number of implicit stages per step
    pub fn n_stages(&self) -> usize {
        match self.method {
            TimestepMethod::Sdirk33 => 3,
            _ => 1,
        }
    }

    /// Advances x from t to t + dt
    ///
    /// x is only partially updated if a stage fails; callers must work on a copy.
    pub fn step<F>(&mut self, x: &mut StateBlock, t: f64, dt: f64, mut implicit_solve: F) -> Result<(), StepError>
    where
        F: FnMut(f64, f64, &StateBlock, &mut StateBlock) -> Result<(), StepError>,
    {
        if dt <= 0.0 {
            return Err(StepError::Config("dt must be > 0.0"));
        }
        if x.neq() != self.k.neq() {
            return Err(StepError::Config("the dimension of the state is incorrect"));
        }
        let k = &mut self.k;
        match self.method {
            TimestepMethod::BackwardEuler => {
                implicit_solve(dt, t + dt, &*x, &mut *k)?;
                x.update(dt, k)?;
            }
            TimestepMethod::Sdirk33 => {
                let (a, b, c) = (SDIRK33_A, SDIRK33_B, SDIRK33_C);
                let y = &mut self.y;

                // stage 1
                implicit_solve(a * dt, t + a * dt, &*x, &mut *k)?;
                vec_copy(&mut y.velocity, &x.velocity)?;
                vec_copy(&mut y.displacement, &x.displacement)?;
                y.update((c - a) * dt, k)?;
                x.update(b * dt, k)?;

                // stage 2
                implicit_solve(a * dt, t + c * dt, &*y, &mut *k)?;
                x.update((1.0 - a - b) * dt, k)?;

                // stage 3
                implicit_solve(a * dt, t + dt, &*x, &mut *k)?;
                x.update(a * dt, k)?;
            }
            TimestepMethod::QuasiStatic => {
                return Err(StepError::Config("the ODE solver requires a dynamic time-stepping method"))
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
