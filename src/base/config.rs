use super::{KrylovMethod, Preconditioner, TimestepMethod};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the parameters of the iterative linear solver
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct LinearSolverParams {
    /// Krylov method
    pub method: KrylovMethod,

    /// Preconditioner
    pub preconditioner: Preconditioner,

    /// Relative tolerance on the (preconditioned) residual norm
    pub rel_tol: f64,

    /// Absolute tolerance on the (preconditioned) residual norm
    pub abs_tol: f64,

    /// Maximum number of iterations
    pub max_iter: usize,
}

/// Holds the parameters of the Newton-Raphson solver
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct NonlinearSolverParams {
    /// Relative tolerance on the residual norm (with respect to the initial residual norm)
    pub rel_tol: f64,

    /// Absolute tolerance on the residual norm
    pub abs_tol: f64,

    /// Maximum number of iterations
    pub max_iter: usize,
}

/// Holds configuration data such as solver parameters and verbosity flags
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Time-stepping method (quasi-static or dynamic)
    pub timestep_method: TimestepMethod,

    /// Parameters of the linear solver
    pub linear: LinearSolverParams,

    /// Parameters of the nonlinear solver
    pub nonlinear: NonlinearSolverParams,

    /// Shows one line per time step
    pub verbose_timesteps: bool,

    /// Shows the Newton-Raphson iterations
    pub verbose_iterations: bool,

    /// Shows warnings found while resolving the boundary conditions
    pub verbose_warnings: bool,

    /// Shows the iterations of the linear solver
    pub verbose_linear: bool,
}

impl LinearSolverParams {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        LinearSolverParams {
            method: KrylovMethod::Minres,
            preconditioner: Preconditioner::L1Jacobi,
            rel_tol: 1e-10,
            abs_tol: 1e-14,
            max_iter: 5000,
        }
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.rel_tol < 0.0 {
            return Err("linear solver rel_tol must be ≥ 0.0");
        }
        if self.abs_tol < 0.0 {
            return Err("linear solver abs_tol must be ≥ 0.0");
        }
        if self.rel_tol == 0.0 && self.abs_tol == 0.0 {
            return Err("linear solver rel_tol and abs_tol cannot be both zero");
        }
        if self.max_iter < 1 {
            return Err("linear solver max_iter must be ≥ 1");
        }
        Ok(())
    }
}

impl NonlinearSolverParams {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        NonlinearSolverParams {
            rel_tol: 1e-8,
            abs_tol: 1e-12,
            max_iter: 20,
        }
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.rel_tol < 0.0 {
            return Err("nonlinear solver rel_tol must be ≥ 0.0");
        }
        if self.abs_tol < 0.0 {
            return Err("nonlinear solver abs_tol must be ≥ 0.0");
        }
        if self.rel_tol == 0.0 && self.abs_tol == 0.0 {
            return Err("nonlinear solver rel_tol and abs_tol cannot be both zero");
        }
        if self.max_iter < 1 {
            return Err("nonlinear solver max_iter must be ≥ 1");
        }
        Ok(())
    }
}

impl Config {
    /// Allocates a new instance with default values (quasi-static)
    pub fn new() -> Self {
        Config {
            timestep_method: TimestepMethod::QuasiStatic,
            linear: LinearSolverParams::new(),
            nonlinear: NonlinearSolverParams::new(),
            verbose_timesteps: false,
            verbose_iterations: false,
            verbose_warnings: false,
            verbose_linear: false,
        }
    }

    /// Reads the configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, StrError> {
        let config: Config = serde_json::from_str(json).map_err(|_| "cannot parse JSON configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all parameters
    pub fn validate(&self) -> Result<(), StrError> {
        self.linear.validate()?;
        self.nonlinear.validate()
    }

    /// Sets the time-stepping method
    pub fn set_timestep_method(&mut self, method: TimestepMethod) -> Result<&mut Self, StrError> {
        self.timestep_method = method;
        Ok(self)
    }

    /// Sets the parameters of the linear solver
    pub fn set_linear_solver(&mut self, params: LinearSolverParams) -> Result<&mut Self, StrError> {
        params.validate()?;
        self.linear = params;
        Ok(self)
    }

    /// Sets the parameters of the nonlinear solver
    pub fn set_nonlinear_solver(&mut self, params: NonlinearSolverParams) -> Result<&mut Self, StrError> {
        params.validate()?;
        self.nonlinear = params;
        Ok(self)
    }

    /// Sets the Newton-Raphson tolerances
    pub fn set_newton_tolerances(&mut self, rel_tol: f64, abs_tol: f64) -> Result<&mut Self, StrError> {
        let params = NonlinearSolverParams {
            rel_tol,
            abs_tol,
            max_iter: self.nonlinear.max_iter,
        };
        self.set_nonlinear_solver(params)
    }

    /// Sets the maximum number of Newton-Raphson iterations
    pub fn set_newton_max_iter(&mut self, max_iter: usize) -> Result<&mut Self, StrError> {
        if max_iter < 1 {
            return Err("nonlinear solver max_iter must be ≥ 1");
        }
        self.nonlinear.max_iter = max_iter;
        Ok(self)
    }

    /// Sets the verbose flags for time steps and iterations
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool) -> Result<&mut Self, StrError> {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        Ok(self)
    }

    /// Sets the verbose flag for boundary condition warnings
    pub fn set_verbose_warnings(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.verbose_warnings = flag;
        Ok(self)
    }

    /// Sets the verbose flag for the linear solver
    pub fn set_verbose_linear(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.verbose_linear = flag;
        Ok(self)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "timestep_method = {:?}\n", self.timestep_method)?;
        write!(f, "\nLinear solver\n")?;
        write!(f, "-------------\n")?;
        write!(f, "method = {:?}\n", self.linear.method)?;
        write!(f, "preconditioner = {:?}\n", self.linear.preconditioner)?;
        write!(f, "rel_tol = {:?}\n", self.linear.rel_tol)?;
        write!(f, "abs_tol = {:?}\n", self.linear.abs_tol)?;
        write!(f, "max_iter = {:?}\n", self.linear.max_iter)?;
        write!(f, "\nNonlinear solver\n")?;
        write!(f, "----------------\n")?;
        write!(f, "rel_tol = {:?}\n", self.nonlinear.rel_tol)?;
        write!(f, "abs_tol = {:?}\n", self.nonlinear.abs_tol)?;
        write!(f, "max_iter = {:?}\n", self.nonlinear.max_iter)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
