use super::{NewtonSolver, SolidForms, StateBlock, StepError};
use crate::base::{BoundaryConditions, EssentialDofs, Space};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::CooMatrix;

/// Specifies a nonlinear operator R(x) with an on-demand Jacobian
pub trait NonlinearOperator {
    /// Returns the number of equations
    fn size(&self) -> usize;

    /// Computes the residual vector R(trial)
    fn residual(&mut self, rr: &mut Vector, trial: &Vector) -> Result<(), StrError>;

    /// Returns the Jacobian matrix ∂R/∂x at trial
    fn jacobian(&mut self, trial: &Vector) -> Result<&CooMatrix, StrError>;
}

/// Computes the prescribed values g(t) at the essential degrees of freedom
///
/// The other entries are zero.
pub fn prescribed_vector(
    essential: &EssentialDofs,
    bcs: &BoundaryConditions,
    space: &dyn Space,
    t: f64,
) -> Result<Vector, StrError> {
    let mut g = Vector::new(space.true_size());
    essential.prescribed_values(&mut g, bcs, space, t)?;
    Ok(g)
}

/// Implements the quasi-static operator R(u) = f_int(u) - f_ext(t)
///
/// The rows of the essential degrees of freedom are R[d] = u[d] - g[d].
pub struct QuasiStaticOperator<'a> {
    /// Discrete forms
    forms: &'a mut SolidForms,

    /// Essential degrees of freedom
    essential: &'a EssentialDofs,

    /// Prescribed values at the end of the step
    prescribed: &'a Vector,

    /// External forces at the end of the step
    f_ext: Vector,

    /// Bits of the trial vector used to assemble the current Jacobian
    jacobian_trial: Option<Vec<u64>>,
}

impl<'a> QuasiStaticOperator<'a> {
    /// Allocates a new instance for the step ending at time t
    pub fn new(
        forms: &'a mut SolidForms,
        bcs: &BoundaryConditions,
        essential: &'a EssentialDofs,
        prescribed: &'a Vector,
        t: f64,
    ) -> Result<Self, StrError> {
        let mut f_ext = Vector::new(forms.neq());
        forms.external_forces(&mut f_ext, bcs, t)?;
        Ok(QuasiStaticOperator {
            forms,
            essential,
            prescribed,
            f_ext,
            jacobian_trial: None,
        })
    }
}

impl<'a> NonlinearOperator for QuasiStaticOperator<'a> {
    fn size(&self) -> usize {
        self.forms.neq()
    }

    fn residual(&mut self, rr: &mut Vector, trial: &Vector) -> Result<(), StrError> {
        self.forms.internal_forces(rr, trial)?;
        for i in 0..rr.dim() {
            rr[i] -= self.f_ext[i];
        }
        for d in &self.essential.dofs {
            rr[*d] = trial[*d] - self.prescribed[*d];
        }
        Ok(())
    }

    fn jacobian(&mut self, trial: &Vector) -> Result<&CooMatrix, StrError> {
        let bits: Vec<u64> = trial.as_data().iter().map(|x| x.to_bits()).collect();
        if self.jacobian_trial.as_ref() != Some(&bits) {
            self.forms.assemble_jacobian(trial, 0.0, 0.0, 1.0, &self.essential.flags)?;
            self.jacobian_trial = Some(bits);
        }
        Ok(self.forms.jacobian())
    }
}

/// Holds the key of the dynamic Jacobian: the bits of dt and the state epoch
pub type JacobianKey = Option<(u64, usize)>;

/// Implements the reduced system of a dynamic stage with the acceleration k as unknown
///
/// ```text
/// w = v + dt k
/// z = u + dt w
/// R(k) = M k + S w + f_int(z) - f_ext(t)
/// J(k) = M + dt S + dt² K(z)
/// ```
///
/// The essential degrees of freedom have R[d] = k[d] - kg[d], where kg makes z[d] = g(t).
/// The Jacobian is only reassembled when dt or the state epoch change.
pub struct ReducedSystem<'a> {
    /// Discrete forms
    forms: &'a mut SolidForms,

    /// Key of the current Jacobian
    key: &'a mut JacobianKey,

    /// Essential degrees of freedom
    essential: &'a EssentialDofs,

    /// Velocity and displacement at the beginning of the stage
    x: &'a StateBlock,

    /// Stage step size
    dt: f64,

    /// Accelerations at the essential degrees of freedom
    kg: Vector,

    /// External forces at the stage time
    f_ext: Vector,

    /// Stage velocity w
    w: Vector,

    /// Stage displacement z
    z: Vector,

    /// Workspace
    work: Vector,
}

impl<'a> ReducedSystem<'a> {
    /// Allocates a new instance
    pub fn new(
        forms: &'a mut SolidForms,
        key: &'a mut JacobianKey,
        bcs: &BoundaryConditions,
        essential: &'a EssentialDofs,
        space: &dyn Space,
        x: &'a StateBlock,
        dt: f64,
        t: f64,
    ) -> Result<Self, StrError> {
        if dt <= 0.0 {
            return Err("dt must be > 0.0");
        }
        let neq = forms.neq();
        let g = prescribed_vector(essential, bcs, space, t)?;
        let mut kg = Vector::new(neq);
        for d in &essential.dofs {
            let (u, v) = (x.displacement[*d], x.velocity[*d]);
            kg[*d] = (g[*d] - u - dt * v) / (dt * dt);
        }
        let mut f_ext = Vector::new(neq);
        forms.external_forces(&mut f_ext, bcs, t)?;
        Ok(ReducedSystem {
            forms,
            key,
            essential,
            x,
            dt,
            kg,
            f_ext,
            w: Vector::new(neq),
            z: Vector::new(neq),
            work: Vector::new(neq),
        })
    }

    /// Sets k[d] = kg[d] at the essential degrees of freedom
    pub fn lift(&self, k: &mut Vector) {
        for d in &self.essential.dofs {
            k[*d] = self.kg[*d];
        }
    }

    /// Computes w = v + dt k and z = u + dt w
    fn update_stage(&mut self, k: &Vector) {
        let dt = self.dt;
        for i in 0..k.dim() {
            self.w[i] = self.x.velocity[i] + dt * k[i];
            self.z[i] = self.x.displacement[i] + dt * self.w[i];
        }
    }
}

impl<'a> NonlinearOperator for ReducedSystem<'a> {
    fn size(&self) -> usize {
        self.forms.neq()
    }

    fn residual(&mut self, rr: &mut Vector, trial: &Vector) -> Result<(), StrError> {
        self.update_stage(trial);
        self.forms.internal_forces(rr, &self.z)?;
        self.forms.mass_action(&mut self.work, trial);
        for i in 0..rr.dim() {
            rr[i] += self.work[i] - self.f_ext[i];
        }
        self.forms.viscous_action(&mut self.work, &self.w);
        for i in 0..rr.dim() {
            rr[i] += self.work[i];
        }
        for d in &self.essential.dofs {
            rr[*d] = trial[*d] - self.kg[*d];
        }
        Ok(())
    }

    fn jacobian(&mut self, trial: &Vector) -> Result<&CooMatrix, StrError> {
        let key = Some((self.dt.to_bits(), self.forms.epoch()));
        if *self.key != key {
            self.update_stage(trial);
            let dt = self.dt;
            self.forms
                .assemble_jacobian(&self.z, 1.0, dt, dt * dt, &self.essential.flags)?;
            *self.key = key;
        }
        Ok(self.forms.jacobian())
    }
}

/// Implements the dynamic operator solved at every implicit stage
///
/// The key of the Jacobian survives across stages and time steps, so the matrix is reused
/// while dt and the committed material state stay the same.
pub struct DynamicOperator {
    /// Key of the current Jacobian
    jacobian_key: JacobianKey,
}

impl DynamicOperator {
    /// Allocates a new instance
    pub fn new() -> Self {
        DynamicOperator { jacobian_key: None }
    }

    /// Finds the stage derivative k = (k_v, k_u) such that k = F(x + dt k, t)
    ///
    /// Newton solves the reduced system for k_v starting from zero (with lifted essential values);
    /// then k_u = v + dt k_v. Returns the number of Newton iterations.
    pub fn implicit_solve(
        &mut self,
        newton: &mut NewtonSolver,
        forms: &mut SolidForms,
        bcs: &BoundaryConditions,
        essential: &EssentialDofs,
        space: &dyn Space,
        dt: f64,
        t: f64,
        x: &StateBlock,
        k: &mut StateBlock,
    ) -> Result<usize, StepError> {
        let mut sys = ReducedSystem::new(forms, &mut self.jacobian_key, bcs, essential, space, x, dt, t)?;
        k.velocity.fill(0.0);
        sys.lift(&mut k.velocity);
        let iterations = newton.solve(&mut sys, &mut k.velocity)?;
        for i in 0..k.neq() {
            k.displacement[i] = x.velocity[i] + dt * k.velocity[i];
        }
        Ok(iterations)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
