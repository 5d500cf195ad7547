use super::{prescribed_vector, DynamicOperator, NewtonSolver, OdeSolver, QuasiStaticOperator};
use super::{SolidForms, StateBlock, StepError};
use crate::base::{BcWarning, BoundaryConditions, Coefficient, Config, EssentialDofs, FieldState};
use crate::base::{H1Space, MeshGeometry, ParamSolid, Space};
use crate::material::StateArena;
use crate::StrError;
use russell_lab::{vec_inner, Vector};

/// Indicates the regime chosen by complete_setup
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverState {
    /// The setup has not been completed yet
    Uninitialized,

    /// Ready to run quasi-static steps
    QuasiStaticReady,

    /// Ready to run dynamic steps
    DynamicReady,
}

/// Holds the data built by complete_setup
struct Setup {
    /// Resolved essential degrees of freedom
    essential: EssentialDofs,

    /// Discrete forms (owns the material state)
    forms: SolidForms,

    /// Newton-Raphson solver
    newton: NewtonSolver,

    /// ODE solver (dynamic only)
    ode: Option<OdeSolver>,

    /// Dynamic operator (keeps the Jacobian key across steps)
    dynamic: DynamicOperator,
}

/// Implements the nonlinear solid mechanics solver
///
/// # Examples
///
/// ```
/// use nlsolid::prelude::*;
/// use nlsolid::StrError;
///
/// fn main() -> Result<(), StrError> {
///     let space = SampleMeshes::block_qua4(2, 1, 2.0, 1.0)?;
///     let mut solver = NonlinearSolidSolver::new(space, Config::new())?;
///     solver
///         .set_material_parameters(ParamSolid {
///             density: 1.0,
///             stress_strain: ParamStressStrain::LinearIsotropic { bulk: 10.0, shear: 5.0 },
///             ngauss: None,
///         })?
///         .set_displacement_bc(&[4], Coefficient::constant_vector(&[0.0, 0.0]), None)?
///         .set_displacement_bc(&[2], Coefficient::constant(0.01), Some(0))?;
///     solver.complete_setup()?;
///     let dt = solver.advance_timestep(1.0).map_err(|_| "step failed")?;
///     assert_eq!(dt, 1.0);
///     assert_eq!(solver.cycle(), 1);
///     Ok(())
/// }
/// ```
pub struct NonlinearSolidSolver {
    /// Finite element space
    space: H1Space,

    /// Configuration
    config: Config,

    /// Boundary conditions
    bcs: BoundaryConditions,

    /// Material parameters
    param: Option<ParamSolid>,

    /// Viscosity (scalar)
    viscosity: Option<Coefficient>,

    /// Initial displacement (vector)
    initial_displacement: Option<Coefficient>,

    /// Initial velocity (vector)
    initial_velocity: Option<Coefficient>,

    /// Displacement field
    displacement: FieldState,

    /// Velocity field
    velocity: FieldState,

    /// Reference and deformed coordinates
    geometry: MeshGeometry,

    /// Data built by complete_setup
    setup: Option<Setup>,

    /// Current time
    time: f64,

    /// Number of accepted steps
    cycle: usize,

    /// Newton-Raphson iterations of the last accepted step (summed over stages)
    newton_iterations: usize,
}

impl NonlinearSolidSolver {
    /// Allocates a new instance
    pub fn new(space: H1Space, config: Config) -> Result<Self, StrError> {
        config.validate()?;
        let displacement = FieldState::new("displacement", &space);
        let velocity = FieldState::new("velocity", &space);
        let geometry = MeshGeometry::new(&space);
        Ok(NonlinearSolidSolver {
            space,
            config,
            bcs: BoundaryConditions::new(),
            param: None,
            viscosity: None,
            initial_displacement: None,
            initial_velocity: None,
            displacement,
            velocity,
            geometry,
            setup: None,
            time: 0.0,
            cycle: 0,
            newton_iterations: 0,
        })
    }

    /// Returns an error if complete_setup has been called
    fn require_not_setup(&self) -> Result<(), StrError> {
        if self.setup.is_some() {
            return Err("cannot modify the solver after complete_setup");
        }
        Ok(())
    }

    /// Adds an essential (displacement) boundary condition
    ///
    /// A vector coefficient is required if `component` is None; a scalar coefficient otherwise.
    pub fn set_displacement_bc(
        &mut self,
        markers: &[i32],
        coefficient: Coefficient,
        component: Option<usize>,
    ) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        self.bcs.add_essential(markers, coefficient, component);
        Ok(self)
    }

    /// Adds a traction boundary condition (natural)
    pub fn set_traction_bc(
        &mut self,
        markers: &[i32],
        coefficient: Coefficient,
        component: Option<usize>,
    ) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        self.bcs.add_natural(markers, coefficient, component);
        Ok(self)
    }

    /// Adds a pressure boundary condition (scalar coefficient)
    pub fn set_pressure_bc(&mut self, markers: &[i32], coefficient: Coefficient) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        self.bcs.add_pressure(markers, coefficient);
        Ok(self)
    }

    /// Adds a body force (vector coefficient)
    pub fn set_body_force(&mut self, coefficient: Coefficient) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        self.bcs.add_body_force(coefficient);
        Ok(self)
    }

    /// Sets the material parameters
    pub fn set_material_parameters(&mut self, param: ParamSolid) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        param.validate()?;
        self.param = Some(param);
        Ok(self)
    }

    /// Sets the viscosity (scalar coefficient)
    pub fn set_viscosity(&mut self, coefficient: Coefficient) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        if !coefficient.is_scalar() {
            return Err("viscosity requires a scalar coefficient");
        }
        self.viscosity = Some(coefficient);
        Ok(self)
    }

    /// Sets the initial displacement (vector coefficient)
    pub fn set_initial_displacement(&mut self, coefficient: Coefficient) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        if coefficient.is_scalar() {
            return Err("initial displacement requires a vector coefficient");
        }
        self.initial_displacement = Some(coefficient);
        Ok(self)
    }

    /// Sets the initial velocity (vector coefficient)
    pub fn set_initial_velocity(&mut self, coefficient: Coefficient) -> Result<&mut Self, StrError> {
        self.require_not_setup()?;
        if coefficient.is_scalar() {
            return Err("initial velocity requires a vector coefficient");
        }
        self.initial_velocity = Some(coefficient);
        Ok(self)
    }

    /// Resolves the boundary conditions, builds the forms, and fixes the regime
    ///
    /// Must be called exactly once, after all setters and before advance_timestep.
    pub fn complete_setup(&mut self) -> Result<(), StrError> {
        if self.setup.is_some() {
            return Err("complete_setup must be called exactly once");
        }
        let param = self.param.ok_or("material parameters must be set before complete_setup")?;
        let essential = self.bcs.resolve(&self.space)?;
        if self.config.verbose_warnings {
            for warning in self.bcs.warnings() {
                println!("WARNING: {}", warning);
            }
        }
        let forms = SolidForms::new(&self.space, &param, &self.bcs, self.viscosity.as_ref())?;
        let newton = NewtonSolver::new(&self.config)?;
        let ode = if self.config.timestep_method.is_dynamic() {
            Some(OdeSolver::new(self.config.timestep_method, self.space.true_size())?)
        } else {
            None
        };

        // initial fields
        if let Some(coefficient) = &self.initial_displacement {
            self.displacement.project(&self.space, coefficient, self.time)?;
        }
        if let Some(coefficient) = &self.initial_velocity {
            self.velocity.project(&self.space, coefficient, self.time)?;
        }
        self.displacement.sync_true_from_local(&self.space);
        self.velocity.sync_true_from_local(&self.space);
        self.geometry.advance(&self.displacement.local_vec)?;
        self.geometry.activate_deformed();

        if self.config.verbose_iterations {
            newton.print_header();
        } else if self.config.verbose_timesteps {
            println!(
                "{:>8} {:>13} {:>13} {:>5} {:>9}",
                "timestep", "t", "Δt", "iter", "Σiter"
            );
        }
        self.setup = Some(Setup {
            essential,
            forms,
            newton,
            ode,
            dynamic: DynamicOperator::new(),
        });
        Ok(())
    }

    /// Advances the solution by one time step
    ///
    /// Returns the actual step size. On failure, the fields and the material state are left at
    /// the previous converged step.
    pub fn advance_timestep(&mut self, dt: f64) -> Result<f64, StepError> {
        if self.setup.is_none() {
            return Err(StepError::Config("complete_setup must be called before advance_timestep"));
        }
        if dt <= 0.0 {
            return Err(StepError::Config("dt must be > 0.0"));
        }

        // assembly runs on the reference configuration
        self.geometry.activate_reference();
        self.displacement.sync_true_from_local(&self.space);
        self.velocity.sync_true_from_local(&self.space);

        let mut x = StateBlock {
            velocity: self.velocity.true_vec.clone(),
            displacement: self.displacement.true_vec.clone(),
        };
        let res = match self.setup.as_mut() {
            Some(setup) => run_step(setup, &self.space, &self.bcs, &self.geometry, &mut x, self.time, dt),
            None => Err(StepError::Config("complete_setup must be called before advance_timestep")),
        };
        let iterations = match res {
            Ok(iterations) => iterations,
            Err(e) => {
                // restore the true vectors from the untouched local vectors
                self.displacement.sync_true_from_local(&self.space);
                self.velocity.sync_true_from_local(&self.space);
                self.geometry.activate_deformed();
                return Err(e);
            }
        };
        self.accept(x, dt, iterations)?;
        Ok(dt)
    }

    /// Accepts the converged step and advances the time
    ///
    /// The deformed node-set is active on return, also on failure.
    fn accept(&mut self, x: StateBlock, dt: f64, iterations: usize) -> Result<(), StrError> {
        let res = self.distribute(x);
        self.geometry.activate_deformed();
        res?;
        self.time += dt;
        self.cycle += 1;
        self.newton_iterations = iterations;
        if self.config.verbose_timesteps {
            println!(
                "{:>8} {:>13.6e} {:>13.6e} {:>5} {:>9}",
                self.cycle, self.time, dt, "·", iterations
            );
        }
        Ok(())
    }

    /// Commits the state, distributes the fields, and advances the geometry
    fn distribute(&mut self, x: StateBlock) -> Result<(), StrError> {
        let setup = self.setup.as_mut().ok_or("complete_setup must be called before advance_timestep")?;
        let neq = self.displacement.true_vec.dim();
        if x.displacement.dim() != neq || x.velocity.dim() != self.velocity.true_vec.dim() {
            return Err("the converged state has an incompatible dimension");
        }
        setup.forms.commit(&x.displacement)?;
        let old_u_local = self.displacement.local_vec.clone();
        self.displacement.true_vec = x.displacement;
        self.displacement.sync_local_from_true(&self.space);
        if setup.ode.is_some() {
            self.velocity.true_vec = x.velocity;
            self.velocity.sync_local_from_true(&self.space);
            let mut du = self.displacement.local_vec.clone();
            for i in 0..du.dim() {
                du[i] -= old_u_local[i];
            }
            self.geometry.advance_incremental(&du)?;
        } else {
            self.geometry.advance(&self.displacement.local_vec)?;
        }
        Ok(())
    }

    /// Returns the regime fixed by complete_setup
    pub fn state(&self) -> SolverState {
        match &self.setup {
            None => SolverState::Uninitialized,
            Some(setup) => match setup.ode {
                None => SolverState::QuasiStaticReady,
                Some(_) => SolverState::DynamicReady,
            },
        }
    }

    /// Returns the finite element space
    pub fn space(&self) -> &H1Space {
        &self.space
    }

    /// Returns the displacement field
    pub fn displacement(&self) -> &FieldState {
        &self.displacement
    }

    /// Returns the velocity field
    pub fn velocity(&self) -> &FieldState {
        &self.velocity
    }

    /// Returns the reference and deformed coordinates
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    /// Returns the current time
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the number of accepted steps
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Returns the warnings found while resolving the essential boundary conditions
    pub fn warnings(&self) -> &[BcWarning] {
        self.bcs.warnings()
    }

    /// Returns the resolved essential degrees of freedom
    pub fn essential_dofs(&self) -> Result<&EssentialDofs, StrError> {
        let setup = self.setup.as_ref().ok_or("complete_setup must be called first")?;
        Ok(&setup.essential)
    }

    /// Returns the number of Newton-Raphson iterations of the last accepted step
    pub fn newton_iterations(&self) -> usize {
        self.newton_iterations
    }

    /// Returns the number of Jacobian assemblies so far
    pub fn jacobian_assemblies(&self) -> usize {
        match &self.setup {
            Some(setup) => setup.forms.n_assemblies(),
            None => 0,
        }
    }

    /// Returns the committed state of all integration points
    pub fn material_states(&self) -> Result<&StateArena, StrError> {
        let setup = self.setup.as_ref().ok_or("complete_setup must be called first")?;
        Ok(setup.forms.states())
    }

    /// Computes f_int(u) - f_ext(t) at the current time
    ///
    /// The entries at the essential degrees of freedom are the support reactions; the other
    /// entries are the out-of-balance forces.
    pub fn reaction_forces(&mut self) -> Result<Vector, StrError> {
        let setup = self.setup.as_mut().ok_or("complete_setup must be called first")?;
        self.geometry.activate_reference();
        let res = out_of_balance_forces(setup, &self.bcs, &self.geometry, &self.displacement.true_vec, self.time);
        self.geometry.activate_deformed();
        res
    }

    /// Computes the kinetic energy ½ vᵀ M v
    pub fn kinetic_energy(&self) -> Result<f64, StrError> {
        let setup = self.setup.as_ref().ok_or("complete_setup must be called first")?;
        let v = &self.velocity.true_vec;
        let mut mv = Vector::new(v.dim());
        setup.forms.mass_action(&mut mv, v);
        Ok(0.5 * vec_inner(v, &mv))
    }
}

/// Computes f_int(u) - f_ext(t) on the reference configuration
fn out_of_balance_forces(
    setup: &mut Setup,
    bcs: &BoundaryConditions,
    geometry: &MeshGeometry,
    uu: &Vector,
    t: f64,
) -> Result<Vector, StrError> {
    geometry.require_reference()?;
    let neq = setup.forms.neq();
    let mut f_int = Vector::new(neq);
    let mut f_ext = Vector::new(neq);
    setup.forms.internal_forces(&mut f_int, uu)?;
    setup.forms.external_forces(&mut f_ext, bcs, t)?;
    for i in 0..neq {
        f_int[i] -= f_ext[i];
    }
    Ok(f_int)
}

/// Runs the nonlinear solve of one step on the copy x
///
/// Returns the number of Newton-Raphson iterations (summed over stages).
fn run_step(
    setup: &mut Setup,
    space: &H1Space,
    bcs: &BoundaryConditions,
    geometry: &MeshGeometry,
    x: &mut StateBlock,
    t: f64,
    dt: f64,
) -> Result<usize, StepError> {
    geometry.require_reference()?;
    let Setup {
        essential,
        forms,
        newton,
        ode,
        dynamic,
    } = setup;
    match ode {
        None => {
            // lift the essential values and warm-start from the previous displacement
            let t_new = t + dt;
            let g = prescribed_vector(essential, bcs, space, t_new)?;
            for d in &essential.dofs {
                x.displacement[*d] = g[*d];
            }
            let mut op = QuasiStaticOperator::new(forms, bcs, essential, &g, t_new)?;
            newton.solve(&mut op, &mut x.displacement)
        }
        Some(ode) => {
            let mut total = 0;
            ode.step(x, t, dt, |h, t_stage, x0, k| {
                total += dynamic.implicit_solve(&mut *newton, &mut *forms, bcs, &*essential, space, h, t_stage, x0, k)?;
                Ok(())
            })?;
            Ok(total)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{run_step, NonlinearSolidSolver, SolverState};
    use crate::base::{BcWarning, Coefficient, Config, ParamSolid, ParamStressStrain, SampleMeshes};
    use crate::base::{ActiveNodes, TimestepMethod};
    use crate::fem::{StateBlock, StepError};
    use russell_lab::approx_eq;

    fn param_linear() -> ParamSolid {
        ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::LinearIsotropic { bulk: 10.0, shear: 5.0 },
            ngauss: None,
        }
    }

    fn new_bar(config: Config) -> NonlinearSolidSolver {
        let space = SampleMeshes::block_qua4(2, 1, 2.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, config).unwrap();
        solver
            .set_material_parameters(param_linear())
            .unwrap()
            .set_displacement_bc(&[4], Coefficient::constant(0.0), Some(0))
            .unwrap()
            .set_displacement_bc(&[1], Coefficient::constant(0.0), Some(1))
            .unwrap()
            .set_displacement_bc(&[2], Coefficient::scalar(|_, t| 0.01 * t), Some(0))
            .unwrap();
        solver
    }

    #[test]
    fn setters_capture_errors() {
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, Config::new()).unwrap();
        assert_eq!(
            solver.set_viscosity(Coefficient::constant_vector(&[1.0, 1.0])).err(),
            Some("viscosity requires a scalar coefficient")
        );
        assert_eq!(
            solver.set_initial_velocity(Coefficient::constant(1.0)).err(),
            Some("initial velocity requires a vector coefficient")
        );
        assert_eq!(
            solver.set_initial_displacement(Coefficient::constant(1.0)).err(),
            Some("initial displacement requires a vector coefficient")
        );
        assert_eq!(
            solver.complete_setup().err(),
            Some("material parameters must be set before complete_setup")
        );
        assert_eq!(
            solver.advance_timestep(0.1).err(),
            Some(StepError::Config("complete_setup must be called before advance_timestep"))
        );
        solver.set_material_parameters(param_linear()).unwrap();
        solver.complete_setup().unwrap();
        assert_eq!(solver.complete_setup().err(), Some("complete_setup must be called exactly once"));
        assert_eq!(
            solver.set_material_parameters(param_linear()).err(),
            Some("cannot modify the solver after complete_setup")
        );
        assert_eq!(
            solver.advance_timestep(0.0).err(),
            Some(StepError::Config("dt must be > 0.0"))
        );
    }

    #[test]
    fn complete_setup_captures_bc_errors() {
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, Config::new()).unwrap();
        solver
            .set_material_parameters(param_linear())
            .unwrap()
            .set_traction_bc(&[99], Coefficient::constant(1.0), Some(0))
            .unwrap();
        assert_eq!(
            solver.complete_setup().err(),
            Some("cannot find boundary faces with the given marker")
        );
    }

    #[test]
    fn quasi_static_step_works() {
        let mut solver = new_bar(Config::new());
        assert_eq!(solver.state(), SolverState::Uninitialized);
        solver.complete_setup().unwrap();
        assert_eq!(solver.state(), SolverState::QuasiStaticReady);
        assert_eq!(solver.geometry().active(), ActiveNodes::Deformed);

        assert_eq!(solver.advance_timestep(1.0), Ok(1.0));
        assert_eq!(solver.cycle(), 1);
        assert_eq!(solver.time(), 1.0);
        assert!(solver.newton_iterations() >= 1);

        // essential values are exact
        let u = &solver.displacement().true_vec;
        assert_eq!(u[0], 0.0);
        assert_eq!(u[6], 0.0);
        assert_eq!(u[4], 0.01);
        assert_eq!(u[10], 0.01);

        // the middle nodes move half-way (uniaxial stress)
        approx_eq(u[2], 0.005, 1e-8);
        approx_eq(u[8], 0.005, 1e-8);
        assert_eq!(u[1], 0.0);
        assert!(u[7] < 0.0);

        // deformed = reference + u
        let geo = solver.geometry();
        approx_eq(geo.deformed()[4], 2.01, 1e-15);
        assert_eq!(geo.active(), ActiveNodes::Deformed);

        // second step (warm start)
        assert_eq!(solver.advance_timestep(1.0), Ok(1.0));
        assert_eq!(solver.displacement().true_vec[4], 0.02);
        approx_eq(solver.displacement().local_vec[2], 0.01, 1e-8);
    }

    #[test]
    fn failed_step_leaves_the_solver_untouched() {
        let mut config = Config::new();
        config.set_newton_max_iter(1).unwrap().set_newton_tolerances(0.0, 1e-30).unwrap();
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, config).unwrap();
        solver
            .set_material_parameters(ParamSolid {
                density: 1.0,
                stress_strain: ParamStressStrain::NeoHookean { bulk: 10.0, shear: 1.0 },
                ngauss: None,
            })
            .unwrap()
            .set_displacement_bc(&[4], Coefficient::constant_vector(&[0.0, 0.0]), None)
            .unwrap()
            .set_displacement_bc(&[2], Coefficient::scalar(|_, t| 0.2 * t), Some(0))
            .unwrap();
        solver.complete_setup().unwrap();
        let res = solver.advance_timestep(1.0);
        assert!(matches!(res, Err(StepError::NewtonDiverged { .. })));
        assert_eq!(solver.cycle(), 0);
        assert_eq!(solver.time(), 0.0);
        assert_eq!(solver.displacement().true_vec.as_data(), &[0.0; 8]);
        assert_eq!(solver.displacement().local_vec.as_data(), &[0.0; 8]);
        assert_eq!(solver.geometry().deformed().as_data(), solver.geometry().reference().as_data());
        assert_eq!(solver.geometry().active(), ActiveNodes::Deformed);
    }

    #[test]
    fn inverted_elements_give_a_convergence_failure() {
        // the right side is pushed beyond the left side, thus det(F) < 0 at the lifted trial
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, Config::new()).unwrap();
        solver
            .set_material_parameters(ParamSolid {
                density: 1.0,
                stress_strain: ParamStressStrain::NeoHookean { bulk: 10.0, shear: 1.0 },
                ngauss: None,
            })
            .unwrap()
            .set_displacement_bc(&[4], Coefficient::constant_vector(&[0.0, 0.0]), None)
            .unwrap()
            .set_displacement_bc(&[2], Coefficient::scalar(|_, t| -1.2 * t), Some(0))
            .unwrap();
        solver.complete_setup().unwrap();
        let res = solver.advance_timestep(1.0);
        assert!(matches!(res, Err(StepError::InvalidTrial { iteration: 0, .. })));
        assert_eq!(solver.cycle(), 0);
        assert_eq!(solver.time(), 0.0);
        assert_eq!(solver.displacement().true_vec.as_data(), &[0.0; 8]);
        assert_eq!(solver.geometry().active(), ActiveNodes::Deformed);
    }

    #[test]
    fn step_requires_the_reference_node_set() {
        let mut solver = new_bar(Config::new());
        solver.complete_setup().unwrap();
        assert_eq!(solver.geometry.active(), ActiveNodes::Deformed);
        let mut x = StateBlock::new(12);
        let setup = solver.setup.as_mut().unwrap();
        assert_eq!(
            run_step(setup, &solver.space, &solver.bcs, &solver.geometry, &mut x, 0.0, 1.0).err(),
            Some(StepError::Config("the reference node-set must be active for assembly"))
        );
    }

    #[test]
    fn failed_accept_restores_the_deformed_node_set() {
        let mut solver = new_bar(Config::new());
        solver.complete_setup().unwrap();
        solver.geometry.activate_reference();
        assert_eq!(
            solver.accept(StateBlock::new(3), 0.1, 1).err(),
            Some("the converged state has an incompatible dimension")
        );
        assert_eq!(solver.geometry().active(), ActiveNodes::Deformed);
        assert_eq!(solver.cycle(), 0);
        assert_eq!(solver.time(), 0.0);
    }

    #[test]
    fn verbose_iterations_work() {
        let mut config = Config::new();
        config.set_verbose(false, true).unwrap();
        let mut solver = new_bar(config);
        solver.complete_setup().unwrap();
        solver.advance_timestep(1.0).unwrap();
        assert_eq!(solver.cycle(), 1);
    }

    #[test]
    fn initial_fields_are_projected() {
        let mut config = Config::new();
        config.set_timestep_method(TimestepMethod::BackwardEuler).unwrap();
        let mut solver = new_bar(config);
        solver
            .set_initial_displacement(Coefficient::vector(|u, x, _| {
                u[0] = 0.001 * x[0];
                u[1] = 0.0;
            }))
            .unwrap()
            .set_initial_velocity(Coefficient::constant_vector(&[0.0, 0.1]))
            .unwrap();
        solver.complete_setup().unwrap();
        assert_eq!(solver.state(), SolverState::DynamicReady);
        assert_eq!(solver.displacement().initialized(), true);
        assert_eq!(solver.velocity().true_vec[1], 0.1);
        approx_eq(solver.geometry().deformed()[4], 2.002, 1e-15);
        // ½ ρ V v² = ½ · 1 · 2 · 0.01
        approx_eq(solver.kinetic_energy().unwrap(), 0.01, 1e-15);
    }

    #[test]
    fn dynamic_step_works() {
        let mut config = Config::new();
        config.set_timestep_method(TimestepMethod::BackwardEuler).unwrap();
        let mut solver = new_bar(config);
        solver.complete_setup().unwrap();
        assert_eq!(solver.advance_timestep(0.1), Ok(0.1));
        assert_eq!(solver.cycle(), 1);

        // u = u₀ + dt k_u hits the prescribed value at the end of the step
        let u = &solver.displacement().true_vec;
        approx_eq(u[4], 0.001, 1e-15);
        approx_eq(u[10], 0.001, 1e-15);
        assert_eq!(u[0], 0.0);

        // deformed += Δu
        let geo = solver.geometry();
        approx_eq(geo.deformed()[4], 2.001, 1e-15);

        // the loaded side moves with v = Δu / dt
        approx_eq(solver.velocity().true_vec[4], 0.01, 1e-14);
        assert_eq!(solver.jacobian_assemblies(), 1);
    }

    #[test]
    fn warnings_are_recorded() {
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut solver = NonlinearSolidSolver::new(space, Config::new()).unwrap();
        solver
            .set_material_parameters(param_linear())
            .unwrap()
            .set_displacement_bc(&[4], Coefficient::constant_vector(&[0.0, 0.0]), None)
            .unwrap()
            .set_displacement_bc(&[4], Coefficient::constant(0.0), Some(1))
            .unwrap();
        solver.complete_setup().unwrap();
        let warnings = solver.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            BcWarning::OverlappingComponents {
                dof: 1,
                previous: None,
                current: Some(1)
            }
        );
        assert_eq!(solver.essential_dofs().unwrap().dofs, &[0, 1, 4, 5]);
    }

    #[test]
    fn reaction_forces_and_material_states_work() {
        let mut solver = new_bar(Config::new());
        assert_eq!(solver.reaction_forces().err(), Some("complete_setup must be called first"));
        assert_eq!(solver.material_states().err(), Some("complete_setup must be called first"));
        solver.complete_setup().unwrap();
        solver.advance_timestep(1.0).unwrap();
        let r = solver.reaction_forces().unwrap();
        // left and right supports balance
        let left = r[0] + r[6];
        let right = r[4] + r[10];
        assert!(right > 0.0);
        approx_eq(left + right, 0.0, 1e-10);
        // free dofs are in equilibrium
        approx_eq(r[2], 0.0, 1e-9);
        assert_eq!(solver.material_states().unwrap().len(), 8);
    }
}
