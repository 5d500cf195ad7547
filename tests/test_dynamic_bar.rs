use nlsolid::prelude::*;
use nlsolid::StrError;
use russell_lab::{approx_eq, vec_inner};

const LENGTH: f64 = 4.0;

/// Allocates a cantilever bar fixed at x = 0 with an initial velocity v = (0.1 x / L, 0)
fn new_bar(method: TimestepMethod, viscosity: Option<f64>) -> Result<NonlinearSolidSolver, StrError> {
    let space = SampleMeshes::block_qua4(8, 1, LENGTH, 1.0)?;
    let mut config = Config::new();
    config.set_timestep_method(method)?.set_newton_tolerances(1e-12, 1e-14)?;
    let mut solver = NonlinearSolidSolver::new(space, config)?;
    solver
        .set_material_parameters(ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::LinearIsotropic { bulk: 10.0, shear: 5.0 },
            ngauss: None,
        })?
        .set_displacement_bc(&[4], Coefficient::constant_vector(&[0.0, 0.0]), None)?
        .set_initial_velocity(Coefficient::vector(|v, x, _| {
            v[0] = 0.1 * x[0] / LENGTH;
            v[1] = 0.0;
        }))?;
    if let Some(mu) = viscosity {
        solver.set_viscosity(Coefficient::constant(mu))?;
    }
    solver.complete_setup()?;
    Ok(solver)
}

/// Computes the kinetic plus the strain energy (linear elasticity)
fn total_energy(solver: &mut NonlinearSolidSolver) -> Result<f64, StrError> {
    let kinetic = solver.kinetic_energy()?;
    let r = solver.reaction_forces()?;
    let strain = 0.5 * vec_inner(&solver.displacement().true_vec, &r);
    Ok(kinetic + strain)
}

#[test]
fn test_dynamic_bar_backward_euler_dissipates_energy() -> Result<(), StrError> {
    let mut solver = new_bar(TimestepMethod::BackwardEuler, None)?;
    assert_eq!(solver.state(), SolverState::DynamicReady);
    let e0 = total_energy(&mut solver)?;
    approx_eq(e0, solver.kinetic_energy()?, 1e-15);
    assert!(e0 > 0.0);
    let mut previous = e0;
    for _ in 0..40 {
        solver.advance_timestep(0.05).unwrap();
        let energy = total_energy(&mut solver)?;
        assert!(energy <= previous * (1.0 + 1e-8));
        previous = energy;
    }
    println!("E0 = {:?}, E = {:?}", e0, previous);
    assert!(previous < e0);
    assert!(previous > 0.0);
    approx_eq(solver.time(), 2.0, 1e-12);

    // the fixed end does not move
    let u = &solver.displacement().true_vec;
    let v = &solver.velocity().true_vec;
    for d in &solver.essential_dofs()?.dofs {
        assert_eq!(u[*d], 0.0);
        assert_eq!(v[*d], 0.0);
    }
    Ok(())
}

#[test]
fn test_dynamic_bar_sdirk33_keeps_energy_bounded() -> Result<(), StrError> {
    let mut solver = new_bar(TimestepMethod::Sdirk33, None)?;
    let e0 = total_energy(&mut solver)?;
    for _ in 0..40 {
        solver.advance_timestep(0.05).unwrap();
        let energy = total_energy(&mut solver)?;
        assert!(energy <= e0 * (1.0 + 1e-6));
        assert!(energy > 0.9 * e0);
    }
    Ok(())
}

#[test]
fn test_dynamic_bar_viscosity_dissipates_more() -> Result<(), StrError> {
    let mut elastic = new_bar(TimestepMethod::Sdirk33, None)?;
    let mut viscous = new_bar(TimestepMethod::Sdirk33, Some(0.5))?;
    for _ in 0..20 {
        elastic.advance_timestep(0.05).unwrap();
        viscous.advance_timestep(0.05).unwrap();
    }
    let e_elastic = total_energy(&mut elastic)?;
    let e_viscous = total_energy(&mut viscous)?;
    println!("elastic: {:?}, viscous: {:?}", e_elastic, e_viscous);
    assert!(e_viscous < e_elastic);
    Ok(())
}

#[test]
fn test_dynamic_bar_reuses_the_jacobian() -> Result<(), StrError> {
    let mut solver = new_bar(TimestepMethod::BackwardEuler, None)?;
    assert_eq!(solver.jacobian_assemblies(), 0);
    for _ in 0..3 {
        solver.advance_timestep(0.01).unwrap();
    }
    assert_eq!(solver.jacobian_assemblies(), 1);

    // new dt: exactly one reassembly
    solver.advance_timestep(0.02).unwrap();
    solver.advance_timestep(0.02).unwrap();
    assert_eq!(solver.jacobian_assemblies(), 2);

    // SDIRK33 stages share the same dt
    let mut solver = new_bar(TimestepMethod::Sdirk33, None)?;
    solver.advance_timestep(0.01).unwrap();
    solver.advance_timestep(0.01).unwrap();
    assert_eq!(solver.jacobian_assemblies(), 1);
    Ok(())
}

#[test]
fn test_dynamic_j2_reassembles_after_commit() -> Result<(), StrError> {
    let space = SampleMeshes::block_hex8(1, 1, 1, 1.0, 1.0, 1.0)?;
    let mut config = Config::new();
    config.set_timestep_method(TimestepMethod::BackwardEuler)?;
    let mut solver = NonlinearSolidSolver::new(space, config)?;
    solver
        .set_material_parameters(ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::J2 {
                young: 1000.0,
                poisson: 0.25,
                hh_iso: 10.0,
                hh_kin: 0.0,
                sigma_y: 1.0,
            },
            ngauss: None,
        })?
        .set_displacement_bc(&[5], Coefficient::constant_vector(&[0.0, 0.0, 0.0]), None)?
        .set_displacement_bc(&[3], Coefficient::scalar(|_, t| 1e-4 * t), Some(0))?;
    solver.complete_setup()?;
    solver.advance_timestep(0.1).unwrap();
    assert_eq!(solver.jacobian_assemblies(), 1);

    // the committed state changed, thus the Jacobian is reassembled at the same dt
    solver.advance_timestep(0.1).unwrap();
    assert_eq!(solver.jacobian_assemblies(), 2);
    Ok(())
}
