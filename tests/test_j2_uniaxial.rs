use nlsolid::prelude::*;
use nlsolid::StrError;
use russell_lab::approx_eq;

const YOUNG: f64 = 1000.0;
const POISSON: f64 = 0.25;
const HH_ISO: f64 = 40.0;
const HH_KIN: f64 = 60.0;
const SIGMA_Y: f64 = 1.0;

/// Returns the uniaxial stress for a given total strain
fn analytical_stress(strain: f64) -> f64 {
    let eps_y = SIGMA_Y / YOUNG;
    if strain <= eps_y {
        YOUNG * strain
    } else {
        let hh = HH_ISO + HH_KIN;
        (SIGMA_Y + hh * strain) / (1.0 + hh / YOUNG)
    }
}

#[test]
fn test_j2_uniaxial_single_element() -> Result<(), StrError> {
    //          z
    //          ↑
    //          +--------+
    //         /|       /|   x = 1 face: ux = ε(t)
    //        +--------+ |
    //  ux=0  | +------|-+ → y      rollers on x = 0, y = 0, z = 0
    //        |/       |/
    //        +--------+
    //       ↙
    //      x
    let space = SampleMeshes::block_hex8(1, 1, 1, 1.0, 1.0, 1.0)?;
    let loaded = space.resolve_boundary_dofs(&[3], Some(0))?;
    let mut config = Config::new();
    config.set_newton_tolerances(1e-10, 1e-13)?;
    let mut solver = NonlinearSolidSolver::new(space, config)?;
    const RATE: f64 = 0.0005;
    solver
        .set_material_parameters(ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::J2 {
                young: YOUNG,
                poisson: POISSON,
                hh_iso: HH_ISO,
                hh_kin: HH_KIN,
                sigma_y: SIGMA_Y,
            },
            ngauss: None,
        })?
        .set_displacement_bc(&[5], Coefficient::constant(0.0), Some(0))?
        .set_displacement_bc(&[2], Coefficient::constant(0.0), Some(1))?
        .set_displacement_bc(&[1], Coefficient::constant(0.0), Some(2))?
        .set_displacement_bc(&[3], Coefficient::scalar(|_, t| RATE * t), Some(0))?;
    solver.complete_setup()?;

    // the state is untouched while elastic
    solver.advance_timestep(1.0).unwrap();
    for state in solver.material_states()?.iter() {
        assert_eq!(state.accumulated_plastic_strain, 0.0);
    }

    // load beyond the yield point
    for _ in 0..5 {
        solver.advance_timestep(1.0).unwrap();
        let strain = RATE * solver.time();
        let r = solver.reaction_forces()?;
        let force: f64 = loaded.iter().map(|d| r[*d]).sum();
        println!(
            "t = {:?}, ε = {:?}, σ = {:?}, iterations = {}",
            solver.time(),
            strain,
            force,
            solver.newton_iterations()
        );
        approx_eq(force, analytical_stress(strain), 1e-8);
        assert!(solver.newton_iterations() <= 6);
    }

    // accumulated plastic strain: ε̄p = ε - σ/E (uniaxial)
    let strain = RATE * solver.time();
    let eps_p = strain - analytical_stress(strain) / YOUNG;
    assert!(eps_p > 0.0);
    for state in solver.material_states()?.iter() {
        approx_eq(state.accumulated_plastic_strain, eps_p, 1e-10);
        approx_eq(state.plastic_strain.get(0, 0), eps_p, 1e-10);
        approx_eq(state.back_stress.get(0, 0), 2.0 * HH_KIN * eps_p / 3.0, 1e-8);
    }
    Ok(())
}

#[test]
fn test_j2_requires_a_three_dimensional_mesh() -> Result<(), StrError> {
    let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0)?;
    let mut solver = NonlinearSolidSolver::new(space, Config::new())?;
    solver.set_material_parameters(ParamSolid {
        density: 1.0,
        stress_strain: ParamStressStrain::J2 {
            young: YOUNG,
            poisson: POISSON,
            hh_iso: HH_ISO,
            hh_kin: HH_KIN,
            sigma_y: SIGMA_Y,
        },
        ngauss: None,
    })?;
    assert_eq!(
        solver.complete_setup().err(),
        Some("J2 plasticity requires a three-dimensional mesh")
    );
    Ok(())
}
