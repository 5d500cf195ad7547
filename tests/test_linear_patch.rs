use nlsolid::prelude::*;
use nlsolid::StrError;
use russell_lab::approx_eq;

const BULK: f64 = 10.0;
const SHEAR: f64 = 6.0;

fn param() -> ParamSolid {
    ParamSolid {
        density: 1.0,
        stress_strain: ParamStressStrain::LinearIsotropic {
            bulk: BULK,
            shear: SHEAR,
        },
        ngauss: None,
    }
}

#[test]
fn test_linear_patch_plane_strain_traction() -> Result<(), StrError> {
    //      y
    //      ↑   free
    //      o-------o-------o-------o-------o
    //      |       |       |       |       | → σ = 0.5
    //  ux  o-------o-------o-------o-------o → σ
    //  = 0 |       |       |       |       | → σ
    //      o-------o-------o-------o-------o → x
    //               uy = 0 (bottom)
    let space = SampleMeshes::block_qua4(4, 2, 4.0, 2.0)?;
    let mut solver = NonlinearSolidSolver::new(space, Config::new())?;
    const SIGMA: f64 = 0.5;
    solver
        .set_material_parameters(param())?
        .set_displacement_bc(&[4], Coefficient::constant(0.0), Some(0))?
        .set_displacement_bc(&[1], Coefficient::constant(0.0), Some(1))?
        .set_traction_bc(&[2], Coefficient::constant(SIGMA), Some(0))?;
    solver.complete_setup()?;
    solver.advance_timestep(1.0).unwrap();
    assert!(solver.newton_iterations() <= 2);

    // plane-strain analytical solution
    let young = 9.0 * BULK * SHEAR / (3.0 * BULK + SHEAR);
    let poisson = (3.0 * BULK - 2.0 * SHEAR) / (2.0 * (3.0 * BULK + SHEAR));
    let eps_x = SIGMA * (1.0 - poisson * poisson) / young;
    let eps_y = -SIGMA * poisson * (1.0 + poisson) / young;
    println!("εx = {:?}, εy = {:?}", eps_x, eps_y);

    let space = solver.space();
    let u = &solver.displacement().true_vec;
    for node in 0..space.nnode() {
        let x = space.node_coords(node);
        approx_eq(u[space.local_dof(node, 0)], eps_x * x[0], 1e-9);
        approx_eq(u[space.local_dof(node, 1)], eps_y * x[1], 1e-9);
    }

    // the reactions at the left side balance the applied traction
    let left = space.resolve_boundary_dofs(&[4], Some(0))?;
    let r = solver.reaction_forces()?;
    let sum: f64 = left.iter().map(|d| r[*d]).sum();
    approx_eq(sum, -SIGMA * 2.0, 1e-9);
    Ok(())
}

#[test]
fn test_linear_patch_pressure_compresses() -> Result<(), StrError> {
    // unit box with rollers on three faces and pressure on the x = 1 face
    let space = SampleMeshes::block_hex8(2, 1, 1, 1.0, 1.0, 1.0)?;
    let loaded = space.resolve_boundary_dofs(&[3], Some(0))?;
    let mut solver = NonlinearSolidSolver::new(space, Config::new())?;
    const PRESSURE: f64 = 0.3;
    solver
        .set_material_parameters(param())?
        .set_displacement_bc(&[5], Coefficient::constant(0.0), Some(0))?
        .set_displacement_bc(&[2], Coefficient::constant(0.0), Some(1))?
        .set_displacement_bc(&[1], Coefficient::constant(0.0), Some(2))?
        .set_pressure_bc(&[3], Coefficient::scalar(|_, t| PRESSURE * t))?;
    solver.complete_setup()?;
    solver.advance_timestep(1.0).unwrap();

    // uniaxial stress: ux = -p / E at x = 1
    let young = 9.0 * BULK * SHEAR / (3.0 * BULK + SHEAR);
    let u = &solver.displacement().true_vec;
    for d in &loaded {
        assert!(u[*d] < 0.0);
        approx_eq(u[*d], -PRESSURE / young, 1e-9);
    }
    assert!(solver.warnings().is_empty());
    Ok(())
}

#[test]
fn test_linear_patch_body_force() -> Result<(), StrError> {
    // column under its own weight: σy(y) = ρ g (y - h), uy(h) = -ρ g h² / (2 M) with M = K + 4G/3
    let space = SampleMeshes::block_qua4(1, 8, 1.0, 4.0)?;
    let mut solver = NonlinearSolidSolver::new(space, Config::new())?;
    const WEIGHT: f64 = 0.1;
    solver
        .set_material_parameters(param())?
        .set_displacement_bc(&[1], Coefficient::constant(0.0), Some(1))?
        .set_displacement_bc(&[2, 4], Coefficient::constant(0.0), Some(0))?
        .set_body_force(Coefficient::constant_vector(&[0.0, -WEIGHT]))?;
    solver.complete_setup()?;
    solver.advance_timestep(1.0).unwrap();

    // the top nodes of a quadratic field are only approximated by bilinear elements, but the
    // nodal values are exact in 1D (constrained modulus)
    let space = solver.space();
    let top = space.resolve_boundary_dofs(&[3], Some(1))?;
    let modulus = BULK + 4.0 * SHEAR / 3.0;
    let h: f64 = 4.0;
    for d in &top {
        approx_eq(solver.displacement().true_vec[*d], -WEIGHT * h * h / (2.0 * modulus), 1e-9);
    }
    Ok(())
}
