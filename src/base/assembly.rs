use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::CooMatrix;

/// Assembles local vector into global vector
///
/// # Output
///
/// * `rr_global` -- is the global vector R with length = `n_equation`
///
/// # Input
///
/// * `r_local` -- is the local vector r with length = `n_equation_local`
/// * `local_to_global` -- is an array holding all equation numbers
/// * `prescribed` -- tells whether a global equation number has prescribed
///   DOF or not. Its length is equal to the total number of DOFs `n_equation`.
///
/// # Panics
///
/// This function will panic if the indices are out-of-bounds
#[inline]
pub fn assemble_vector(rr_global: &mut Vector, r_local: &Vector, local_to_global: &[usize], prescribed: &[bool]) {
    let n_equation_local = r_local.dim();
    for l in 0..n_equation_local {
        let g = local_to_global[l];
        if !prescribed[g] {
            rr_global[g] += r_local[l];
        }
    }
}

/// Assembles local matrix into global matrix
///
/// Rows and columns of prescribed equations are skipped; see [put_ones_on_diagonal].
///
/// # Output
///
/// * `kk_global` -- is the global square matrix K with dims = (`n_equation`,`n_equation`)
///
/// # Input
///
/// * `kk_local` -- is the local square matrix K with dims = (`n_equation_local`,`n_equation_local`)
/// * `local_to_global` -- is an array holding all equation numbers
/// * `prescribed` -- tells whether a global equation number has prescribed
///   DOF or not. Its length is equal to the total number of DOFs `n_equation`.
///
/// # Panics
///
/// This function will panic if the indices are out-of-bounds
pub fn assemble_matrix(
    kk_global: &mut CooMatrix,
    kk_local: &Matrix,
    local_to_global: &[usize],
    prescribed: &[bool],
) -> Result<(), StrError> {
    let n_equation_local = kk_local.dims().0;
    for l in 0..n_equation_local {
        let g = local_to_global[l];
        if !prescribed[g] {
            for ll in 0..n_equation_local {
                let gg = local_to_global[ll];
                if !prescribed[gg] {
                    kk_global.put(g, gg, kk_local.get(l, ll))?;
                }
            }
        }
    }
    Ok(())
}

/// Puts ones on the diagonal of the global matrix at the prescribed equations
pub fn put_ones_on_diagonal(kk_global: &mut CooMatrix, prescribed: &[bool]) -> Result<(), StrError> {
    for eq in 0..prescribed.len() {
        if prescribed[eq] {
            kk_global.put(eq, eq, 1.0)?;
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{assemble_matrix, assemble_vector, put_ones_on_diagonal};
    use russell_lab::{Matrix, Vector};
    use russell_sparse::{CooMatrix, Sym};

    #[test]
    fn assemble_vector_works() {
        //  0   1   2
        //  o---o---o   two 1D elements with one dof per node
        let mut rr = Vector::new(3);
        let r0 = Vector::from(&[1.0, 2.0]);
        let r1 = Vector::from(&[10.0, 20.0]);
        let prescribed = vec![false, false, true];
        assemble_vector(&mut rr, &r0, &[0, 1], &prescribed);
        assemble_vector(&mut rr, &r1, &[1, 2], &prescribed);
        assert_eq!(rr.as_data(), &[1.0, 12.0, 0.0]);
    }

    #[test]
    fn assemble_matrix_works() {
        let kk0 = Matrix::from(&[[1.0, -1.0], [-1.0, 1.0]]);
        let kk1 = Matrix::from(&[[2.0, -2.0], [-2.0, 2.0]]);
        let prescribed = vec![true, false, false];
        let mut kk = CooMatrix::new(3, 3, 9, Sym::No).unwrap();
        assemble_matrix(&mut kk, &kk0, &[0, 1], &prescribed).unwrap();
        assemble_matrix(&mut kk, &kk1, &[1, 2], &prescribed).unwrap();
        put_ones_on_diagonal(&mut kk, &prescribed).unwrap();
        let mut u = Vector::from(&[1.0, 1.0, 1.0]);
        let mut v = Vector::new(3);
        kk.mat_vec_mul(&mut v, 1.0, &u).unwrap();
        // row 0 is the identity; row 1 = [0, 1+2, -2]; row 2 = [0, -2, 2]
        assert_eq!(v.as_data(), &[1.0, 1.0, 0.0]);
        u[2] = 0.0;
        kk.mat_vec_mul(&mut v, 1.0, &u).unwrap();
        assert_eq!(v.as_data(), &[1.0, 3.0, -2.0]);
    }
}
